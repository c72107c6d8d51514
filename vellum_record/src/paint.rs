// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint model and its canonical byte form.
//!
//! A [`Paint`] bundles everything that affects how geometry is rendered:
//! color, fill/stroke style, text parameters, and eight optional effect
//! slots. The recorder never interprets these semantically; it only needs
//! two things from them:
//!
//! - a **canonical serialization** that is a pure function of observable
//!   state, so structurally equal paints intern to the same dictionary
//!   index, and
//! - the **simple-paint predicate** used by the save-layer fold: a paint
//!   with every effect slot empty is just a color, and its alpha can be
//!   migrated onto a bitmap draw.
//!
//! Effects are sealed variant enums rather than open trait objects so the
//! byte encoder stays total.

use alloc::vec::Vec;
use peniko::{BlendMode, Color, Compose, Mix};
use vellum_stream::{ByteCursor, StreamError, StreamWriter};

use crate::geom::PointF;

/// Fill/stroke geometry interpretation.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PaintStyle {
    /// Fill the geometry.
    #[default]
    Fill = 0,
    /// Stroke the geometry outline.
    Stroke = 1,
    /// Fill, then stroke.
    StrokeAndFill = 2,
}

impl PaintStyle {
    const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Fill,
            1 => Self::Stroke,
            2 => Self::StrokeAndFill,
            _ => return None,
        })
    }
}

/// Interpretation of the byte blobs passed to the text drawing verbs.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TextEncoding {
    /// UTF-8 encoded characters.
    #[default]
    Utf8 = 0,
    /// Little-endian 16-bit glyph identifiers.
    GlyphId = 1,
}

impl TextEncoding {
    const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Utf8,
            1 => Self::GlyphId,
            _ => return None,
        })
    }
}

/// Shader tiling beyond the gradient extent.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TileMode {
    /// Clamp to the edge color.
    #[default]
    Clamp = 0,
    /// Repeat the gradient.
    Repeat = 1,
    /// Repeat with mirroring.
    Mirror = 2,
}

impl TileMode {
    const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Clamp,
            1 => Self::Repeat,
            2 => Self::Mirror,
            _ => return None,
        })
    }
}

/// Blur flavor of a mask filter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BlurStyle {
    /// Blur inside and outside the shape.
    #[default]
    Normal = 0,
    /// Solid inside, blurred outside.
    Solid = 1,
    /// Transparent inside, blurred outside.
    Outer = 2,
    /// Blurred inside, transparent outside.
    Inner = 3,
}

impl BlurStyle {
    const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Normal,
            1 => Self::Solid,
            2 => Self::Outer,
            3 => Self::Inner,
            _ => return None,
        })
    }
}

/// One gradient stop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorStop {
    /// Normalized offset along the gradient, 0–1.
    pub offset: f32,
    /// Color at the offset.
    pub color: Color,
}

/// Gradient shader attached to a paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Shader {
    /// Linear gradient between two points.
    Linear {
        /// Gradient start point.
        start: PointF,
        /// Gradient end point.
        end: PointF,
        /// Tiling beyond the extent.
        tile: TileMode,
        /// Gradient stops, sorted by offset.
        stops: Vec<ColorStop>,
    },
    /// Radial gradient around a center.
    Radial {
        /// Gradient center.
        center: PointF,
        /// Gradient radius.
        radius: f32,
        /// Tiling beyond the extent.
        tile: TileMode,
        /// Gradient stops, sorted by offset.
        stops: Vec<ColorStop>,
    },
}

/// Geometry modifier applied before rasterization.
#[derive(Clone, Debug, PartialEq)]
pub enum PathEffect {
    /// Dash the outline.
    Dash {
        /// Alternating on/off interval lengths.
        intervals: Vec<f32>,
        /// Offset into the interval pattern.
        phase: f32,
    },
    /// Round off corners.
    Corner {
        /// Corner radius.
        radius: f32,
    },
}

/// Coverage-mask modifier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MaskFilter {
    /// Gaussian blur of the coverage mask.
    Blur {
        /// Blur flavor.
        style: BlurStyle,
        /// Standard deviation in user space.
        sigma: f32,
    },
}

/// Per-source-pixel color transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorFilter {
    /// Blend every source pixel against a constant color.
    Blend {
        /// Blend color.
        color: Color,
        /// Blend mode applied between color and source.
        mode: BlendMode,
    },
}

/// Custom coverage rasterizer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rasterizer {
    /// Rasterize the geometry in several offset passes.
    Layered {
        /// Number of passes.
        passes: u32,
    },
}

/// Draw looper: replays the draw several times with modified state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Looper {
    /// Draw a blurred, offset shadow pass under the main pass.
    Shadow {
        /// Shadow X offset.
        dx: f32,
        /// Shadow Y offset.
        dy: f32,
        /// Shadow blur standard deviation.
        sigma: f32,
        /// Shadow color.
        color: Color,
    },
}

/// Filter applied to the rendered output of a draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ImageFilter {
    /// Gaussian blur with separate X/Y standard deviation values.
    Blur {
        /// Standard deviation along the X axis.
        std_deviation_x: f32,
        /// Standard deviation along the Y axis.
        std_deviation_y: f32,
    },
    /// Drop shadow under the source content.
    DropShadow {
        /// Shadow offset along the X axis.
        dx: f32,
        /// Shadow offset along the Y axis.
        dy: f32,
        /// Blur standard deviation along the X axis.
        std_deviation_x: f32,
        /// Blur standard deviation along the Y axis.
        std_deviation_y: f32,
        /// Shadow color.
        color: Color,
    },
    /// Translate the output by a vector.
    Offset {
        /// Offset along the X axis.
        dx: f32,
        /// Offset along the Y axis.
        dy: f32,
    },
}

/// How text, geometry, and images are colored and styled.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Base color.
    pub color: Color,
    /// Fill/stroke style.
    pub style: PaintStyle,
    /// Stroke width; 0 means hairline.
    pub stroke_width: f32,
    /// Stroke miter limit.
    pub stroke_miter: f32,
    /// Anti-alias edges.
    pub anti_alias: bool,
    /// Text size in user-space units.
    pub text_size: f32,
    /// Lay glyphs out vertically.
    pub vertical_text: bool,
    /// Interpretation of text byte blobs.
    pub text_encoding: TextEncoding,
    /// Optional gradient shader.
    pub shader: Option<Shader>,
    /// Optional geometry modifier.
    pub path_effect: Option<PathEffect>,
    /// Optional coverage-mask modifier.
    pub mask_filter: Option<MaskFilter>,
    /// Optional color transform.
    pub color_filter: Option<ColorFilter>,
    /// Optional transfer mode against the destination.
    pub xfer_mode: Option<BlendMode>,
    /// Optional custom rasterizer.
    pub rasterizer: Option<Rasterizer>,
    /// Optional draw looper.
    pub looper: Option<Looper>,
    /// Optional output filter.
    pub image_filter: Option<ImageFilter>,
}

/// Ascent of the synthetic font metrics, as a fraction of the text size.
const ASCENT_FRACTION: f32 = 0.75;
/// Descent of the synthetic font metrics, as a fraction of the text size.
const DESCENT_FRACTION: f32 = 0.25;

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::from_rgba8(0, 0, 0, 255),
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            stroke_miter: 4.0,
            anti_alias: false,
            text_size: 12.0,
            vertical_text: false,
            text_encoding: TextEncoding::Utf8,
            shader: None,
            path_effect: None,
            mask_filter: None,
            color_filter: None,
            xfer_mode: None,
            rasterizer: None,
            looper: None,
            image_filter: None,
        }
    }
}

impl Paint {
    /// A fill paint with the given color and everything else default.
    #[must_use]
    pub fn from_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Returns `true` when the paint is nothing but a color: every effect
    /// slot is empty.
    ///
    /// Only simple paints are eligible for the save-layer/draw-bitmap fold.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.shader.is_none()
            && self.path_effect.is_none()
            && self.mask_filter.is_none()
            && self.color_filter.is_none()
            && self.xfer_mode.is_none()
            && self.rasterizer.is_none()
            && self.looper.is_none()
            && self.image_filter.is_none()
    }

    /// Returns `true` when conservative draw bounds can be computed without
    /// evaluating effects.
    ///
    /// Mask filters, loopers, rasterizers, and image filters can all move
    /// coverage an unbounded distance, so they disqualify the fast path.
    #[must_use]
    pub fn can_compute_fast_bounds(&self) -> bool {
        self.mask_filter.is_none()
            && self.looper.is_none()
            && self.rasterizer.is_none()
            && self.image_filter.is_none()
    }

    /// Number of glyphs a text blob will produce under this paint's
    /// encoding.
    #[must_use]
    pub fn count_text(&self, text: &[u8]) -> usize {
        match self.text_encoding {
            TextEncoding::Utf8 => core::str::from_utf8(text).map_or(0, |s| s.chars().count()),
            TextEncoding::GlyphId => text.len() / 2,
        }
    }

    /// Conservative vertical text bounds relative to the baseline, as
    /// (top, bottom).
    ///
    /// Derived from the text size plus the stroke outset, so the same paint
    /// always yields the same answer; the dictionary caches it per interned
    /// entry.
    #[must_use]
    pub fn font_top_bottom(&self) -> (f32, f32) {
        let top = -ASCENT_FRACTION * self.text_size;
        let bottom = DESCENT_FRACTION * self.text_size;
        let outset = match self.style {
            PaintStyle::Fill => 0.0,
            PaintStyle::Stroke | PaintStyle::StrokeAndFill => self.stroke_width * 0.5,
        };
        (top - outset, bottom + outset)
    }

    /// Appends the canonical byte form of this paint.
    ///
    /// The encoding is a pure function of the paint's observable state:
    /// structurally equal paints always produce identical bytes. Negative
    /// zero scalars are normalized so equality of values implies equality
    /// of bytes.
    pub fn write_to(&self, writer: &mut StreamWriter) -> Result<(), StreamError> {
        writer.append_u32(color_to_u32(self.color))?;
        writer.append_u32(self.style as u32)?;
        append_canon_f32(writer, self.stroke_width)?;
        append_canon_f32(writer, self.stroke_miter)?;
        writer.append_u32(u32::from(self.anti_alias) | (u32::from(self.vertical_text) << 1))?;
        writer.append_u32(self.text_encoding as u32)?;
        append_canon_f32(writer, self.text_size)?;

        write_option(writer, self.shader.as_ref(), write_shader)?;
        write_option(writer, self.path_effect.as_ref(), write_path_effect)?;
        write_option(writer, self.mask_filter.as_ref(), write_mask_filter)?;
        write_option(writer, self.color_filter.as_ref(), write_color_filter)?;
        write_option(writer, self.xfer_mode.as_ref(), |w, mode| {
            write_blend_mode(w, *mode)
        })?;
        write_option(writer, self.rasterizer.as_ref(), write_rasterizer)?;
        write_option(writer, self.looper.as_ref(), write_looper)?;
        write_option(writer, self.image_filter.as_ref(), write_image_filter)
    }

    /// Decodes a paint from its canonical byte form.
    ///
    /// Returns `None` if the bytes were not produced by
    /// [`Paint::write_to`].
    #[must_use]
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Option<Self> {
        let color = color_from_u32(cursor.read_u32());
        let style = PaintStyle::from_u32(cursor.read_u32())?;
        let stroke_width = cursor.read_f32();
        let stroke_miter = cursor.read_f32();
        let flags = cursor.read_u32();
        let text_encoding = TextEncoding::from_u32(cursor.read_u32())?;
        let text_size = cursor.read_f32();

        Some(Self {
            color,
            style,
            stroke_width,
            stroke_miter,
            anti_alias: flags & 1 != 0,
            vertical_text: flags & 2 != 0,
            text_encoding,
            text_size,
            shader: read_option(cursor, read_shader)?,
            path_effect: read_option(cursor, read_path_effect)?,
            mask_filter: read_option(cursor, read_mask_filter)?,
            color_filter: read_option(cursor, read_color_filter)?,
            xfer_mode: read_option(cursor, read_blend_mode)?,
            rasterizer: read_option(cursor, read_rasterizer)?,
            looper: read_option(cursor, read_looper)?,
            image_filter: read_option(cursor, read_image_filter)?,
        })
    }

    /// Serializes this paint into a fresh byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StreamError> {
        let mut writer = StreamWriter::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

/// Packs a color into the wire word as `(r << 24) | (g << 16) | (b << 8) | a`.
#[must_use]
pub fn color_to_u32(color: Color) -> u32 {
    let rgba = color.to_rgba8();
    (u32::from(rgba.r) << 24) | (u32::from(rgba.g) << 16) | (u32::from(rgba.b) << 8)
        | u32::from(rgba.a)
}

/// Unpacks a color written by [`color_to_u32`].
#[must_use]
pub fn color_from_u32(word: u32) -> Color {
    Color::from_rgba8(
        (word >> 24) as u8,
        (word >> 16) as u8,
        (word >> 8) as u8,
        word as u8,
    )
}

fn append_canon_f32(writer: &mut StreamWriter, value: f32) -> Result<(), StreamError> {
    // Normalize -0.0 so value equality implies byte equality.
    let value = if value == 0.0 { 0.0 } else { value };
    writer.append_f32(value)
}

fn write_option<T>(
    writer: &mut StreamWriter,
    value: Option<&T>,
    write: impl FnOnce(&mut StreamWriter, &T) -> Result<(), StreamError>,
) -> Result<(), StreamError> {
    match value {
        None => writer.append_u32(0),
        Some(v) => {
            writer.append_u32(1)?;
            write(writer, v)
        }
    }
}

fn read_option<T>(
    cursor: &mut ByteCursor<'_>,
    read: impl FnOnce(&mut ByteCursor<'_>) -> Option<T>,
) -> Option<Option<T>> {
    match cursor.read_u32() {
        0 => Some(None),
        1 => read(cursor).map(Some),
        _ => None,
    }
}

fn write_stops(writer: &mut StreamWriter, stops: &[ColorStop]) -> Result<(), StreamError> {
    writer.append_u32(stops.len() as u32)?;
    for stop in stops {
        append_canon_f32(writer, stop.offset)?;
        writer.append_u32(color_to_u32(stop.color))?;
    }
    Ok(())
}

fn read_stops(cursor: &mut ByteCursor<'_>) -> Option<Vec<ColorStop>> {
    let count = cursor.read_u32() as usize;
    if count * 8 > cursor.remaining() {
        return None;
    }
    let mut stops = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = cursor.read_f32();
        let color = color_from_u32(cursor.read_u32());
        stops.push(ColorStop { offset, color });
    }
    Some(stops)
}

fn write_shader(writer: &mut StreamWriter, shader: &Shader) -> Result<(), StreamError> {
    match shader {
        Shader::Linear {
            start,
            end,
            tile,
            stops,
        } => {
            writer.append_u32(0)?;
            start.write_to(writer)?;
            end.write_to(writer)?;
            writer.append_u32(*tile as u32)?;
            write_stops(writer, stops)
        }
        Shader::Radial {
            center,
            radius,
            tile,
            stops,
        } => {
            writer.append_u32(1)?;
            center.write_to(writer)?;
            append_canon_f32(writer, *radius)?;
            writer.append_u32(*tile as u32)?;
            write_stops(writer, stops)
        }
    }
}

fn read_shader(cursor: &mut ByteCursor<'_>) -> Option<Shader> {
    match cursor.read_u32() {
        0 => {
            let start = PointF::read_from(cursor);
            let end = PointF::read_from(cursor);
            let tile = TileMode::from_u32(cursor.read_u32())?;
            let stops = read_stops(cursor)?;
            Some(Shader::Linear {
                start,
                end,
                tile,
                stops,
            })
        }
        1 => {
            let center = PointF::read_from(cursor);
            let radius = cursor.read_f32();
            let tile = TileMode::from_u32(cursor.read_u32())?;
            let stops = read_stops(cursor)?;
            Some(Shader::Radial {
                center,
                radius,
                tile,
                stops,
            })
        }
        _ => None,
    }
}

fn write_path_effect(writer: &mut StreamWriter, effect: &PathEffect) -> Result<(), StreamError> {
    match effect {
        PathEffect::Dash { intervals, phase } => {
            writer.append_u32(0)?;
            append_canon_f32(writer, *phase)?;
            writer.append_u32(intervals.len() as u32)?;
            for interval in intervals {
                append_canon_f32(writer, *interval)?;
            }
            Ok(())
        }
        PathEffect::Corner { radius } => {
            writer.append_u32(1)?;
            append_canon_f32(writer, *radius)
        }
    }
}

fn read_path_effect(cursor: &mut ByteCursor<'_>) -> Option<PathEffect> {
    match cursor.read_u32() {
        0 => {
            let phase = cursor.read_f32();
            let count = cursor.read_u32() as usize;
            if count * 4 > cursor.remaining() {
                return None;
            }
            let mut intervals = Vec::with_capacity(count);
            for _ in 0..count {
                intervals.push(cursor.read_f32());
            }
            Some(PathEffect::Dash { intervals, phase })
        }
        1 => Some(PathEffect::Corner {
            radius: cursor.read_f32(),
        }),
        _ => None,
    }
}

fn write_mask_filter(writer: &mut StreamWriter, filter: &MaskFilter) -> Result<(), StreamError> {
    match filter {
        MaskFilter::Blur { style, sigma } => {
            writer.append_u32(*style as u32)?;
            append_canon_f32(writer, *sigma)
        }
    }
}

fn read_mask_filter(cursor: &mut ByteCursor<'_>) -> Option<MaskFilter> {
    let style = BlurStyle::from_u32(cursor.read_u32())?;
    Some(MaskFilter::Blur {
        style,
        sigma: cursor.read_f32(),
    })
}

fn write_color_filter(writer: &mut StreamWriter, filter: &ColorFilter) -> Result<(), StreamError> {
    match filter {
        ColorFilter::Blend { color, mode } => {
            writer.append_u32(color_to_u32(*color))?;
            write_blend_mode(writer, *mode)
        }
    }
}

fn read_color_filter(cursor: &mut ByteCursor<'_>) -> Option<ColorFilter> {
    let color = color_from_u32(cursor.read_u32());
    let mode = read_blend_mode(cursor)?;
    Some(ColorFilter::Blend { color, mode })
}

fn write_blend_mode(writer: &mut StreamWriter, mode: BlendMode) -> Result<(), StreamError> {
    writer.append_u32(mode.mix as u32)?;
    writer.append_u32(mode.compose as u32)
}

fn read_blend_mode(cursor: &mut ByteCursor<'_>) -> Option<BlendMode> {
    let mix = mix_from_u32(cursor.read_u32())?;
    let compose = compose_from_u32(cursor.read_u32())?;
    Some(BlendMode { mix, compose })
}

fn mix_from_u32(value: u32) -> Option<Mix> {
    Some(match value {
        0 => Mix::Normal,
        1 => Mix::Multiply,
        2 => Mix::Screen,
        3 => Mix::Overlay,
        4 => Mix::Darken,
        5 => Mix::Lighten,
        6 => Mix::ColorDodge,
        7 => Mix::ColorBurn,
        8 => Mix::HardLight,
        9 => Mix::SoftLight,
        10 => Mix::Difference,
        11 => Mix::Exclusion,
        12 => Mix::Hue,
        13 => Mix::Saturation,
        14 => Mix::Color,
        15 => Mix::Luminosity,
        128 => Mix::Clip,
        _ => return None,
    })
}

fn compose_from_u32(value: u32) -> Option<Compose> {
    Some(match value {
        0 => Compose::Clear,
        1 => Compose::Copy,
        2 => Compose::Dest,
        3 => Compose::SrcOver,
        4 => Compose::DestOver,
        5 => Compose::SrcIn,
        6 => Compose::DestIn,
        7 => Compose::SrcOut,
        8 => Compose::DestOut,
        9 => Compose::SrcAtop,
        10 => Compose::DestAtop,
        11 => Compose::Xor,
        12 => Compose::Plus,
        13 => Compose::PlusLighter,
        _ => return None,
    })
}

fn write_rasterizer(writer: &mut StreamWriter, rasterizer: &Rasterizer) -> Result<(), StreamError> {
    match rasterizer {
        Rasterizer::Layered { passes } => writer.append_u32(*passes),
    }
}

fn read_rasterizer(cursor: &mut ByteCursor<'_>) -> Option<Rasterizer> {
    Some(Rasterizer::Layered {
        passes: cursor.read_u32(),
    })
}

fn write_looper(writer: &mut StreamWriter, looper: &Looper) -> Result<(), StreamError> {
    match looper {
        Looper::Shadow {
            dx,
            dy,
            sigma,
            color,
        } => {
            append_canon_f32(writer, *dx)?;
            append_canon_f32(writer, *dy)?;
            append_canon_f32(writer, *sigma)?;
            writer.append_u32(color_to_u32(*color))
        }
    }
}

fn read_looper(cursor: &mut ByteCursor<'_>) -> Option<Looper> {
    Some(Looper::Shadow {
        dx: cursor.read_f32(),
        dy: cursor.read_f32(),
        sigma: cursor.read_f32(),
        color: color_from_u32(cursor.read_u32()),
    })
}

fn write_image_filter(writer: &mut StreamWriter, filter: &ImageFilter) -> Result<(), StreamError> {
    match filter {
        ImageFilter::Blur {
            std_deviation_x,
            std_deviation_y,
        } => {
            writer.append_u32(0)?;
            append_canon_f32(writer, *std_deviation_x)?;
            append_canon_f32(writer, *std_deviation_y)
        }
        ImageFilter::DropShadow {
            dx,
            dy,
            std_deviation_x,
            std_deviation_y,
            color,
        } => {
            writer.append_u32(1)?;
            append_canon_f32(writer, *dx)?;
            append_canon_f32(writer, *dy)?;
            append_canon_f32(writer, *std_deviation_x)?;
            append_canon_f32(writer, *std_deviation_y)?;
            writer.append_u32(color_to_u32(*color))
        }
        ImageFilter::Offset { dx, dy } => {
            writer.append_u32(2)?;
            append_canon_f32(writer, *dx)?;
            append_canon_f32(writer, *dy)
        }
    }
}

fn read_image_filter(cursor: &mut ByteCursor<'_>) -> Option<ImageFilter> {
    match cursor.read_u32() {
        0 => Some(ImageFilter::Blur {
            std_deviation_x: cursor.read_f32(),
            std_deviation_y: cursor.read_f32(),
        }),
        1 => Some(ImageFilter::DropShadow {
            dx: cursor.read_f32(),
            dy: cursor.read_f32(),
            std_deviation_x: cursor.read_f32(),
            std_deviation_y: cursor.read_f32(),
            color: color_from_u32(cursor.read_u32()),
        }),
        2 => Some(ImageFilter::Offset {
            dx: cursor.read_f32(),
            dy: cursor.read_f32(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn effectful_paint() -> Paint {
        Paint {
            color: Color::from_rgba8(10, 20, 30, 200),
            style: PaintStyle::Stroke,
            stroke_width: 2.5,
            anti_alias: true,
            shader: Some(Shader::Linear {
                start: PointF::new(0.0, 0.0),
                end: PointF::new(10.0, 0.0),
                tile: TileMode::Mirror,
                stops: vec![
                    ColorStop {
                        offset: 0.0,
                        color: Color::from_rgba8(255, 0, 0, 255),
                    },
                    ColorStop {
                        offset: 1.0,
                        color: Color::from_rgba8(0, 0, 255, 255),
                    },
                ],
            }),
            path_effect: Some(PathEffect::Dash {
                intervals: vec![4.0, 2.0],
                phase: 1.0,
            }),
            mask_filter: Some(MaskFilter::Blur {
                style: BlurStyle::Outer,
                sigma: 3.0,
            }),
            color_filter: Some(ColorFilter::Blend {
                color: Color::from_rgba8(1, 2, 3, 4),
                mode: BlendMode::new(Mix::Multiply, Compose::SrcOver),
            }),
            xfer_mode: Some(BlendMode::new(Mix::Screen, Compose::SrcOver)),
            rasterizer: Some(Rasterizer::Layered { passes: 3 }),
            looper: Some(Looper::Shadow {
                dx: 1.0,
                dy: 2.0,
                sigma: 0.5,
                color: Color::from_rgba8(0, 0, 0, 128),
            }),
            image_filter: Some(ImageFilter::DropShadow {
                dx: 3.0,
                dy: 4.0,
                std_deviation_x: 1.0,
                std_deviation_y: 1.0,
                color: Color::from_rgba8(9, 9, 9, 9),
            }),
            ..Paint::default()
        }
    }

    #[test]
    fn simple_predicate_requires_every_slot_empty() {
        let mut paint = Paint::default();
        assert!(paint.is_simple());
        paint.xfer_mode = Some(BlendMode::new(Mix::Normal, Compose::SrcOver));
        assert!(!paint.is_simple());
    }

    #[test]
    fn fast_bounds_excludes_unbounded_effects() {
        let mut paint = Paint::default();
        assert!(paint.can_compute_fast_bounds());
        // A shader colors pixels but cannot move coverage.
        paint.shader = Some(Shader::Radial {
            center: PointF::new(0.0, 0.0),
            radius: 4.0,
            tile: TileMode::Clamp,
            stops: vec![],
        });
        assert!(paint.can_compute_fast_bounds());
        paint.mask_filter = Some(MaskFilter::Blur {
            style: BlurStyle::Normal,
            sigma: 1.0,
        });
        assert!(!paint.can_compute_fast_bounds());
    }

    #[test]
    fn serialization_round_trips() {
        let paint = effectful_paint();
        let bytes = paint.to_bytes().unwrap();
        let mut cursor = ByteCursor::new(&bytes);
        let decoded = Paint::read_from(&mut cursor).unwrap();
        assert!(cursor.is_exhausted());
        assert_eq!(decoded, paint);
    }

    #[test]
    fn equal_paints_serialize_identically() {
        let a = effectful_paint();
        let b = effectful_paint();
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());

        let negative_zero = Paint {
            stroke_width: -0.0,
            ..Paint::default()
        };
        let positive_zero = Paint::default();
        assert_eq!(
            negative_zero.to_bytes().unwrap(),
            positive_zero.to_bytes().unwrap()
        );
    }

    #[test]
    fn color_word_round_trips() {
        let color = Color::from_rgba8(12, 34, 56, 78);
        assert_eq!(color_from_u32(color_to_u32(color)), color);
    }

    #[test]
    fn glyph_counting_follows_encoding() {
        let mut paint = Paint::default();
        assert_eq!(paint.count_text("héllo".as_bytes()), 5);
        paint.text_encoding = TextEncoding::GlyphId;
        assert_eq!(paint.count_text(&[1, 0, 2, 0, 3, 0]), 3);
    }

    #[test]
    fn stroked_text_outsets_metrics() {
        let fill = Paint::default();
        let (fill_top, fill_bottom) = fill.font_top_bottom();
        let stroked = Paint {
            style: PaintStyle::Stroke,
            stroke_width: 4.0,
            ..Paint::default()
        };
        let (stroke_top, stroke_bottom) = stroked.font_top_bottom();
        assert!(stroke_top < fill_top);
        assert!(stroke_bottom > fill_bottom);
    }
}
