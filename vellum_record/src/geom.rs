// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-old-data f32 geometry used on the wire.
//!
//! The stream stores scalars as 32-bit floats, so the recorder works in
//! small POD types and converts to kurbo's f64 geometry only at the
//! boundaries (conservative clip tracking, path bounds).

use kurbo::Affine;
use vellum_stream::{ByteCursor, StreamError, StreamWriter};

/// A 2D point in f32 coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointF {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl PointF {
    /// Serialized size in bytes.
    pub const BYTES: usize = 8;

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Append this point to the stream.
    pub fn write_to(&self, writer: &mut StreamWriter) -> Result<(), StreamError> {
        writer.append_f32(self.x)?;
        writer.append_f32(self.y)
    }

    /// Read a point from a cursor.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Self {
        Self {
            x: cursor.read_f32(),
            y: cursor.read_f32(),
        }
    }
}

/// A simple axis-aligned rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RectF {
    /// Minimum X coordinate.
    pub x0: f32,
    /// Minimum Y coordinate.
    pub y0: f32,
    /// Maximum X coordinate.
    pub x1: f32,
    /// Maximum Y coordinate.
    pub y1: f32,
}

impl RectF {
    /// Serialized size in bytes (left, top, right, bottom).
    pub const BYTES: usize = 16;

    /// Create a new rectangle from min/max corners.
    #[inline]
    #[must_use]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Rectangle height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Returns `true` if the rectangle encloses no area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Intersection of two rectangles; empty results collapse to a
    /// degenerate rect at the overlap position.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    /// Smallest rectangle containing both inputs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Convert to kurbo's rectangle type.
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }

    /// Convert from kurbo's rectangle type, narrowing to f32.
    #[inline]
    #[must_use]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        Self {
            x0: rect.x0 as f32,
            y0: rect.y0 as f32,
            x1: rect.x1 as f32,
            y1: rect.y1 as f32,
        }
    }

    /// Append this rectangle to the stream as (L, T, R, B).
    pub fn write_to(&self, writer: &mut StreamWriter) -> Result<(), StreamError> {
        writer.append_f32(self.x0)?;
        writer.append_f32(self.y0)?;
        writer.append_f32(self.x1)?;
        writer.append_f32(self.y1)
    }

    /// Read a rectangle from a cursor.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Self {
        Self {
            x0: cursor.read_f32(),
            y0: cursor.read_f32(),
            x1: cursor.read_f32(),
            y1: cursor.read_f32(),
        }
    }
}

/// An axis-aligned rectangle in integer coordinates.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct IRect {
    /// Minimum X coordinate.
    pub x0: i32,
    /// Minimum Y coordinate.
    pub y0: i32,
    /// Maximum X coordinate.
    pub x1: i32,
    /// Maximum Y coordinate.
    pub y1: i32,
}

impl IRect {
    /// Serialized size in bytes.
    pub const BYTES: usize = 16;

    /// Create a new rectangle from min/max corners.
    #[inline]
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Returns `true` if the rectangle encloses no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Smallest rectangle containing both inputs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Append this rectangle to the stream.
    pub fn write_to(&self, writer: &mut StreamWriter) -> Result<(), StreamError> {
        writer.append_i32(self.x0)?;
        writer.append_i32(self.y0)?;
        writer.append_i32(self.x1)?;
        writer.append_i32(self.y1)
    }

    /// Read a rectangle from a cursor.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Self {
        Self {
            x0: cursor.read_i32(),
            y0: cursor.read_i32(),
            x1: cursor.read_i32(),
            y1: cursor.read_i32(),
        }
    }
}

/// Corner radii for a rounded rectangle in f32 coordinates.
///
/// Radii are specified clockwise starting from the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RoundedRectRadiiF {
    /// The radius of the top-left corner.
    pub top_left: f32,
    /// The radius of the top-right corner.
    pub top_right: f32,
    /// The radius of the bottom-right corner.
    pub bottom_right: f32,
    /// The radius of the bottom-left corner.
    pub bottom_left: f32,
}

impl RoundedRectRadiiF {
    /// Create radii with potentially different values per corner.
    #[inline]
    #[must_use]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Create radii with a single value for all corners.
    #[inline]
    #[must_use]
    pub const fn from_single_radius(radius: f32) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    /// If all radii are equal, returns the uniform radius.
    #[must_use]
    pub fn as_single_radius(self) -> Option<f32> {
        let epsilon = 1e-6_f32;
        if (self.top_left - self.top_right).abs() < epsilon
            && (self.top_right - self.bottom_right).abs() < epsilon
            && (self.bottom_right - self.bottom_left).abs() < epsilon
        {
            Some(self.top_left)
        } else {
            None
        }
    }
}

impl From<f32> for RoundedRectRadiiF {
    #[inline]
    fn from(radius: f32) -> Self {
        Self::from_single_radius(radius)
    }
}

/// An axis-aligned rounded rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RoundedRectF {
    /// The underlying axis-aligned rectangle.
    pub rect: RectF,
    /// Radii of the rounded corners.
    pub radii: RoundedRectRadiiF,
}

impl RoundedRectF {
    /// Serialized size in bytes: the rect followed by the four radii.
    pub const BYTES: usize = RectF::BYTES + 16;

    /// Create a new rounded rectangle from corners and radii.
    #[inline]
    #[must_use]
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32, radii: impl Into<RoundedRectRadiiF>) -> Self {
        Self {
            rect: RectF::new(x0, y0, x1, y1),
            radii: radii.into(),
        }
    }

    /// Returns `true` when every corner radius is zero or negative, i.e. the
    /// shape degenerates to its bounding rectangle.
    #[must_use]
    pub fn is_rect(&self) -> bool {
        self.radii.top_left <= 0.0
            && self.radii.top_right <= 0.0
            && self.radii.bottom_right <= 0.0
            && self.radii.bottom_left <= 0.0
    }

    /// Returns `true` when the radii reach the rect center on both axes, so
    /// the shape degenerates to an oval.
    #[must_use]
    pub fn is_oval(&self) -> bool {
        match self.radii.as_single_radius() {
            Some(r) if r > 0.0 => {
                let half_w = self.rect.width() * 0.5;
                let half_h = self.rect.height() * 0.5;
                (r - half_w).abs() < 1e-6 && (r - half_h).abs() < 1e-6
            }
            _ => false,
        }
    }

    /// Bounding rectangle.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> RectF {
        self.rect
    }

    /// Append this rounded rectangle to the stream.
    pub fn write_to(&self, writer: &mut StreamWriter) -> Result<(), StreamError> {
        self.rect.write_to(writer)?;
        writer.append_f32(self.radii.top_left)?;
        writer.append_f32(self.radii.top_right)?;
        writer.append_f32(self.radii.bottom_right)?;
        writer.append_f32(self.radii.bottom_left)
    }

    /// Read a rounded rectangle from a cursor.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Self {
        let rect = RectF::read_from(cursor);
        Self {
            rect,
            radii: RoundedRectRadiiF::new(
                cursor.read_f32(),
                cursor.read_f32(),
                cursor.read_f32(),
                cursor.read_f32(),
            ),
        }
    }
}

/// Serialized size of an affine transform: six f32 coefficients.
pub const AFFINE_BYTES: usize = 24;

/// Append an affine transform to the stream as six f32 coefficients in
/// kurbo's `as_coeffs` order.
///
/// The wire format narrows kurbo's f64 coefficients to the stream's 32-bit
/// scalar width; the routine is stable for a given transform.
pub fn write_affine(writer: &mut StreamWriter, affine: &Affine) -> Result<(), StreamError> {
    for c in affine.as_coeffs() {
        writer.append_f32(c as f32)?;
    }
    Ok(())
}

/// Read an affine transform written by [`write_affine`].
#[must_use]
pub fn read_affine(cursor: &mut ByteCursor<'_>) -> Affine {
    let mut coeffs = [0.0_f64; 6];
    for c in &mut coeffs {
        *c = f64::from(cursor.read_f32());
    }
    Affine::new(coeffs)
}
