// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recorder facade: one encoding method per drawing verb.
//!
//! [`PictureRecorder`] accepts the host canvas contract (save/restore,
//! matrix, clip, draw verbs) and encodes each call into the command stream.
//! Each verb computes its exact payload size up front, writes the packed
//! header, then appends payload fields in a fixed order; a debug assertion
//! checks that the bytes written match the declared size, and that every
//! paint handle lands at the offset [`crate::opcode::paint_offset`]
//! promises the optimizer.
//!
//! Alongside the stream the recorder maintains:
//!
//! - the resource tables (paints, paths, bitmaps, sub-pictures) that turn
//!   large objects into small handles,
//! - the restore-offset stack threading a linked list of restore-jump
//!   slots through recorded clip commands (back-patched at each restore),
//! - a [`ShadowCanvas`] mirroring matrix/clip state so geometric queries
//!   answer as replay would, and
//! - the peephole optimizer invoked at each restore.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;
use kurbo::{Affine, BezPath, PathEl, Shape};
use peniko::{BlendMode, Color};
use vellum_stream::{align4, StreamError, StreamWriter, WORD_SIZE};

use crate::bbh::{BoundingHierarchy, StateTree};
use crate::bitmap::{Bitmap, BitmapTable, INVALID_SLOT};
use crate::flat::PaintDictionary;
use crate::geom::{self, IRect, PointF, RectF, RoundedRectF, AFFINE_BYTES};
use crate::opcode::{self, ClipVerb, Opcode};
use crate::optimize;
use crate::paint::{color_to_u32, Paint};
use crate::region::Region;
use crate::resources::{PathTable, Picture, PictureTable};
use crate::shadow::ShadowCanvas;
use crate::trace::{RecordOpt, RecordTrace};

const U32_SIZE: u32 = WORD_SIZE as u32;

/// Total size of a `save` command: header + flags word.
pub(crate) const SAVE_SIZE: u32 = 2 * U32_SIZE;
/// Total size of a `save_layer` without bounds.
pub(crate) const SAVE_LAYER_NO_BOUNDS_SIZE: u32 = 4 * U32_SIZE;
/// Total size of a `save_layer` with bounds.
pub(crate) const SAVE_LAYER_WITH_BOUNDS_SIZE: u32 = 4 * U32_SIZE + RectF::BYTES as u32;

const DRAW_VERTICES_HAS_TEXS: u32 = 0x01;
const DRAW_VERTICES_HAS_COLORS: u32 = 0x02;
const DRAW_VERTICES_HAS_INDICES: u32 = 0x04;
const DRAW_VERTICES_HAS_XFER: u32 = 0x08;

bitflags! {
    /// What a `save` preserves, and layer behavior for `save_layer`.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct SaveFlags: u32 {
        /// The matrix is restored on the matching restore.
        const MATRIX = 1 << 0;
        /// The clip is restored on the matching restore.
        const CLIP = 1 << 1;
        /// The layer needs an alpha channel.
        const HAS_ALPHA_LAYER = 1 << 2;
        /// The layer needs full color fidelity.
        const FULL_COLOR_LAYER = 1 << 3;
        /// Drawing is clipped to the layer bounds.
        const CLIP_TO_LAYER = 1 << 4;
        /// Save both matrix and clip.
        const MATRIX_CLIP = Self::MATRIX.bits() | Self::CLIP.bits();
    }
}

bitflags! {
    /// Record-time behavior flags, selected at construction.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct RecordFlags: u32 {
        /// Track path and rounded-rect clips by their bounds only.
        const USE_PATH_BOUNDS_FOR_CLIP = 1 << 0;
        /// Reserved for future use.
        const OPTIMIZE_FOR_CLIP_PLAYBACK = 1 << 1;
        /// Bypass the restore-time peephole optimizer.
        const DISABLE_RECORD_OPTIMIZATIONS = 1 << 2;
    }
}

bitflags! {
    /// Behavior flags for `draw_bitmap_rect_to_rect`.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct DrawBitmapRectFlags: u32 {
        /// Allow filtering to sample outside the source rect.
        const BLEED = 1 << 0;
    }
}

/// How `draw_points` interprets its point array.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointMode {
    /// Draw each point individually.
    Points = 0,
    /// Draw segments between point pairs.
    Lines = 1,
    /// Draw a connected polyline.
    Polygon = 2,
}

/// How `draw_vertices` assembles triangles.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VertexMode {
    /// Independent triangles.
    Triangles = 0,
    /// Triangle strip.
    TriangleStrip = 1,
    /// Triangle fan.
    TriangleFan = 2,
}

/// Fill interpretation of a clip path.
///
/// Paths in this crate carry no fill type of their own, so clip calls state
/// it explicitly. Inverse fills select everything outside the path, which
/// matters for conservative clip tracking.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PathFill {
    /// Non-zero winding fill.
    #[default]
    Winding,
    /// Even-odd fill.
    EvenOdd,
    /// Everything outside the non-zero winding fill.
    InverseWinding,
    /// Everything outside the even-odd fill.
    InverseEvenOdd,
}

impl PathFill {
    /// Returns `true` for the inverse fills.
    #[must_use]
    pub const fn is_inverse(self) -> bool {
        matches!(self, Self::InverseWinding | Self::InverseEvenOdd)
    }
}

/// Error surfaced by recording calls.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecordError {
    /// The stream or a table could not allocate. The recording should be
    /// discarded; the recorder state is unspecified.
    OutOfMemory,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "recording allocation failed"),
        }
    }
}

impl core::error::Error for RecordError {}

impl From<StreamError> for RecordError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::OutOfMemory => Self::OutOfMemory,
        }
    }
}

/// Records drawing calls into a compact, replayable command stream.
///
/// The recorder is single-threaded and synchronous: every call completes
/// before the next. After [`PictureRecorder::end_recording`] the stream and
/// tables should be treated as read-only and handed to a player by
/// reference.
pub struct PictureRecorder {
    writer: StreamWriter,
    paints: PaintDictionary,
    paths: PathTable,
    bitmaps: BitmapTable,
    pictures: PictureTable,

    /// One entry per outstanding save: the negated save offset, or the
    /// offset of the newest restore-jump slot at that level.
    restore_offset_stack: Vec<i32>,
    /// Stack depth of the outermost open save_layer, if any.
    first_saved_layer_index: Option<usize>,
    initial_save_count: Option<usize>,

    flags: RecordFlags,
    canvas: ShadowCanvas,

    bounding_hierarchy: Option<Box<dyn BoundingHierarchy>>,
    state_tree: Option<Box<dyn StateTree>>,
    trace: Option<Box<dyn RecordTrace>>,
}

impl fmt::Debug for PictureRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PictureRecorder")
            .field("bytes_written", &self.writer.bytes_written())
            .field("flags", &self.flags)
            .field("save_depth", &self.restore_offset_stack.len())
            .finish_non_exhaustive()
    }
}

impl PictureRecorder {
    /// Creates an empty recorder with the given record-time flags.
    #[must_use]
    pub fn new(flags: RecordFlags) -> Self {
        Self {
            writer: StreamWriter::new(),
            paints: PaintDictionary::new(),
            paths: PathTable::new(),
            bitmaps: BitmapTable::new(),
            pictures: PictureTable::new(),
            restore_offset_stack: Vec::new(),
            first_saved_layer_index: None,
            initial_save_count: None,
            flags,
            canvas: ShadowCanvas::new(),
            bounding_hierarchy: None,
            state_tree: None,
            trace: None,
        }
    }

    /// Attaches a bounding-box hierarchy.
    ///
    /// Its presence disables the save/restore collapse optimization and
    /// subscribes it to rewind notifications.
    pub fn attach_bounding_hierarchy(&mut self, hierarchy: Box<dyn BoundingHierarchy>) {
        self.bounding_hierarchy = Some(hierarchy);
    }

    /// Attaches a state tree, subscribing it to save-collapse
    /// notifications.
    pub fn attach_state_tree(&mut self, tree: Box<dyn StateTree>) {
        self.state_tree = Some(tree);
    }

    /// Attaches an optimizer trace sink.
    pub fn set_trace(&mut self, trace: Box<dyn RecordTrace>) {
        self.trace = Some(trace);
    }

    /// Detaches and returns the optimizer trace sink.
    pub fn take_trace(&mut self) -> Option<Box<dyn RecordTrace>> {
        self.trace.take()
    }

    /// The recorded stream.
    #[inline]
    #[must_use]
    pub fn stream(&self) -> &StreamWriter {
        &self.writer
    }

    /// The paint dictionary.
    #[inline]
    #[must_use]
    pub fn paints(&self) -> &PaintDictionary {
        &self.paints
    }

    /// The path table.
    #[inline]
    #[must_use]
    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// The bitmap table.
    #[inline]
    #[must_use]
    pub fn bitmaps(&self) -> &BitmapTable {
        &self.bitmaps
    }

    /// The sub-picture table.
    #[inline]
    #[must_use]
    pub fn pictures(&self) -> &PictureTable {
        &self.pictures
    }

    /// The current transform, as replay would compute it.
    #[inline]
    #[must_use]
    pub fn total_matrix(&self) -> Affine {
        self.canvas.total_matrix()
    }

    /// Conservative device-space clip bounds; `None` is unbounded.
    #[inline]
    #[must_use]
    pub fn clip_bounds(&self) -> Option<RectF> {
        self.canvas.clip_bounds()
    }

    /// Current save count, starting at 1 for a fresh recorder.
    #[inline]
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.canvas.save_count()
    }

    /// Returns `true` while any save_layer is open.
    #[must_use]
    pub fn is_drawing_to_layer(&self) -> bool {
        self.first_saved_layer_index.is_some()
    }

    // ---------------------------------------------------------------------
    // Lifecycle

    /// Starts the recording by emitting the top-level save.
    pub fn begin_recording(&mut self) -> Result<(), RecordError> {
        debug_assert!(self.initial_save_count.is_none(), "already recording");
        let count = self.save(SaveFlags::MATRIX_CLIP)?;
        self.initial_save_count = Some(count);
        Ok(())
    }

    /// Ends the recording, restoring any saves left open (including the
    /// top-level one from [`PictureRecorder::begin_recording`]).
    pub fn end_recording(&mut self) -> Result<(), RecordError> {
        debug_assert!(self.initial_save_count.is_some(), "not recording");
        if let Some(count) = self.initial_save_count.take() {
            self.restore_to_count(count)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Save / restore

    /// Pushes the matrix/clip state; returns the save count before the
    /// push.
    pub fn save(&mut self, flags: SaveFlags) -> Result<usize, RecordError> {
        // Negated so the restore-jump chain can tell the save terminator
        // apart from clip slot offsets, which are positive.
        self.restore_offset_stack
            .push(-(self.writer.bytes_written() as i32));
        self.record_save(flags)?;
        Ok(self.canvas.save())
    }

    fn record_save(&mut self, flags: SaveFlags) -> Result<(), RecordError> {
        let mut size = SAVE_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::Save, &mut size)?;
        self.writer.append_u32(flags.bits())?;
        self.validate(initial, size);
        Ok(())
    }

    /// Pushes state and opens a layer; returns the save count before the
    /// push.
    ///
    /// `bounds`, when given, is a hint for the layer's extent and also
    /// narrows the tracked clip.
    pub fn save_layer(
        &mut self,
        bounds: Option<&RectF>,
        paint: Option<&Paint>,
        flags: SaveFlags,
    ) -> Result<usize, RecordError> {
        self.restore_offset_stack
            .push(-(self.writer.bytes_written() as i32));
        self.record_save_layer(bounds, paint, flags)?;
        if self.first_saved_layer_index.is_none() {
            self.first_saved_layer_index = Some(self.restore_offset_stack.len());
        }

        // The layer itself is not simulated; its state scope and bounds
        // clip are.
        let count = self.canvas.save();
        if let Some(bounds) = bounds {
            self.canvas.clip_rect(bounds, ClipVerb::Intersect);
        }
        Ok(count)
    }

    fn record_save_layer(
        &mut self,
        bounds: Option<&RectF>,
        paint: Option<&Paint>,
        flags: SaveFlags,
    ) -> Result<(), RecordError> {
        // Header + has-bounds bool + optional rect + paint handle + flags.
        let mut size = 2 * U32_SIZE;
        if bounds.is_some() {
            size += RectF::BYTES as u32;
        }
        size += 2 * U32_SIZE;
        debug_assert!(size == SAVE_LAYER_NO_BOUNDS_SIZE || size == SAVE_LAYER_WITH_BOUNDS_SIZE);

        let initial = opcode::write_header(&mut self.writer, Opcode::SaveLayer, &mut size)?;
        self.add_rect_opt(bounds)?;
        self.assert_paint_position(initial, Opcode::SaveLayer, size);
        self.add_paint_opt(paint)?;
        self.writer.append_u32(flags.bits())?;
        self.validate(initial, size);
        Ok(())
    }

    /// Pops the innermost save, running the peephole optimizer first.
    ///
    /// A restore without a matching save is a no-op.
    pub fn restore(&mut self) -> Result<(), RecordError> {
        let Some(&stack_top) = self.restore_offset_stack.last() else {
            debug_assert!(false, "restore without matching save");
            return Ok(());
        };

        if Some(self.restore_offset_stack.len()) == self.first_saved_layer_index {
            self.first_saved_layer_index = None;
        }

        let mut fired = None;
        if !self
            .flags
            .contains(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS)
        {
            fired = optimize::apply_peephole(
                &mut self.writer,
                &mut self.paints,
                stack_top,
                self.bounding_hierarchy.is_some(),
                self.trace.as_deref_mut(),
            );
        }

        match fired {
            Some(RecordOpt::CollapseSaveClipRestore) => {
                let stream_length = self.writer.bytes_written();
                if let Some(hierarchy) = &mut self.bounding_hierarchy {
                    hierarchy.rewind_inserts(stream_length);
                }
            }
            Some(RecordOpt::RemoveSaveLayerDirect | RecordOpt::RemoveSaveLayerNested) => {
                if let Some(tree) = &mut self.state_tree {
                    tree.save_collapsed();
                }
            }
            None => self.record_restore()?,
        }

        self.restore_offset_stack.pop();
        self.canvas.restore();
        Ok(())
    }

    fn record_restore(&mut self) -> Result<(), RecordError> {
        // Patch every pending jump slot at this level to the restore's
        // offset before the restore is appended there.
        self.fill_restore_offsets_for_current_level(self.writer.bytes_written());
        let mut size = U32_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::Restore, &mut size)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Restores until the save count is `count`.
    pub fn restore_to_count(&mut self, count: usize) -> Result<(), RecordError> {
        let count = count.max(1);
        while self.canvas.save_count() > count {
            self.restore()?;
        }
        Ok(())
    }

    /// Overwrites every restore-jump slot on the current level with
    /// `target`, following the linked list threaded through the stream.
    fn fill_restore_offsets_for_current_level(&mut self, target: u32) {
        let Some(&top) = self.restore_offset_stack.last() else {
            return;
        };
        let mut offset = top;
        while offset > 0 {
            let next = self.writer.read_i32_at(offset as u32);
            self.writer.write_u32_at(offset as u32, target);
            offset = next;
        }

        if offset < 0 {
            // The chain must terminate at the save that opened this level.
            let (op, _) = opcode::peek_op_and_size(&self.writer, (-offset) as u32);
            debug_assert!(
                matches!(op, Opcode::Save | Opcode::SaveLayer),
                "restore chain terminated at {op:?}"
            );
        }
    }

    /// Reserves a restore-jump slot for a clip command and links it into
    /// the current level's chain.
    ///
    /// For expanding verbs the existing chain is first zeroed: a previously
    /// empty clip can no longer prove the save block invisible once the
    /// clip may grow.
    fn record_restore_offset_placeholder(&mut self, verb: ClipVerb) -> Result<(), RecordError> {
        if self.restore_offset_stack.is_empty() {
            return Ok(());
        }

        let mut prev_offset = *self.restore_offset_stack.last().expect("checked non-empty");
        if verb.expands() {
            self.fill_restore_offsets_for_current_level(0);
            // Keep later restores from overwriting the offsets just
            // cleared.
            prev_offset = 0;
        }

        let offset = self.writer.bytes_written();
        self.writer.append_i32(prev_offset)?;
        *self
            .restore_offset_stack
            .last_mut()
            .expect("checked non-empty") = offset as i32;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Matrix

    /// Translates the current transform.
    pub fn translate(&mut self, dx: f32, dy: f32) -> Result<(), RecordError> {
        let mut size = U32_SIZE + 2 * 4;
        let initial = opcode::write_header(&mut self.writer, Opcode::Translate, &mut size)?;
        self.writer.append_f32(dx)?;
        self.writer.append_f32(dy)?;
        self.validate(initial, size);
        self.canvas.translate(dx, dy);
        Ok(())
    }

    /// Scales the current transform.
    pub fn scale(&mut self, sx: f32, sy: f32) -> Result<(), RecordError> {
        let mut size = U32_SIZE + 2 * 4;
        let initial = opcode::write_header(&mut self.writer, Opcode::Scale, &mut size)?;
        self.writer.append_f32(sx)?;
        self.writer.append_f32(sy)?;
        self.validate(initial, size);
        self.canvas.scale(sx, sy);
        Ok(())
    }

    /// Rotates the current transform by `radians`.
    pub fn rotate(&mut self, radians: f32) -> Result<(), RecordError> {
        let mut size = U32_SIZE + 4;
        let initial = opcode::write_header(&mut self.writer, Opcode::Rotate, &mut size)?;
        self.writer.append_f32(radians)?;
        self.validate(initial, size);
        self.canvas.rotate(radians);
        Ok(())
    }

    /// Skews the current transform.
    pub fn skew(&mut self, sx: f32, sy: f32) -> Result<(), RecordError> {
        let mut size = U32_SIZE + 2 * 4;
        let initial = opcode::write_header(&mut self.writer, Opcode::Skew, &mut size)?;
        self.writer.append_f32(sx)?;
        self.writer.append_f32(sy)?;
        self.validate(initial, size);
        self.canvas.skew(sx, sy);
        Ok(())
    }

    /// Pre-concatenates `matrix` onto the current transform.
    pub fn concat(&mut self, matrix: Affine) -> Result<(), RecordError> {
        let mut size = U32_SIZE + AFFINE_BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::Concat, &mut size)?;
        geom::write_affine(&mut self.writer, &matrix)?;
        self.validate(initial, size);
        self.canvas.concat(matrix);
        Ok(())
    }

    /// Replaces the current transform.
    pub fn set_matrix(&mut self, matrix: Affine) -> Result<(), RecordError> {
        let mut size = U32_SIZE + AFFINE_BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::SetMatrix, &mut size)?;
        geom::write_affine(&mut self.writer, &matrix)?;
        self.validate(initial, size);
        self.canvas.set_matrix(matrix);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Clip

    /// Clips to a rectangle.
    pub fn clip_rect(
        &mut self,
        rect: &RectF,
        verb: ClipVerb,
        anti_alias: bool,
    ) -> Result<(), RecordError> {
        self.record_clip_rect(rect, verb, anti_alias)?;
        self.canvas.clip_rect(rect, verb);
        Ok(())
    }

    fn record_clip_rect(
        &mut self,
        rect: &RectF,
        verb: ClipVerb,
        anti_alias: bool,
    ) -> Result<(), RecordError> {
        let mut size = U32_SIZE + RectF::BYTES as u32 + U32_SIZE;
        if !self.restore_offset_stack.is_empty() {
            size += U32_SIZE;
        }
        let initial = opcode::write_header(&mut self.writer, Opcode::ClipRect, &mut size)?;
        rect.write_to(&mut self.writer)?;
        self.writer
            .append_u32(opcode::pack_clip_params(verb, anti_alias))?;
        self.record_restore_offset_placeholder(verb)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Clips to a rounded rectangle.
    ///
    /// A rounded rect whose radii are all zero records as a plain
    /// rectangle clip.
    pub fn clip_rrect(
        &mut self,
        rrect: &RoundedRectF,
        verb: ClipVerb,
        anti_alias: bool,
    ) -> Result<(), RecordError> {
        if rrect.is_rect() {
            return self.clip_rect(&rrect.bounds(), verb, anti_alias);
        }

        let mut size = U32_SIZE + RoundedRectF::BYTES as u32 + U32_SIZE;
        if !self.restore_offset_stack.is_empty() {
            size += U32_SIZE;
        }
        let initial = opcode::write_header(&mut self.writer, Opcode::ClipRRect, &mut size)?;
        rrect.write_to(&mut self.writer)?;
        self.writer
            .append_u32(opcode::pack_clip_params(verb, anti_alias))?;
        self.record_restore_offset_placeholder(verb)?;
        self.validate(initial, size);

        // The shadow clip is bounds-conservative either way; the flag
        // selects the same strategy replay would use.
        self.canvas
            .update_clip_conservatively_using_bounds(&rrect.bounds(), verb, false);
        Ok(())
    }

    /// Clips to a path.
    ///
    /// A non-inverse path that is exactly an axis-aligned rectangle
    /// records as a rectangle clip instead of entering the path table.
    pub fn clip_path(
        &mut self,
        path: &BezPath,
        fill: PathFill,
        verb: ClipVerb,
        anti_alias: bool,
    ) -> Result<(), RecordError> {
        if !fill.is_inverse() {
            if let Some(rect) = path_as_rect(path) {
                return self.clip_rect(&rect, verb, anti_alias);
            }
        }

        let handle = self.paths.append(path);
        self.record_clip_path(handle, verb, anti_alias)?;

        let bounds = RectF::from_kurbo(path.bounding_box());
        self.canvas
            .update_clip_conservatively_using_bounds(&bounds, verb, fill.is_inverse());
        Ok(())
    }

    fn record_clip_path(
        &mut self,
        path_handle: u32,
        verb: ClipVerb,
        anti_alias: bool,
    ) -> Result<(), RecordError> {
        let mut size = 3 * U32_SIZE;
        if !self.restore_offset_stack.is_empty() {
            size += U32_SIZE;
        }
        let initial = opcode::write_header(&mut self.writer, Opcode::ClipPath, &mut size)?;
        self.writer.append_u32(path_handle)?;
        self.writer
            .append_u32(opcode::pack_clip_params(verb, anti_alias))?;
        self.record_restore_offset_placeholder(verb)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Clips to a device-space region.
    pub fn clip_region(&mut self, region: &Region, verb: ClipVerb) -> Result<(), RecordError> {
        let mut size = 2 * U32_SIZE + region.serialized_size() as u32;
        if !self.restore_offset_stack.is_empty() {
            size += U32_SIZE;
        }
        let initial = opcode::write_header(&mut self.writer, Opcode::ClipRegion, &mut size)?;
        region.write_to(&mut self.writer)?;
        self.writer
            .append_u32(opcode::pack_clip_params(verb, false))?;
        self.record_restore_offset_placeholder(verb)?;
        self.validate(initial, size);

        let bounds = region.bounds();
        self.canvas.clip_device_rect(
            RectF::new(
                bounds.x0 as f32,
                bounds.y0 as f32,
                bounds.x1 as f32,
                bounds.y1 as f32,
            ),
            verb,
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Draw

    /// Clears the canvas with `color`.
    pub fn clear(&mut self, color: Color) -> Result<(), RecordError> {
        let mut size = 2 * U32_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawClear, &mut size)?;
        self.writer.append_u32(color_to_u32(color))?;
        self.validate(initial, size);
        Ok(())
    }

    /// Fills the clip with `paint`.
    pub fn draw_paint(&mut self, paint: &Paint) -> Result<(), RecordError> {
        let mut size = 2 * U32_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawPaint, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawPaint, size);
        self.add_paint(paint)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws points, lines, or a polyline.
    pub fn draw_points(
        &mut self,
        mode: PointMode,
        points: &[PointF],
        paint: &Paint,
    ) -> Result<(), RecordError> {
        let mut size = 4 * U32_SIZE + (points.len() * PointF::BYTES) as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawPoints, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawPoints, size);
        self.add_paint(paint)?;
        self.writer.append_u32(mode as u32)?;
        self.writer.append_u32(points.len() as u32)?;
        for point in points {
            point.write_to(&mut self.writer)?;
        }
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a rectangle.
    pub fn draw_rect(&mut self, rect: &RectF, paint: &Paint) -> Result<(), RecordError> {
        let mut size = 2 * U32_SIZE + RectF::BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawRect, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawRect, size);
        self.add_paint(paint)?;
        rect.write_to(&mut self.writer)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws an oval inscribed in `oval`.
    pub fn draw_oval(&mut self, oval: &RectF, paint: &Paint) -> Result<(), RecordError> {
        let mut size = 2 * U32_SIZE + RectF::BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawOval, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawOval, size);
        self.add_paint(paint)?;
        oval.write_to(&mut self.writer)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a rounded rectangle.
    ///
    /// Degenerate radii record as `draw_rect` or `draw_oval` instead.
    pub fn draw_rrect(&mut self, rrect: &RoundedRectF, paint: &Paint) -> Result<(), RecordError> {
        if rrect.is_rect() {
            return self.draw_rect(&rrect.bounds(), paint);
        }
        if rrect.is_oval() {
            return self.draw_oval(&rrect.bounds(), paint);
        }

        let mut size = 2 * U32_SIZE + RoundedRectF::BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawRRect, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawRRect, size);
        self.add_paint(paint)?;
        rrect.write_to(&mut self.writer)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a path.
    pub fn draw_path(&mut self, path: &BezPath, paint: &Paint) -> Result<(), RecordError> {
        let handle = self.paths.append(path);
        let mut size = 3 * U32_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawPath, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawPath, size);
        self.add_paint(paint)?;
        self.writer.append_u32(handle)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a bitmap with its top-left corner at `(left, top)`.
    pub fn draw_bitmap(
        &mut self,
        bitmap: &Bitmap,
        left: f32,
        top: f32,
        paint: Option<&Paint>,
    ) -> Result<(), RecordError> {
        let mut size = 3 * U32_SIZE + 2 * 4;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawBitmap, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawBitmap, size);
        self.add_paint_opt(paint)?;
        self.add_bitmap(bitmap)?;
        self.writer.append_f32(left)?;
        self.writer.append_f32(top)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a bitmap sub-rect scaled into a destination rect.
    pub fn draw_bitmap_rect_to_rect(
        &mut self,
        bitmap: &Bitmap,
        src: Option<&RectF>,
        dst: &RectF,
        paint: Option<&Paint>,
        flags: DrawBitmapRectFlags,
    ) -> Result<(), RecordError> {
        // Header + paint + bitmap + has-src bool + flags, plus the rects.
        let mut size = 5 * U32_SIZE + RectF::BYTES as u32;
        if src.is_some() {
            size += RectF::BYTES as u32;
        }
        let initial =
            opcode::write_header(&mut self.writer, Opcode::DrawBitmapRectToRect, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawBitmapRectToRect, size);
        self.add_paint_opt(paint)?;
        self.add_bitmap(bitmap)?;
        self.add_rect_opt(src)?;
        dst.write_to(&mut self.writer)?;
        self.writer.append_u32(flags.bits())?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a bitmap through an explicit matrix.
    pub fn draw_bitmap_matrix(
        &mut self,
        bitmap: &Bitmap,
        matrix: Affine,
        paint: Option<&Paint>,
    ) -> Result<(), RecordError> {
        let mut size = 3 * U32_SIZE + AFFINE_BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawBitmapMatrix, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawBitmapMatrix, size);
        self.add_paint_opt(paint)?;
        self.add_bitmap(bitmap)?;
        geom::write_affine(&mut self.writer, &matrix)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a bitmap with nine-patch stretching: `center` divides the
    /// bitmap into a 3×3 grid whose edges stretch to fill `dst`.
    pub fn draw_bitmap_nine(
        &mut self,
        bitmap: &Bitmap,
        center: &IRect,
        dst: &RectF,
        paint: Option<&Paint>,
    ) -> Result<(), RecordError> {
        let mut size = 3 * U32_SIZE + IRect::BYTES as u32 + RectF::BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawBitmapNine, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawBitmapNine, size);
        self.add_paint_opt(paint)?;
        self.add_bitmap(bitmap)?;
        center.write_to(&mut self.writer)?;
        dst.write_to(&mut self.writer)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a bitmap at integer device coordinates, ignoring the matrix.
    pub fn draw_sprite(
        &mut self,
        bitmap: &Bitmap,
        left: i32,
        top: i32,
        paint: Option<&Paint>,
    ) -> Result<(), RecordError> {
        let mut size = 5 * U32_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawSprite, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawSprite, size);
        self.add_paint_opt(paint)?;
        self.add_bitmap(bitmap)?;
        self.writer.append_i32(left)?;
        self.writer.append_i32(top)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a text blob at `(x, y)`.
    ///
    /// When the paint supports fast bounds and horizontal layout, the
    /// top/bottom variant is chosen and cached vertical bounds are
    /// appended so replay can cull without measuring text.
    pub fn draw_text(
        &mut self,
        text: &[u8],
        x: f32,
        y: f32,
        paint: &Paint,
    ) -> Result<(), RecordError> {
        let fast = !paint.vertical_text && paint.can_compute_fast_bounds();

        let mut size = 3 * U32_SIZE + align4(text.len()) as u32 + 2 * 4;
        if fast {
            size += 2 * 4;
        }

        let op = if fast {
            Opcode::DrawTextTopBottom
        } else {
            Opcode::DrawText
        };
        let initial = opcode::write_header(&mut self.writer, op, &mut size)?;
        self.assert_paint_position(initial, op, size);
        let (_, metrics) = self.add_paint_with_metrics(paint, fast)?;
        self.add_text(text)?;
        self.writer.append_f32(x)?;
        self.writer.append_f32(y)?;
        if let Some((top, bottom)) = metrics {
            self.writer.append_f32(top + y)?;
            self.writer.append_f32(bottom + y)?;
        }
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a text blob with one position per glyph.
    ///
    /// When every y coordinate is equal the command is rewritten to the
    /// horizontal variant, storing one constant y and an x array.
    pub fn draw_pos_text(
        &mut self,
        text: &[u8],
        pos: &[PointF],
        paint: &Paint,
    ) -> Result<(), RecordError> {
        let glyphs = paint.count_text(text);
        if glyphs == 0 {
            return Ok(());
        }
        debug_assert!(pos.len() >= glyphs, "fewer positions than glyphs");
        let glyphs = glyphs.min(pos.len());
        if glyphs == 0 {
            return Ok(());
        }

        let first_y = pos[0].y;
        let mut can_use_draw_h = true;
        let mut min_y = first_y;
        let mut max_y = first_y;
        for p in &pos[1..glyphs] {
            if p.y != first_y {
                can_use_draw_h = false;
                min_y = min_y.min(p.y);
                max_y = max_y.max(p.y);
            }
        }

        let fast_bounds = !paint.vertical_text && paint.can_compute_fast_bounds();
        let fast = can_use_draw_h && fast_bounds;

        let mut size = 3 * U32_SIZE + align4(text.len()) as u32 + U32_SIZE;
        if can_use_draw_h {
            if fast {
                size += 2 * 4;
            }
            size += 4 + (glyphs * 4) as u32;
        } else {
            size += (glyphs * PointF::BYTES) as u32;
            if fast_bounds {
                size += 2 * 4;
            }
        }

        let op = if fast {
            Opcode::DrawPosTextHTopBottom
        } else if can_use_draw_h {
            Opcode::DrawPosTextH
        } else if fast_bounds {
            Opcode::DrawPosTextTopBottom
        } else {
            Opcode::DrawPosText
        };
        let want_metrics = fast || (!can_use_draw_h && fast_bounds);
        let initial = opcode::write_header(&mut self.writer, op, &mut size)?;
        self.assert_paint_position(initial, op, size);
        let (_, metrics) = self.add_paint_with_metrics(paint, want_metrics)?;
        self.add_text(text)?;
        self.writer.append_u32(glyphs as u32)?;

        if can_use_draw_h {
            if let Some((top, bottom)) = metrics {
                self.writer.append_f32(top + first_y)?;
                self.writer.append_f32(bottom + first_y)?;
            }
            self.writer.append_f32(first_y)?;
            for p in &pos[..glyphs] {
                self.writer.append_f32(p.x)?;
            }
        } else {
            for p in &pos[..glyphs] {
                p.write_to(&mut self.writer)?;
            }
            if let Some((top, bottom)) = metrics {
                self.writer.append_f32(top + min_y)?;
                self.writer.append_f32(bottom + max_y)?;
            }
        }
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a text blob with per-glyph x positions on one baseline.
    pub fn draw_pos_text_h(
        &mut self,
        text: &[u8],
        xpos: &[f32],
        const_y: f32,
        paint: &Paint,
    ) -> Result<(), RecordError> {
        let glyphs = paint.count_text(text);
        if glyphs == 0 {
            return Ok(());
        }
        debug_assert!(xpos.len() >= glyphs, "fewer positions than glyphs");
        let glyphs = glyphs.min(xpos.len());
        if glyphs == 0 {
            return Ok(());
        }

        let fast = !paint.vertical_text && paint.can_compute_fast_bounds();

        let mut size = 3 * U32_SIZE + align4(text.len()) as u32 + U32_SIZE;
        if fast {
            size += 2 * 4;
        }
        size += U32_SIZE + (glyphs * 4) as u32;

        let op = if fast {
            Opcode::DrawPosTextHTopBottom
        } else {
            Opcode::DrawPosTextH
        };
        let initial = opcode::write_header(&mut self.writer, op, &mut size)?;
        self.assert_paint_position(initial, op, size);
        let (_, metrics) = self.add_paint_with_metrics(paint, fast)?;
        self.add_text(text)?;
        self.writer.append_u32(glyphs as u32)?;
        if let Some((top, bottom)) = metrics {
            self.writer.append_f32(top + const_y)?;
            self.writer.append_f32(bottom + const_y)?;
        }
        self.writer.append_f32(const_y)?;
        for x in &xpos[..glyphs] {
            self.writer.append_f32(*x)?;
        }
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a text blob along a path.
    pub fn draw_text_on_path(
        &mut self,
        text: &[u8],
        path: &BezPath,
        matrix: Option<&Affine>,
        paint: &Paint,
    ) -> Result<(), RecordError> {
        let handle = self.paths.append(path);
        let matrix = matrix.copied().unwrap_or(Affine::IDENTITY);

        let mut size =
            3 * U32_SIZE + align4(text.len()) as u32 + U32_SIZE + AFFINE_BYTES as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawTextOnPath, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawTextOnPath, size);
        self.add_paint(paint)?;
        self.add_text(text)?;
        self.writer.append_u32(handle)?;
        geom::write_affine(&mut self.writer, &matrix)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a vertex mesh.
    pub fn draw_vertices(
        &mut self,
        mode: VertexMode,
        vertices: &[PointF],
        texs: Option<&[PointF]>,
        colors: Option<&[Color]>,
        xfer: Option<BlendMode>,
        indices: Option<&[u16]>,
        paint: &Paint,
    ) -> Result<(), RecordError> {
        let texs = texs.filter(|t| !t.is_empty());
        let colors = colors.filter(|c| !c.is_empty());
        let indices = indices.filter(|i| !i.is_empty());
        debug_assert!(texs.is_none_or(|t| t.len() == vertices.len()));
        debug_assert!(colors.is_none_or(|c| c.len() == vertices.len()));

        let mut flags = 0;
        if texs.is_some() {
            flags |= DRAW_VERTICES_HAS_TEXS;
        }
        if colors.is_some() {
            flags |= DRAW_VERTICES_HAS_COLORS;
        }
        if indices.is_some() {
            flags |= DRAW_VERTICES_HAS_INDICES;
        }
        if xfer.is_some() {
            flags |= DRAW_VERTICES_HAS_XFER;
        }

        // Header + paint + flags + mode + count, then the arrays.
        let mut size = 5 * U32_SIZE + (vertices.len() * PointF::BYTES) as u32;
        if let Some(texs) = texs {
            size += (texs.len() * PointF::BYTES) as u32;
        }
        if let Some(colors) = colors {
            size += (colors.len() * 4) as u32;
        }
        if let Some(indices) = indices {
            size += U32_SIZE + align4(indices.len() * 2) as u32;
        }
        if xfer.is_some() {
            // Transfer modes occupy two words: mix and compose.
            size += 2 * U32_SIZE;
        }

        let initial = opcode::write_header(&mut self.writer, Opcode::DrawVertices, &mut size)?;
        self.assert_paint_position(initial, Opcode::DrawVertices, size);
        self.add_paint(paint)?;
        self.writer.append_u32(flags)?;
        self.writer.append_u32(mode as u32)?;
        self.writer.append_u32(vertices.len() as u32)?;
        for vertex in vertices {
            vertex.write_to(&mut self.writer)?;
        }
        if let Some(texs) = texs {
            for tex in texs {
                tex.write_to(&mut self.writer)?;
            }
        }
        if let Some(colors) = colors {
            for color in colors {
                self.writer.append_u32(color_to_u32(*color))?;
            }
        }
        if let Some(indices) = indices {
            self.writer.append_u32(indices.len() as u32)?;
            let mut bytes = Vec::with_capacity(indices.len() * 2);
            for index in indices {
                bytes.extend_from_slice(&index.to_le_bytes());
            }
            self.writer.append_padded(&bytes)?;
        }
        if let Some(xfer) = xfer {
            self.writer.append_u32(xfer.mix as u32)?;
            self.writer.append_u32(xfer.compose as u32)?;
        }
        self.validate(initial, size);
        Ok(())
    }

    /// Draws a nested picture.
    pub fn draw_picture(&mut self, picture: &Arc<Picture>) -> Result<(), RecordError> {
        let handle = self.pictures.insert(picture);
        let mut size = 2 * U32_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawPicture, &mut size)?;
        self.writer.append_u32(handle)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Embeds an opaque data blob in the stream.
    pub fn draw_data(&mut self, data: &[u8]) -> Result<(), RecordError> {
        let mut size = 2 * U32_SIZE + align4(data.len()) as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::DrawData, &mut size)?;
        self.writer.append_u32(data.len() as u32)?;
        self.writer.append_padded(data)?;
        self.validate(initial, size);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Comment groups

    /// Opens a comment group.
    pub fn begin_comment_group(&mut self, description: &str) -> Result<(), RecordError> {
        let mut size = 2 * U32_SIZE + align4(description.len()) as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::BeginCommentGroup, &mut size)?;
        self.writer.append_str(description)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Adds a keyword/value comment to the open group.
    pub fn add_comment(&mut self, keyword: &str, value: &str) -> Result<(), RecordError> {
        let mut size =
            3 * U32_SIZE + align4(keyword.len()) as u32 + align4(value.len()) as u32;
        let initial = opcode::write_header(&mut self.writer, Opcode::Comment, &mut size)?;
        self.writer.append_str(keyword)?;
        self.writer.append_str(value)?;
        self.validate(initial, size);
        Ok(())
    }

    /// Closes the open comment group.
    pub fn end_comment_group(&mut self) -> Result<(), RecordError> {
        let mut size = U32_SIZE;
        let initial = opcode::write_header(&mut self.writer, Opcode::EndCommentGroup, &mut size)?;
        self.validate(initial, size);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Payload helpers

    fn validate(&self, initial_offset: u32, size: u32) {
        debug_assert_eq!(
            initial_offset + size,
            self.writer.bytes_written(),
            "command size does not match bytes written"
        );
    }

    fn assert_paint_position(&self, initial_offset: u32, op: Opcode, size: u32) {
        debug_assert_eq!(
            initial_offset + opcode::paint_offset(op, size),
            self.writer.bytes_written(),
            "paint handle out of position for {op:?}"
        );
    }

    fn add_paint(&mut self, paint: &Paint) -> Result<u32, RecordError> {
        let index = self.paints.find_and_return_flat(paint)?.index();
        self.writer.append_u32(index)?;
        Ok(index)
    }

    fn add_paint_opt(&mut self, paint: Option<&Paint>) -> Result<u32, RecordError> {
        match paint {
            Some(paint) => self.add_paint(paint),
            None => {
                self.writer.append_u32(0)?;
                Ok(0)
            }
        }
    }

    /// Interns `paint` and appends its handle; also returns the cached
    /// font metrics when `want_metrics` is set.
    fn add_paint_with_metrics(
        &mut self,
        paint: &Paint,
        want_metrics: bool,
    ) -> Result<(u32, Option<(f32, f32)>), RecordError> {
        let (index, metrics) = {
            let flat = self.paints.find_and_return_flat(paint)?;
            let metrics = want_metrics.then(|| flat.top_bot(paint));
            (flat.index(), metrics)
        };
        self.writer.append_u32(index)?;
        Ok((index, metrics))
    }

    fn add_bitmap(&mut self, bitmap: &Bitmap) -> Result<(), RecordError> {
        let handle = self.bitmaps.insert(bitmap);
        // An invalid handle is recorded as-is so the reader can detect and
        // skip the command.
        debug_assert_ne!(handle, INVALID_SLOT, "recording an invalid bitmap");
        self.writer.append_u32(handle)?;
        Ok(())
    }

    fn add_rect_opt(&mut self, rect: Option<&RectF>) -> Result<(), RecordError> {
        self.writer.append_u32(u32::from(rect.is_some()))?;
        if let Some(rect) = rect {
            rect.write_to(&mut self.writer)?;
        }
        Ok(())
    }

    fn add_text(&mut self, text: &[u8]) -> Result<(), RecordError> {
        self.writer.append_u32(text.len() as u32)?;
        self.writer.append_padded(text)?;
        Ok(())
    }
}

/// Recognizes a closed, axis-aligned rectangle path.
///
/// Returns the rectangle when `path` is a single move followed by line
/// segments tracing the four rectangle edges (in either winding), with an
/// optional explicit close. Curves or extra subpaths disqualify it.
fn path_as_rect(path: &BezPath) -> Option<RectF> {
    let mut points: Vec<kurbo::Point> = Vec::new();
    let mut closed = false;

    for (i, el) in path.elements().iter().enumerate() {
        match el {
            PathEl::MoveTo(p) => {
                if i != 0 {
                    return None;
                }
                points.push(*p);
            }
            PathEl::LineTo(p) => {
                if closed {
                    return None;
                }
                points.push(*p);
            }
            PathEl::ClosePath => {
                if closed {
                    return None;
                }
                closed = true;
            }
            _ => return None,
        }
    }

    // Four corners, or five points when the path returns to its start
    // explicitly.
    if points.len() == 5 {
        if points[0] != points[4] {
            return None;
        }
        points.pop();
    }
    if points.len() != 4 {
        return None;
    }

    // Each edge must be axis-aligned, alternating direction.
    let mut horizontal = [false; 4];
    for i in 0..4 {
        let a = points[i];
        let b = points[(i + 1) % 4];
        if a.y == b.y && a.x != b.x {
            horizontal[i] = true;
        } else if a.x == b.x && a.y != b.y {
            horizontal[i] = false;
        } else {
            return None;
        }
    }
    if horizontal[0] == horizontal[1] || horizontal[1] == horizontal[2] {
        return None;
    }

    let xs = [points[0].x, points[1].x, points[2].x, points[3].x];
    let ys = [points[0].y, points[1].y, points[2].y, points[3].y];
    let x0 = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x1 = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y0 = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let y1 = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(RectF::new(x0 as f32, y0 as f32, x1 as f32, y1 as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_path_is_recognized() {
        let path = kurbo::Rect::new(1.0, 2.0, 5.0, 6.0).to_path(0.1);
        assert_eq!(path_as_rect(&path), Some(RectF::new(1.0, 2.0, 5.0, 6.0)));
    }

    #[test]
    fn non_rect_paths_are_rejected() {
        let circle = kurbo::Circle::new((0.0, 0.0), 3.0).to_path(0.1);
        assert_eq!(path_as_rect(&circle), None);

        let mut diagonal = BezPath::new();
        diagonal.move_to((0.0, 0.0));
        diagonal.line_to((4.0, 4.0));
        diagonal.line_to((0.0, 4.0));
        diagonal.close_path();
        assert_eq!(path_as_rect(&diagonal), None);
    }

    #[test]
    fn save_layer_sizes_match_constants() {
        let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
        recorder.begin_recording().unwrap();

        let start = recorder.stream().bytes_written();
        recorder.save_layer(None, None, SaveFlags::MATRIX_CLIP).unwrap();
        let after_no_bounds = recorder.stream().bytes_written();
        assert_eq!(after_no_bounds - start, SAVE_LAYER_NO_BOUNDS_SIZE);

        recorder
            .save_layer(
                Some(&RectF::new(0.0, 0.0, 8.0, 8.0)),
                None,
                SaveFlags::MATRIX_CLIP,
            )
            .unwrap();
        assert_eq!(
            recorder.stream().bytes_written() - after_no_bounds,
            SAVE_LAYER_WITH_BOUNDS_SIZE
        );
    }
}
