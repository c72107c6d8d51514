// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shadow canvas: the matrix/clip tracker behind the recorder.
//!
//! The recorder does not render, but callers still ask it geometric
//! questions mid-recording ("what is the current transform?", "what are
//! the clip bounds?") and expect the same answers replay would give. The
//! shadow canvas mirrors every state transition to provide them.
//!
//! The clip is tracked as conservative device-space bounds: a rectangle
//! guaranteed to contain the true clip, with `None` meaning unbounded.
//! That is enough for visibility and culling queries, and it keeps the
//! recorder free of real region math.

use alloc::vec::Vec;

use kurbo::Affine;

use crate::geom::RectF;
use crate::opcode::ClipVerb;

#[derive(Clone, Debug)]
struct CanvasState {
    matrix: Affine,
    /// Conservative device-space clip bounds; `None` is unbounded.
    clip: Option<RectF>,
}

/// Tracks the matrix and conservative clip state of a recording.
#[derive(Clone, Debug)]
pub struct ShadowCanvas {
    stack: Vec<CanvasState>,
}

impl Default for ShadowCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowCanvas {
    /// Creates a tracker with an identity transform and unbounded clip.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: alloc::vec![CanvasState {
                matrix: Affine::IDENTITY,
                clip: None,
            }],
        }
    }

    fn top(&self) -> &CanvasState {
        self.stack.last().expect("shadow canvas stack is never empty")
    }

    fn top_mut(&mut self) -> &mut CanvasState {
        self.stack
            .last_mut()
            .expect("shadow canvas stack is never empty")
    }

    /// Number of states on the stack; 1 when nothing is saved.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.stack.len()
    }

    /// Pushes the current state, returning the save count before the push.
    pub fn save(&mut self) -> usize {
        let count = self.stack.len();
        let top = self.top().clone();
        self.stack.push(top);
        count
    }

    /// Pops the innermost save. The base state is never popped.
    pub fn restore(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Pops saves until the stack is `count` deep.
    pub fn restore_to_count(&mut self, count: usize) {
        let count = count.max(1);
        while self.stack.len() > count {
            self.stack.pop();
        }
    }

    /// The current transform.
    #[inline]
    #[must_use]
    pub fn total_matrix(&self) -> Affine {
        self.top().matrix
    }

    /// Conservative device-space clip bounds; `None` is unbounded.
    #[inline]
    #[must_use]
    pub fn clip_bounds(&self) -> Option<RectF> {
        self.top().clip
    }

    /// Pre-concatenates a translation.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.concat(Affine::translate((f64::from(dx), f64::from(dy))));
    }

    /// Pre-concatenates a scale.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.concat(Affine::scale_non_uniform(f64::from(sx), f64::from(sy)));
    }

    /// Pre-concatenates a rotation in radians.
    pub fn rotate(&mut self, radians: f32) {
        self.concat(Affine::rotate(f64::from(radians)));
    }

    /// Pre-concatenates a skew.
    pub fn skew(&mut self, sx: f32, sy: f32) {
        self.concat(Affine::skew(f64::from(sx), f64::from(sy)));
    }

    /// Pre-concatenates an arbitrary transform.
    pub fn concat(&mut self, matrix: Affine) {
        let top = self.top_mut();
        top.matrix = top.matrix * matrix;
    }

    /// Replaces the current transform.
    pub fn set_matrix(&mut self, matrix: Affine) {
        self.top_mut().matrix = matrix;
    }

    /// Applies a rectangle clip in local coordinates.
    pub fn clip_rect(&mut self, rect: &RectF, verb: ClipVerb) {
        let device = self.map_rect(rect);
        self.apply_device_clip(device, verb);
    }

    /// Applies a clip already expressed in device coordinates.
    pub fn clip_device_rect(&mut self, rect: RectF, verb: ClipVerb) {
        self.apply_device_clip(rect, verb);
    }

    /// Conservatively applies a clip known only by its local-space bounds.
    ///
    /// Used when the recorder is asked to track a path or rounded-rect clip
    /// by bounds alone. Shrinking verbs on a regular fill can be applied as
    /// a rectangle clip; anything that can grow the clip through an inverse
    /// fill degrades to "unbounded", which is always safe.
    pub fn update_clip_conservatively_using_bounds(
        &mut self,
        bounds: &RectF,
        verb: ClipVerb,
        inverse_filled: bool,
    ) {
        if inverse_filled {
            match verb {
                ClipVerb::Intersect | ClipVerb::Difference => {
                    // These can only shrink the clip; keeping the current
                    // bounds stays conservative.
                }
                ClipVerb::Union
                | ClipVerb::Xor
                | ClipVerb::ReverseDifference
                | ClipVerb::Replace => {
                    self.top_mut().clip = None;
                }
            }
        } else {
            self.clip_rect(bounds, verb);
        }
    }

    /// Device-space bounding box of a local-space rectangle under the
    /// current transform.
    #[must_use]
    pub fn map_rect(&self, rect: &RectF) -> RectF {
        RectF::from_kurbo(
            self.total_matrix()
                .transform_rect_bbox(rect.to_kurbo()),
        )
    }

    fn apply_device_clip(&mut self, device: RectF, verb: ClipVerb) {
        let top = self.top_mut();
        match verb {
            ClipVerb::Intersect => {
                top.clip = Some(match top.clip {
                    Some(clip) => clip.intersect(&device),
                    None => device,
                });
            }
            ClipVerb::Difference => {
                // Removing area never grows the clip; the current bounds
                // remain a valid cover.
            }
            ClipVerb::Union | ClipVerb::Xor | ClipVerb::ReverseDifference => {
                top.clip = top.clip.map(|clip| clip.union(&device));
            }
            ClipVerb::Replace => {
                top.clip = Some(device);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_round_trips_state() {
        let mut canvas = ShadowCanvas::new();
        assert_eq!(canvas.save_count(), 1);

        canvas.translate(10.0, 0.0);
        let saved = canvas.save();
        assert_eq!(saved, 1);
        canvas.scale(2.0, 2.0);
        assert_ne!(canvas.total_matrix(), Affine::translate((10.0, 0.0)));

        canvas.restore();
        assert_eq!(canvas.total_matrix(), Affine::translate((10.0, 0.0)));
        assert_eq!(canvas.save_count(), 1);

        // The base state survives a stray restore.
        canvas.restore();
        assert_eq!(canvas.save_count(), 1);
    }

    #[test]
    fn intersect_clip_tracks_device_bounds() {
        let mut canvas = ShadowCanvas::new();
        canvas.translate(5.0, 5.0);
        canvas.clip_rect(&RectF::new(0.0, 0.0, 10.0, 10.0), ClipVerb::Intersect);
        assert_eq!(canvas.clip_bounds(), Some(RectF::new(5.0, 5.0, 15.0, 15.0)));

        canvas.clip_rect(&RectF::new(0.0, 0.0, 3.0, 30.0), ClipVerb::Intersect);
        assert_eq!(canvas.clip_bounds(), Some(RectF::new(5.0, 5.0, 8.0, 15.0)));
    }

    #[test]
    fn expanding_clip_grows_bounds() {
        let mut canvas = ShadowCanvas::new();
        canvas.clip_rect(&RectF::new(0.0, 0.0, 10.0, 10.0), ClipVerb::Intersect);
        canvas.clip_rect(&RectF::new(20.0, 0.0, 30.0, 10.0), ClipVerb::Union);
        assert_eq!(canvas.clip_bounds(), Some(RectF::new(0.0, 0.0, 30.0, 10.0)));
    }

    #[test]
    fn difference_clip_keeps_current_bounds() {
        let mut canvas = ShadowCanvas::new();
        canvas.clip_rect(&RectF::new(0.0, 0.0, 10.0, 10.0), ClipVerb::Intersect);
        canvas.clip_rect(&RectF::new(0.0, 0.0, 5.0, 5.0), ClipVerb::Difference);
        assert_eq!(canvas.clip_bounds(), Some(RectF::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn inverse_fill_degrades_to_unbounded_on_expanding_verbs() {
        let mut canvas = ShadowCanvas::new();
        canvas.clip_rect(&RectF::new(0.0, 0.0, 10.0, 10.0), ClipVerb::Intersect);

        let bounds = RectF::new(2.0, 2.0, 4.0, 4.0);
        canvas.update_clip_conservatively_using_bounds(&bounds, ClipVerb::Intersect, true);
        assert_eq!(canvas.clip_bounds(), Some(RectF::new(0.0, 0.0, 10.0, 10.0)));

        canvas.update_clip_conservatively_using_bounds(&bounds, ClipVerb::Replace, true);
        assert_eq!(canvas.clip_bounds(), None);
    }

    #[test]
    fn restore_unwinds_clip() {
        let mut canvas = ShadowCanvas::new();
        canvas.save();
        canvas.clip_rect(&RectF::new(0.0, 0.0, 4.0, 4.0), ClipVerb::Intersect);
        assert!(canvas.clip_bounds().is_some());
        canvas.restore();
        assert_eq!(canvas.clip_bounds(), None);
    }
}
