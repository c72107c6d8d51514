// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replay-accelerator hooks.
//!
//! A bounding-box hierarchy and a state tree are optional collaborators
//! built up alongside a recording to speed replay. The recorder does not
//! construct them; it only tells them when a peephole optimization has
//! invalidated spans they may have indexed.

/// A spatial index over recorded command spans.
pub trait BoundingHierarchy {
    /// The stream was rewound: discard any inserts at or beyond the new
    /// stream length.
    fn rewind_inserts(&mut self, stream_length: u32);
}

/// A save/restore traversal accelerator.
pub trait StateTree {
    /// A save block was folded away; the corresponding branch can be
    /// pruned from replay traversal.
    fn save_collapsed(&mut self);
}
