// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability hook for the peephole optimizer.
//!
//! The optimizer silently rewrites the stream, which makes "why did my
//! save_layer disappear?" hard to answer from the outside. This module
//! provides a minimal callback sink the recorder drives on every
//! optimization attempt, plus a small counting recorder for tests and
//! debugging.

/// The peephole transforms, in the order they are tried at each restore.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecordOpt {
    /// Drop a save…restore span containing only matrix/clip commands.
    CollapseSaveClipRestore,
    /// Fold `save_layer, draw_bitmap*` into the bitmap draw.
    RemoveSaveLayerDirect,
    /// Fold `save_layer, save, clip_rect, draw_bitmap*, restore` into the
    /// bitmap draw.
    RemoveSaveLayerNested,
}

impl RecordOpt {
    /// Number of transforms, for dense per-transform tables.
    pub const COUNT: usize = 3;

    /// Dense index of this transform.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::CollapseSaveClipRestore => 0,
            Self::RemoveSaveLayerDirect => 1,
            Self::RemoveSaveLayerNested => 2,
        }
    }
}

/// A callback sink for optimizer activity.
pub trait RecordTrace {
    /// Called before a transform is tried.
    fn attempted(&mut self, opt: RecordOpt);

    /// Called when a transform fired and rewrote the stream.
    fn fired(&mut self, opt: RecordOpt);
}

/// Counts attempts and fires per transform.
#[derive(Clone, Debug, Default)]
pub struct CountingTrace {
    /// Attempts per transform, indexed by [`RecordOpt::index`].
    pub attempted: [u32; RecordOpt::COUNT],
    /// Fires per transform, indexed by [`RecordOpt::index`].
    pub fired: [u32; RecordOpt::COUNT],
}

impl CountingTrace {
    /// Creates a zeroed recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total fires across all transforms.
    #[must_use]
    pub fn total_fired(&self) -> u32 {
        self.fired.iter().sum()
    }
}

impl RecordTrace for CountingTrace {
    fn attempted(&mut self, opt: RecordOpt) {
        self.attempted[opt.index()] += 1;
    }

    fn fired(&mut self, opt: RecordOpt) {
        self.fired[opt.index()] += 1;
    }
}
