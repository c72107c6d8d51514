// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path and sub-picture tables.
//!
//! Large objects never appear inline in the stream; commands store small
//! integer handles resolved through these tables. Paths append without
//! deduplication (callers rarely re-clip the same path object), while
//! sub-pictures dedup by pointer identity and keep a strong reference so
//! the picture outlives the recording.

use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::BezPath;

/// A finished recording that can be drawn into another recording.
///
/// The recorder treats pictures as opaque: it needs identity for
/// deduplication and liveness for the handed-off stream, nothing more.
#[derive(Debug, Default)]
pub struct Picture {
    stream: Vec<u8>,
}

impl Picture {
    /// Creates an empty picture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps recorded stream bytes as a picture.
    #[must_use]
    pub fn from_stream(stream: Vec<u8>) -> Self {
        Self { stream }
    }

    /// The recorded command stream.
    #[inline]
    #[must_use]
    pub fn stream(&self) -> &[u8] {
        &self.stream
    }
}

/// Append-only table of clip/draw paths.
///
/// Handles are 1-based insertion order; 0 is never a valid path handle.
#[derive(Debug, Default)]
pub struct PathTable {
    paths: Vec<BezPath>,
}

impl PathTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the table holds no paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Copies `path` into the table and returns its 1-based handle.
    pub fn append(&mut self, path: &BezPath) -> u32 {
        self.paths.push(path.clone());
        self.paths.len() as u32
    }

    /// Returns the path for a 1-based handle.
    #[must_use]
    pub fn get(&self, handle: u32) -> Option<&BezPath> {
        let slot = handle.checked_sub(1)?;
        self.paths.get(slot as usize)
    }
}

/// Identity-keyed table of nested pictures.
///
/// Handles are 1-based so 0 can mean "absent" in command payloads. The
/// first insert of a picture clones its `Arc` (the shared-reference bump);
/// later inserts of the same picture return the existing handle.
#[derive(Debug, Default)]
pub struct PictureTable {
    pictures: Vec<Arc<Picture>>,
}

impl PictureTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct pictures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    /// Returns `true` if the table holds no pictures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    /// Inserts `picture` and returns its 1-based handle.
    pub fn insert(&mut self, picture: &Arc<Picture>) -> u32 {
        for (slot, existing) in self.pictures.iter().enumerate() {
            if Arc::ptr_eq(existing, picture) {
                return slot as u32 + 1;
            }
        }
        self.pictures.push(picture.clone());
        self.pictures.len() as u32
    }

    /// Returns the picture for a 1-based handle.
    #[must_use]
    pub fn get(&self, handle: u32) -> Option<&Arc<Picture>> {
        let slot = handle.checked_sub(1)?;
        self.pictures.get(slot as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn path_handles_are_insertion_order() {
        let mut table = PathTable::new();
        let a = kurbo::Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1);
        let b = kurbo::Circle::new((0.0, 0.0), 2.0).to_path(0.1);
        assert_eq!(table.append(&a), 1);
        assert_eq!(table.append(&b), 2);
        // No dedup: appending the same path again gets a fresh handle.
        assert_eq!(table.append(&a), 3);
        assert!(table.get(0).is_none());
        assert!(table.get(2).is_some());
    }

    #[test]
    fn pictures_dedup_by_identity() {
        let mut table = PictureTable::new();
        let first = Arc::new(Picture::new());
        let second = Arc::new(Picture::new());

        assert_eq!(table.insert(&first), 1);
        assert_eq!(table.insert(&second), 2);
        assert_eq!(table.insert(&first), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn picture_table_keeps_a_strong_reference() {
        let mut table = PictureTable::new();
        let picture = Arc::new(Picture::new());
        table.insert(&picture);
        assert_eq!(Arc::strong_count(&picture), 2);
    }
}
