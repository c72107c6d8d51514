// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bitmaps and the deduplicating bitmap table.
//!
//! A [`Bitmap`] is a shared pixel buffer plus an optional sub-rect view.
//! The stream stores bitmap handles, and the table keeps each referenced
//! bitmap alive until the recording is retired. Deduplication is by content
//! identity: the same pixel buffer viewed through the same sub-rect maps to
//! the same handle, regardless of how many `Bitmap` values point at it.

use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::geom::IRect;

/// Immutable, shared pixel storage.
///
/// The recorder never reads the pixels; it only needs identity (for
/// deduplication) and dimensions (for validity).
#[derive(Debug)]
pub struct PixelRef {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelRef {
    /// Creates pixel storage of the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Pixel width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// A view of shared pixels, optionally restricted to a sub-rect.
#[derive(Clone, Debug)]
pub struct Bitmap {
    pixels: Arc<PixelRef>,
    subset: Option<IRect>,
}

impl Bitmap {
    /// Creates a bitmap covering the whole pixel buffer.
    #[must_use]
    pub fn new(pixels: Arc<PixelRef>) -> Self {
        Self {
            pixels,
            subset: None,
        }
    }

    /// Creates a bitmap viewing a sub-rect of the pixel buffer.
    #[must_use]
    pub fn with_subset(pixels: Arc<PixelRef>, subset: IRect) -> Self {
        Self {
            pixels,
            subset: Some(subset),
        }
    }

    /// The shared pixel storage.
    #[inline]
    #[must_use]
    pub fn pixel_ref(&self) -> &Arc<PixelRef> {
        &self.pixels
    }

    /// The sub-rect view, if any.
    #[inline]
    #[must_use]
    pub fn subset(&self) -> Option<IRect> {
        self.subset
    }

    /// Returns `true` when the bitmap has drawable pixels.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.pixels.width == 0 || self.pixels.height == 0 {
            return false;
        }
        match self.subset {
            Some(rect) => !rect.is_empty(),
            None => true,
        }
    }
}

/// Handle value recorded for a bitmap that failed to insert.
///
/// The invalid handle is written into the stream so a reader can detect and
/// skip the command; recording continues.
pub const INVALID_SLOT: u32 = u32::MAX;

/// Deduplicating table of bitmaps referenced by the stream.
#[derive(Debug, Default)]
pub struct BitmapTable {
    entries: Vec<Bitmap>,
    // Content identity: pixel-ref pointer + sub-rect.
    by_identity: HashMap<(usize, Option<IRect>), u32>,
}

impl BitmapTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct bitmaps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no bitmaps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `bitmap`, returning its 0-based handle, or [`INVALID_SLOT`]
    /// when the bitmap has no drawable pixels.
    ///
    /// The table clones the bitmap (bumping the pixel-ref count), so the
    /// pixels stay alive for the lifetime of the recording.
    pub fn insert(&mut self, bitmap: &Bitmap) -> u32 {
        if !bitmap.is_valid() {
            return INVALID_SLOT;
        }
        let key = (Arc::as_ptr(&bitmap.pixels) as usize, bitmap.subset);
        if let Some(&handle) = self.by_identity.get(&key) {
            return handle;
        }
        let handle = self.entries.len() as u32;
        self.entries.push(bitmap.clone());
        self.by_identity.insert(key, handle);
        handle
    }

    /// Returns the bitmap for a handle, if in range.
    #[must_use]
    pub fn get(&self, handle: u32) -> Option<&Bitmap> {
        self.entries.get(handle as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn pixels(w: u32, h: u32) -> Arc<PixelRef> {
        Arc::new(PixelRef::new(w, h, vec![0; (w * h * 4) as usize]))
    }

    #[test]
    fn same_pixels_and_subset_share_a_handle() {
        let mut table = BitmapTable::new();
        let px = pixels(4, 4);
        let a = Bitmap::new(px.clone());
        let b = Bitmap::new(px.clone());
        assert_eq!(table.insert(&a), table.insert(&b));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_subsets_get_distinct_handles() {
        let mut table = BitmapTable::new();
        let px = pixels(8, 8);
        let whole = Bitmap::new(px.clone());
        let corner = Bitmap::with_subset(px.clone(), IRect::new(0, 0, 4, 4));
        let h0 = table.insert(&whole);
        let h1 = table.insert(&corner);
        assert_ne!(h0, h1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn distinct_pixel_refs_do_not_dedup() {
        let mut table = BitmapTable::new();
        let a = Bitmap::new(pixels(2, 2));
        let b = Bitmap::new(pixels(2, 2));
        assert_ne!(table.insert(&a), table.insert(&b));
    }

    #[test]
    fn empty_bitmap_reports_invalid_slot() {
        let mut table = BitmapTable::new();
        let degenerate = Bitmap::new(pixels(0, 4));
        assert_eq!(table.insert(&degenerate), INVALID_SLOT);
        assert!(table.is_empty());

        let empty_subset = Bitmap::with_subset(pixels(4, 4), IRect::new(2, 2, 2, 2));
        assert_eq!(table.insert(&empty_subset), INVALID_SLOT);
    }
}
