// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content-addressed interning of serialized paints.
//!
//! Command payloads never embed paints; they store a 1-based dictionary
//! index (0 means "no paint"). The dictionary keys entries on the paint's
//! canonical byte form, so two structurally equal paints always resolve to
//! the same index regardless of how they were constructed.
//!
//! Lookups use a hash-bucket index (hash → small list of candidate entries)
//! over an append-only entry vector, which keeps entry indices stable for
//! the lifetime of the recording.
//!
//! Each entry also lazily caches the paint's font top/bottom metrics: text
//! commands on the fast-bounds path need them once per distinct paint, not
//! once per draw.

use alloc::vec::Vec;
use core::cell::Cell;
use core::hash::BuildHasher;

use hashbrown::{DefaultHashBuilder, HashMap};
use vellum_stream::{ByteCursor, StreamError};

use crate::paint::Paint;

/// An interned paint: its 1-based index and canonical bytes.
#[derive(Debug)]
pub struct FlatData {
    index: u32,
    bytes: Vec<u8>,
    top_bot: Cell<Option<(f32, f32)>>,
}

impl FlatData {
    /// The entry's 1-based dictionary index.
    #[inline]
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The paint's canonical byte form.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Font (top, bottom) metrics for the interned paint, computed on
    /// first use and cached.
    #[must_use]
    pub fn top_bot(&self, paint: &Paint) -> (f32, f32) {
        if let Some(cached) = self.top_bot.get() {
            return cached;
        }
        let computed = paint.font_top_bottom();
        self.top_bot.set(Some(computed));
        computed
    }
}

/// Deduplicating dictionary of serialized paints.
#[derive(Debug, Default)]
pub struct PaintDictionary {
    entries: Vec<FlatData>,
    buckets: HashMap<u64, Vec<u32>>,
    build_hasher: DefaultHashBuilder,
}

impl PaintDictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interned paints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no paints have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interns `paint`, returning its entry.
    ///
    /// If a paint with identical canonical bytes was already interned, the
    /// existing entry is returned; otherwise the paint is serialized into a
    /// new entry with the next 1-based index.
    pub fn find_and_return_flat(&mut self, paint: &Paint) -> Result<&FlatData, StreamError> {
        let bytes = paint.to_bytes()?;
        let hash = self.build_hasher.hash_one(&bytes);

        let existing = self.buckets.get(&hash).and_then(|candidates| {
            candidates
                .iter()
                .copied()
                .find(|&slot| self.entries[slot as usize].bytes == bytes)
        });

        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = self.entries.len() as u32;
                self.entries.push(FlatData {
                    index: slot + 1,
                    bytes,
                    top_bot: Cell::new(None),
                });
                self.buckets.entry(hash).or_default().push(slot);
                slot
            }
        };
        Ok(&self.entries[slot as usize])
    }

    /// Returns the entry for a 1-based index, if in range. Index 0 ("no
    /// paint") returns `None`.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&FlatData> {
        let slot = index.checked_sub(1)?;
        self.entries.get(slot as usize)
    }

    /// Reconstructs the paint interned at a 1-based index.
    #[must_use]
    pub fn unflatten(&self, index: u32) -> Option<Paint> {
        let entry = self.get(index)?;
        let mut cursor = ByteCursor::new(&entry.bytes);
        let paint = Paint::read_from(&mut cursor)?;
        debug_assert!(cursor.is_exhausted(), "trailing bytes in flat paint");
        Some(paint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::PaintStyle;
    use peniko::Color;

    #[test]
    fn interning_is_deterministic() {
        let mut dict = PaintDictionary::new();
        let paint = Paint::from_color(Color::from_rgba8(1, 2, 3, 4));

        let first = dict.find_and_return_flat(&paint).unwrap().index();
        let second = dict.find_and_return_flat(&paint).unwrap().index();
        assert_eq!(first, 1);
        assert_eq!(first, second);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn structurally_equal_paints_share_an_entry() {
        let mut dict = PaintDictionary::new();
        let a = Paint {
            style: PaintStyle::Stroke,
            stroke_width: 2.0,
            ..Paint::default()
        };
        let b = Paint {
            style: PaintStyle::Stroke,
            stroke_width: 2.0,
            ..Paint::default()
        };
        let ia = dict.find_and_return_flat(&a).unwrap().index();
        let ib = dict.find_and_return_flat(&b).unwrap().index();
        assert_eq!(ia, ib);
    }

    #[test]
    fn distinct_paints_get_increasing_indices() {
        let mut dict = PaintDictionary::new();
        let mut indices = Vec::new();
        for alpha in [10_u8, 20, 30] {
            let paint = Paint::from_color(Color::from_rgba8(0, 0, 0, alpha));
            indices.push(dict.find_and_return_flat(&paint).unwrap().index());
        }
        assert_eq!(indices, [1, 2, 3]);
    }

    #[test]
    fn unflatten_restores_the_paint() {
        let mut dict = PaintDictionary::new();
        let paint = Paint {
            anti_alias: true,
            text_size: 20.0,
            ..Paint::from_color(Color::from_rgba8(5, 6, 7, 8))
        };
        let index = dict.find_and_return_flat(&paint).unwrap().index();
        assert_eq!(dict.unflatten(index), Some(paint));
        assert_eq!(dict.unflatten(0), None);
        assert_eq!(dict.unflatten(99), None);
    }

    #[test]
    fn top_bot_is_cached_per_entry() {
        let mut dict = PaintDictionary::new();
        let paint = Paint {
            text_size: 16.0,
            ..Paint::default()
        };
        let entry = dict.find_and_return_flat(&paint).unwrap();
        let first = entry.top_bot(&paint);
        assert_eq!(entry.top_bot(&paint), first);
        assert!(first.0 < 0.0 && first.1 > 0.0);
    }
}
