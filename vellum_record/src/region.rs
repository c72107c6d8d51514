// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal region model for `clip_region`.
//!
//! The recorder never evaluates region geometry; it needs a stable
//! serializer and conservative bounds. A region is kept as a normalized
//! list of non-overlapping spans sorted top-to-bottom, left-to-right, so
//! that regions built from the same rectangles serialize identically.

use alloc::vec::Vec;

use vellum_stream::{ByteCursor, StreamError, StreamWriter};

use crate::geom::IRect;

/// A set of integer rectangles in device space.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Region {
    spans: Vec<IRect>,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a region covering a single rectangle.
    #[must_use]
    pub fn from_rect(rect: IRect) -> Self {
        Self::from_rects(&[rect])
    }

    /// Creates a region from a set of rectangles.
    ///
    /// Empty rectangles are dropped and the remainder sorted into the
    /// normalized span order. Overlapping inputs are kept as-is; the span
    /// list is a cover, not a partition.
    #[must_use]
    pub fn from_rects(rects: &[IRect]) -> Self {
        let mut spans: Vec<IRect> = rects.iter().copied().filter(|r| !r.is_empty()).collect();
        spans.sort_unstable_by_key(|r| (r.y0, r.x0, r.y1, r.x1));
        spans.dedup();
        Self { spans }
    }

    /// Returns `true` if the region covers nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The normalized span list.
    #[must_use]
    pub fn spans(&self) -> &[IRect] {
        &self.spans
    }

    /// Conservative bounding rectangle.
    #[must_use]
    pub fn bounds(&self) -> IRect {
        let mut bounds = IRect::default();
        for span in &self.spans {
            bounds = bounds.union(span);
        }
        bounds
    }

    /// Serialized size in bytes: a count word plus the spans.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        4 + self.spans.len() * IRect::BYTES
    }

    /// Append the region to the stream.
    pub fn write_to(&self, writer: &mut StreamWriter) -> Result<(), StreamError> {
        writer.append_u32(self.spans.len() as u32)?;
        for span in &self.spans {
            span.write_to(writer)?;
        }
        Ok(())
    }

    /// Read a region written by [`Region::write_to`].
    #[must_use]
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Option<Self> {
        let count = cursor.read_u32() as usize;
        if count * IRect::BYTES > cursor.remaining() {
            return None;
        }
        let mut spans = Vec::with_capacity(count);
        for _ in 0..count {
            spans.push(IRect::read_from(cursor));
        }
        Some(Self { spans })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_order_independent() {
        let a = IRect::new(0, 0, 4, 4);
        let b = IRect::new(0, 4, 2, 8);
        let forward = Region::from_rects(&[a, b]);
        let backward = Region::from_rects(&[b, a]);
        assert_eq!(forward, backward);

        let mut wa = StreamWriter::new();
        let mut wb = StreamWriter::new();
        forward.write_to(&mut wa).unwrap();
        backward.write_to(&mut wb).unwrap();
        assert_eq!(wa.as_bytes(), wb.as_bytes());
    }

    #[test]
    fn empty_rects_are_dropped() {
        let region = Region::from_rects(&[IRect::new(3, 3, 3, 9), IRect::new(0, 0, 1, 1)]);
        assert_eq!(region.spans().len(), 1);
    }

    #[test]
    fn bounds_cover_all_spans() {
        let region = Region::from_rects(&[IRect::new(0, 0, 4, 4), IRect::new(10, 2, 12, 20)]);
        assert_eq!(region.bounds(), IRect::new(0, 0, 12, 20));
    }

    #[test]
    fn serialization_round_trips() {
        let region = Region::from_rects(&[IRect::new(0, 0, 4, 4), IRect::new(4, 0, 8, 2)]);
        let mut w = StreamWriter::new();
        region.write_to(&mut w).unwrap();
        assert_eq!(w.bytes_written() as usize, region.serialized_size());
        let mut c = ByteCursor::new(w.as_bytes());
        assert_eq!(Region::read_from(&mut c), Some(region));
    }
}
