// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vellum Record: the command-stream recorder of the Vellum 2D picture
//! system.
//!
//! A [`PictureRecorder`] accepts high-level drawing operations (the host
//! canvas contract: save/restore, matrix, clip, and draw verbs) and encodes
//! them into a compact, self-describing byte stream that a paired player of
//! the same build can replay against a real renderer. The recorder does not
//! rasterize and does not interpret drawing semantics.
//!
//! # Stream shape
//!
//! The stream is a sequence of commands over a
//! [`vellum_stream::StreamWriter`]. Each command starts 4-byte aligned with
//! a packed `(opcode, size)` header ([`opcode`]), so a reader can skip any
//! command without parsing it — including commands the optimizer has
//! erased in place by rewriting their opcode to noop.
//!
//! Large objects never appear inline. Paints intern into a deduplicating
//! [`flat::PaintDictionary`]; paths, bitmaps, and nested pictures go into
//! handle tables ([`resources`], [`bitmap`]) that keep them alive until
//! the recording is retired. Payloads store the small integer handles.
//!
//! # Restore-time optimization
//!
//! At every `restore` the recorder runs a short list of peephole
//! transforms over the stream tail: redundant
//! save/clip/restore spans are rewound away, and `save_layer` + bitmap
//! draw patterns are folded into a single draw when the layer's paint is a
//! bare alpha. Clip commands carry back-patched "restore-jump" slots — a
//! linked list threaded through the stream — so a player can skip an
//! entire save block in O(1) when its clip rejects.
//!
//! # Example
//!
//! ```
//! use vellum_record::{PictureRecorder, RecordFlags, Paint, RectF, ClipVerb};
//! use peniko::Color;
//!
//! let mut recorder = PictureRecorder::new(RecordFlags::empty());
//! recorder.begin_recording()?;
//! recorder.save(vellum_record::SaveFlags::MATRIX_CLIP)?;
//! recorder.clip_rect(&RectF::new(0.0, 0.0, 100.0, 100.0), ClipVerb::Intersect, false)?;
//! recorder.draw_rect(
//!     &RectF::new(10.0, 10.0, 90.0, 90.0),
//!     &Paint::from_color(Color::from_rgba8(200, 30, 30, 255)),
//! )?;
//! recorder.restore()?;
//! recorder.end_recording()?;
//! assert!(!recorder.stream().is_empty());
//! # Ok::<(), vellum_record::RecordError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod bbh;
pub mod bitmap;
pub mod flat;
pub mod geom;
pub mod opcode;
mod optimize;
pub mod paint;
pub mod recorder;
pub mod region;
pub mod resources;
pub mod shadow;
pub mod trace;

pub use bbh::{BoundingHierarchy, StateTree};
pub use bitmap::{Bitmap, BitmapTable, PixelRef, INVALID_SLOT};
pub use flat::{FlatData, PaintDictionary};
pub use geom::{IRect, PointF, RectF, RoundedRectF, RoundedRectRadiiF};
pub use opcode::{ClipVerb, Opcode};
pub use paint::{
    BlurStyle, ColorFilter, ColorStop, ImageFilter, Looper, MaskFilter, Paint, PaintStyle,
    PathEffect, Rasterizer, Shader, TextEncoding, TileMode,
};
pub use recorder::{
    DrawBitmapRectFlags, PathFill, PictureRecorder, PointMode, RecordError, RecordFlags,
    SaveFlags, VertexMode,
};
pub use region::Region;
pub use resources::{PathTable, Picture, PictureTable};
pub use shadow::ShadowCanvas;
pub use trace::{CountingTrace, RecordOpt, RecordTrace};
