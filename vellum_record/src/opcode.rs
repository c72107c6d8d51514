// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opcodes, packed command headers, and the paint-offset contract.
//!
//! Every command in the stream starts with a 32-bit word packing an 8-bit
//! opcode in the high byte and a 24-bit inline size (total command bytes,
//! header included) in the low bits. A size of [`SIZE_MASK`] is a sentinel:
//! the true size follows in the next word. The inline size is what lets a
//! reader skip any command, including one rewritten to [`Opcode::Noop`],
//! without understanding its payload.

use vellum_stream::{StreamError, StreamWriter, WORD_SIZE};

/// The 24-bit inline-size mask, doubling as the overflow sentinel.
pub const SIZE_MASK: u32 = 0x00FF_FFFF;

/// Opcode of every recordable command.
///
/// The enumeration is closed; discriminants are stable only within a paired
/// recorder/player build and are not a persistence format.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Opcode {
    /// Reserved zero value; never emitted.
    Unused = 0,
    /// Clip to a path resource.
    ClipPath = 1,
    /// Clip to a region.
    ClipRegion = 2,
    /// Clip to a rectangle.
    ClipRect = 3,
    /// Clip to a rounded rectangle.
    ClipRRect = 4,
    /// Pre-concatenate a matrix onto the current transform.
    Concat = 5,
    /// Draw a bitmap at a point.
    DrawBitmap = 6,
    /// Draw a bitmap through an explicit matrix.
    DrawBitmapMatrix = 7,
    /// Draw a bitmap with nine-patch stretching.
    DrawBitmapNine = 8,
    /// Draw a bitmap sub-rect into a destination rect.
    DrawBitmapRectToRect = 9,
    /// Clear the canvas with a color.
    DrawClear = 10,
    /// Embed an opaque data blob.
    DrawData = 11,
    /// Draw an oval.
    DrawOval = 12,
    /// Fill the clip with a paint.
    DrawPaint = 13,
    /// Draw a path resource.
    DrawPath = 14,
    /// Draw a nested picture.
    DrawPicture = 15,
    /// Draw a point array.
    DrawPoints = 16,
    /// Draw positioned text.
    DrawPosText = 17,
    /// Positioned text with cached vertical bounds.
    DrawPosTextTopBottom = 18,
    /// Horizontally positioned text (one constant y).
    DrawPosTextH = 19,
    /// Horizontal positioned text with cached vertical bounds.
    DrawPosTextHTopBottom = 20,
    /// Draw a rectangle.
    DrawRect = 21,
    /// Draw a rounded rectangle.
    DrawRRect = 22,
    /// Draw a bitmap at integer device coordinates.
    DrawSprite = 23,
    /// Draw a text run at a point.
    DrawText = 24,
    /// Draw text along a path.
    DrawTextOnPath = 25,
    /// Text run with cached vertical bounds.
    DrawTextTopBottom = 26,
    /// Draw a vertex mesh.
    DrawVertices = 27,
    /// Pop the innermost save.
    Restore = 28,
    /// Rotate the current transform.
    Rotate = 29,
    /// Push the matrix/clip state.
    Save = 30,
    /// Push state and redirect drawing into a layer.
    SaveLayer = 31,
    /// Scale the current transform.
    Scale = 32,
    /// Replace the current transform.
    SetMatrix = 33,
    /// Skew the current transform.
    Skew = 34,
    /// Translate the current transform.
    Translate = 35,
    /// Erased command; retains its size so readers can skip it.
    Noop = 36,
    /// Open a comment group.
    BeginCommentGroup = 37,
    /// A keyword/value comment inside a group.
    Comment = 38,
    /// Close a comment group.
    EndCommentGroup = 39,
}

impl Opcode {
    /// Number of opcodes, for dense per-opcode tables.
    pub const COUNT: usize = 40;

    /// Decodes an opcode byte, returning `None` for out-of-range values.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Unused,
            1 => Self::ClipPath,
            2 => Self::ClipRegion,
            3 => Self::ClipRect,
            4 => Self::ClipRRect,
            5 => Self::Concat,
            6 => Self::DrawBitmap,
            7 => Self::DrawBitmapMatrix,
            8 => Self::DrawBitmapNine,
            9 => Self::DrawBitmapRectToRect,
            10 => Self::DrawClear,
            11 => Self::DrawData,
            12 => Self::DrawOval,
            13 => Self::DrawPaint,
            14 => Self::DrawPath,
            15 => Self::DrawPicture,
            16 => Self::DrawPoints,
            17 => Self::DrawPosText,
            18 => Self::DrawPosTextTopBottom,
            19 => Self::DrawPosTextH,
            20 => Self::DrawPosTextHTopBottom,
            21 => Self::DrawRect,
            22 => Self::DrawRRect,
            23 => Self::DrawSprite,
            24 => Self::DrawText,
            25 => Self::DrawTextOnPath,
            26 => Self::DrawTextTopBottom,
            27 => Self::DrawVertices,
            28 => Self::Restore,
            29 => Self::Rotate,
            30 => Self::Save,
            31 => Self::SaveLayer,
            32 => Self::Scale,
            33 => Self::SetMatrix,
            34 => Self::Skew,
            35 => Self::Translate,
            36 => Self::Noop,
            37 => Self::BeginCommentGroup,
            38 => Self::Comment,
            39 => Self::EndCommentGroup,
            _ => return None,
        })
    }

    /// Returns `true` for the four bitmap-drawing flavors.
    ///
    /// The peephole optimizer's pattern wildcard matches exactly this set.
    #[must_use]
    pub const fn is_bitmap_flavor(self) -> bool {
        matches!(
            self,
            Self::DrawBitmap
                | Self::DrawBitmapMatrix
                | Self::DrawBitmapNine
                | Self::DrawBitmapRectToRect
        )
    }

    /// Returns `true` for commands that produce pixels.
    #[must_use]
    pub const fn is_draw_verb(self) -> bool {
        matches!(
            self,
            Self::DrawBitmap
                | Self::DrawBitmapMatrix
                | Self::DrawBitmapNine
                | Self::DrawBitmapRectToRect
                | Self::DrawClear
                | Self::DrawData
                | Self::DrawOval
                | Self::DrawPaint
                | Self::DrawPath
                | Self::DrawPicture
                | Self::DrawPoints
                | Self::DrawPosText
                | Self::DrawPosTextTopBottom
                | Self::DrawPosTextH
                | Self::DrawPosTextHTopBottom
                | Self::DrawRect
                | Self::DrawRRect
                | Self::DrawSprite
                | Self::DrawText
                | Self::DrawTextOnPath
                | Self::DrawTextTopBottom
                | Self::DrawVertices
        )
    }
}

/// Packs an opcode and a 24-bit inline size into a header word.
#[inline]
#[must_use]
pub const fn pack_header(op: Opcode, size24: u32) -> u32 {
    ((op as u32) << 24) | (size24 & SIZE_MASK)
}

/// Splits a header word into its opcode byte and inline size.
#[inline]
#[must_use]
pub const fn unpack_header(word: u32) -> (u8, u32) {
    ((word >> 24) as u8, word & SIZE_MASK)
}

/// Appends a command header for `op`.
///
/// `size` is the total command size including the header. When it does not
/// fit in 24 bits the sentinel form is written, the extra size word is
/// appended, and `size` is bumped by that word so it still equals the bytes
/// the command occupies. Returns the command's starting offset.
pub fn write_header(
    writer: &mut StreamWriter,
    op: Opcode,
    size: &mut u32,
) -> Result<u32, StreamError> {
    debug_assert!(*size != 0, "zero-sized command");
    let offset = writer.bytes_written();
    if *size >= SIZE_MASK {
        writer.append_u32(pack_header(op, SIZE_MASK))?;
        *size += WORD_SIZE as u32;
        writer.append_u32(*size)?;
    } else {
        writer.append_u32(pack_header(op, *size))?;
    }
    Ok(offset)
}

/// Reads the opcode and total size of the command starting at `offset`.
///
/// Skipping `size` bytes from `offset` lands on the next command. An invalid
/// opcode byte or a zero size is a programmer error (the stream only ever
/// contains encoder output); release builds degrade to a 4-byte noop so a
/// skip walk still terminates.
#[must_use]
pub fn peek_op_and_size(writer: &StreamWriter, offset: u32) -> (Opcode, u32) {
    let (op_byte, mut size) = unpack_header(writer.read_u32_at(offset));
    if size == SIZE_MASK {
        size = writer.read_u32_at(offset + WORD_SIZE as u32);
    }
    let op = Opcode::from_u8(op_byte);
    debug_assert!(op.is_some(), "invalid opcode byte {op_byte} at {offset}");
    debug_assert!(size != 0, "zero-sized command at {offset}");
    match op {
        Some(op) if size != 0 => (op, size),
        _ => (Opcode::Noop, WORD_SIZE as u32),
    }
}

/// Rewrites the command at `offset` to [`Opcode::Noop`], preserving its size
/// field so readers continue to skip the right number of bytes.
pub fn convert_to_noop(writer: &mut StreamWriter, offset: u32) {
    let header = writer.read_u32_at(offset);
    writer.write_u32_at(offset, (header & SIZE_MASK) | ((Opcode::Noop as u32) << 24));
}

/// Byte offset of the paint handle from the start of a command, or 0 when
/// the command carries no paint.
///
/// This table is the contract between the encoder and the peephole
/// optimizer: the encoder asserts each paint handle lands here, and the
/// optimizer reads and rewrites handles through it. The offset depends only
/// on `(op, size)`; commands big enough to need the extended size word shift
/// every payload field by one word.
#[must_use]
pub fn paint_offset(op: Opcode, size: u32) -> u32 {
    // Paint handle position in words after the header, when the size fits
    // inline. Zero means the command has no paint.
    const PAINT_WORD: [u8; Opcode::COUNT] = [
        0, // Unused
        0, // ClipPath
        0, // ClipRegion
        0, // ClipRect
        0, // ClipRRect
        0, // Concat
        1, // DrawBitmap
        1, // DrawBitmapMatrix
        1, // DrawBitmapNine
        1, // DrawBitmapRectToRect
        0, // DrawClear
        0, // DrawData
        1, // DrawOval
        1, // DrawPaint
        1, // DrawPath
        0, // DrawPicture
        1, // DrawPoints
        1, // DrawPosText
        1, // DrawPosTextTopBottom
        1, // DrawPosTextH
        1, // DrawPosTextHTopBottom
        1, // DrawRect
        1, // DrawRRect
        1, // DrawSprite
        1, // DrawText
        1, // DrawTextOnPath
        1, // DrawTextTopBottom
        1, // DrawVertices
        0, // Restore
        0, // Rotate
        0, // Save
        0, // SaveLayer - varies with bounds, handled below
        0, // Scale
        0, // SetMatrix
        0, // Skew
        0, // Translate
        0, // Noop
        0, // BeginCommentGroup
        0, // Comment
        0, // EndCommentGroup
    ];

    let word = WORD_SIZE as u32;
    let overflow = if size >= SIZE_MASK { word } else { 0 };

    if op == Opcode::SaveLayer {
        // Header + has-bounds bool, then the optional bounds rect precedes
        // the paint handle.
        return match size - overflow {
            crate::recorder::SAVE_LAYER_NO_BOUNDS_SIZE => 2 * word + overflow,
            crate::recorder::SAVE_LAYER_WITH_BOUNDS_SIZE => {
                2 * word + crate::geom::RectF::BYTES as u32 + overflow
            }
            other => {
                debug_assert!(false, "unexpected save_layer size {other}");
                0
            }
        };
    }

    debug_assert!(PAINT_WORD[op as usize] != 0, "{op:?} has no paint");
    u32::from(PAINT_WORD[op as usize]) * word + overflow
}

/// Region combining operator carried by every clip command.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ClipVerb {
    /// Subtract the shape from the clip.
    Difference = 0,
    /// Intersect the clip with the shape.
    Intersect = 1,
    /// Union the clip with the shape.
    Union = 2,
    /// Exclusive-or the clip with the shape.
    Xor = 3,
    /// Subtract the clip from the shape.
    ReverseDifference = 4,
    /// Replace the clip with the shape.
    Replace = 5,
}

impl ClipVerb {
    /// Returns `true` when the operator can grow the clip.
    ///
    /// Expanding verbs invalidate earlier restore-jump slots at the same
    /// save level: a previously empty clip can no longer prove the whole
    /// block invisible.
    #[must_use]
    pub const fn expands(self) -> bool {
        matches!(
            self,
            Self::Union | Self::Xor | Self::ReverseDifference | Self::Replace
        )
    }

    /// Decodes a verb from its wire value.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Difference,
            1 => Self::Intersect,
            2 => Self::Union,
            3 => Self::Xor,
            4 => Self::ReverseDifference,
            5 => Self::Replace,
            _ => return None,
        })
    }
}

/// Packs a clip verb and its anti-alias flag into the clip-params word.
#[inline]
#[must_use]
pub const fn pack_clip_params(verb: ClipVerb, anti_alias: bool) -> u32 {
    ((verb as u32) << 1) | anti_alias as u32
}

/// Splits a clip-params word back into its verb and anti-alias flag.
#[must_use]
pub const fn unpack_clip_params(word: u32) -> (Option<ClipVerb>, bool) {
    (ClipVerb::from_u32(word >> 1), word & 1 != 0)
}
