// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Peephole optimization of the command stream at restore time.
//!
//! Just before a `restore` is recorded, the recorder gives this module a
//! chance to rewrite the stream tail instead. Three transforms are tried in
//! order; the first that fires suppresses the restore:
//!
//! 1. [`collapse_save_clip_restore`] — a save block containing only
//!    matrix/clip commands draws nothing, so the whole span is rewound
//!    away.
//! 2. [`remove_save_layer_direct`] — `save_layer` + one bitmap draw: the
//!    layer's alpha can often be folded into the bitmap's paint, turning
//!    the block into a single draw.
//! 3. [`remove_save_layer_nested`] — the same fold through an intervening
//!    `save, clip_rect, …, restore`, a shape higher-level compositors
//!    commonly emit.
//!
//! All three locate the save by walking the restore-jump chain backwards
//! from the current stack level, pattern-match forward over the recorded
//! window (skipping noops), and rewrite commands in place by overwriting
//! opcodes or paint handles. Sizes are never changed, so skippability is
//! preserved.

use vellum_stream::StreamWriter;

use crate::flat::PaintDictionary;
use crate::opcode::{self, Opcode, SIZE_MASK};
use crate::paint::Paint;
use crate::recorder::{SaveFlags, SAVE_LAYER_WITH_BOUNDS_SIZE, SAVE_SIZE};
use crate::trace::{RecordOpt, RecordTrace};

/// One matched command: its actual opcode, start offset, and total size.
#[derive(Copy, Clone, Debug)]
struct CommandInfo {
    op: Opcode,
    offset: u32,
    size: u32,
}

/// One slot of a command pattern.
#[derive(Copy, Clone, Debug)]
enum PatternSlot {
    /// Matches a specific opcode.
    Op(Opcode),
    /// Matches any of the four bitmap-drawing flavors.
    AnyDrawBitmap,
}

/// Matches `pattern` against the commands starting at `offset`, skipping
/// noops, and requiring the final matched command to end exactly at
/// `bytes_written()`.
fn match_pattern<const N: usize>(
    writer: &StreamWriter,
    mut offset: u32,
    pattern: &[PatternSlot; N],
) -> Option<[CommandInfo; N]> {
    let end = writer.bytes_written();
    let mut results = [CommandInfo {
        op: Opcode::Noop,
        offset: 0,
        size: 0,
    }; N];

    for (slot, result) in pattern.iter().zip(&mut results) {
        if offset >= end {
            return None;
        }
        let (mut op, mut size) = opcode::peek_op_and_size(writer, offset);
        while op == Opcode::Noop {
            offset += size;
            if offset >= end {
                return None;
            }
            let next = opcode::peek_op_and_size(writer, offset);
            op = next.0;
            size = next.1;
        }

        let matches = match slot {
            PatternSlot::AnyDrawBitmap => op.is_bitmap_flavor(),
            PatternSlot::Op(expected) => op == *expected,
        };
        if !matches {
            return None;
        }

        *result = CommandInfo { op, offset, size };
        offset += size;
        if offset > end {
            return None;
        }
    }

    (offset == end).then_some(results)
}

/// Walks the restore-jump chain backwards from the current stack level to
/// the matching save's offset.
///
/// Returns `None` when the chain was broken by an expanding clip (a zeroed
/// slot): the save can no longer be located through the stream, so every
/// transform conservatively declines.
fn resolve_save_offset(writer: &StreamWriter, stack_top: i32) -> Option<u32> {
    let mut offset = stack_top;
    while offset > 0 {
        let next = writer.read_i32_at(offset as u32);
        if next == 0 {
            return None;
        }
        offset = next;
    }
    Some((-offset) as u32)
}

/// Drops a `save … restore` span that contains no drawing.
///
/// Fires when the matching save was a plain matrix/clip save and every
/// command between it and the pending restore only mutates matrix or clip
/// state. The whole span is then invisible to replay and the stream is
/// rewound to the save's offset.
fn collapse_save_clip_restore(writer: &mut StreamWriter, stack_top: i32) -> bool {
    let restore_offset = writer.bytes_written();
    let Some(save_offset) = resolve_save_offset(writer, stack_top) else {
        return false;
    };

    let (op, op_size) = opcode::peek_op_and_size(writer, save_offset);
    if op == Opcode::SaveLayer {
        // Layers redirect drawing; culling them needs bounds analysis the
        // recorder doesn't do.
        return false;
    }
    debug_assert_eq!(op, Opcode::Save, "restore chain must end at a save");
    debug_assert_eq!(op_size, SAVE_SIZE);

    let save_flags = SaveFlags::from_bits_truncate(writer.read_u32_at(save_offset + 4));
    if save_flags != SaveFlags::MATRIX_CLIP {
        // Partial saves restore only part of the state; dropping the pair
        // would leak the unrestored half.
        return false;
    }

    let mut offset = save_offset + op_size;
    while offset < restore_offset {
        let (op, size) = opcode::peek_op_and_size(writer, offset);
        if op.is_draw_verb() || matches!(op, Opcode::SaveLayer | Opcode::Restore) {
            return false;
        }
        offset += size;
    }

    writer.rewind_to(save_offset);
    true
}

/// Attempts to fold a save_layer's paint into a bitmap draw's paint.
///
/// With paint handles `sl` (save_layer) and `dbm` (bitmap draw):
/// - `sl == 0`: the layer changes nothing; noop it.
/// - `dbm == 0`: move the layer's paint onto the draw; noop the layer.
/// - Otherwise both are unflattened. The fold applies only when the layer
///   paint is a bare color whose RGB matches the draw's opaque color; the
///   draw's paint is then re-interned with the layer's alpha.
///
/// Returns `true` when the save_layer was noop'ed and the pending restore
/// should be suppressed.
fn merge_save_layer_paint_into_draw_bitmap(
    writer: &mut StreamWriter,
    paints: &mut PaintDictionary,
    save_layer: &CommandInfo,
    dbm: &CommandInfo,
) -> bool {
    debug_assert_eq!(save_layer.op, Opcode::SaveLayer);
    debug_assert!(dbm.op.is_bitmap_flavor());

    let dbm_paint_offset = opcode::paint_offset(dbm.op, dbm.size);
    let sl_paint_offset = opcode::paint_offset(Opcode::SaveLayer, save_layer.size);

    let dbm_paint_id = writer.read_u32_at(dbm.offset + dbm_paint_offset);
    let sl_paint_id = writer.read_u32_at(save_layer.offset + sl_paint_offset);

    if sl_paint_id == 0 {
        // The layer contributes nothing; the pair is pure overhead.
        opcode::convert_to_noop(writer, save_layer.offset);
        return true;
    }

    if dbm_paint_id == 0 {
        opcode::convert_to_noop(writer, save_layer.offset);
        writer.write_u32_at(dbm.offset + dbm_paint_offset, sl_paint_id);
        return true;
    }

    let Some(layer_paint) = paints.unflatten(sl_paint_id) else {
        return false;
    };
    if !layer_paint.is_simple() {
        return false;
    }

    let Some(dbm_paint) = paints.unflatten(dbm_paint_id) else {
        return false;
    };

    // The fold only handles the case where the two colors agree except for
    // the layer's alpha, which migrates onto the draw.
    let layer_rgba = layer_paint.color.to_rgba8();
    let dbm_rgba = dbm_paint.color.to_rgba8();
    if (dbm_rgba.r, dbm_rgba.g, dbm_rgba.b, dbm_rgba.a)
        != (layer_rgba.r, layer_rgba.g, layer_rgba.b, 255)
    {
        return false;
    }

    let merged = Paint {
        color: peniko::Color::from_rgba8(dbm_rgba.r, dbm_rgba.g, dbm_rgba.b, layer_rgba.a),
        ..dbm_paint
    };
    let Ok(flat) = paints.find_and_return_flat(&merged) else {
        return false;
    };
    let merged_id = flat.index();

    opcode::convert_to_noop(writer, save_layer.offset);
    writer.write_u32_at(dbm.offset + dbm_paint_offset, merged_id);
    true
}

/// Matches `save_layer (no bounds), draw_bitmap*, <pending restore>` and
/// folds the layer into the draw.
fn remove_save_layer_direct(
    writer: &mut StreamWriter,
    paints: &mut PaintDictionary,
    stack_top: i32,
) -> bool {
    let Some(save_offset) = resolve_save_offset(writer, stack_top) else {
        return false;
    };

    let pattern = [
        PatternSlot::Op(Opcode::SaveLayer),
        PatternSlot::AnyDrawBitmap,
    ];
    let Some(results) = match_pattern(writer, save_offset, &pattern) else {
        return false;
    };

    if base_size(results[0].size) == SAVE_LAYER_WITH_BOUNDS_SIZE {
        // Layer bounds can offset where the bitmap lands.
        return false;
    }

    merge_save_layer_paint_into_draw_bitmap(writer, paints, &results[0], &results[1])
}

/// Matches `save_layer, save, clip_rect, draw_bitmap*, restore, <pending
/// restore>` and folds the layer into the draw.
fn remove_save_layer_nested(
    writer: &mut StreamWriter,
    paints: &mut PaintDictionary,
    stack_top: i32,
) -> bool {
    let Some(save_offset) = resolve_save_offset(writer, stack_top) else {
        return false;
    };

    let pattern = [
        PatternSlot::Op(Opcode::SaveLayer),
        PatternSlot::Op(Opcode::Save),
        PatternSlot::Op(Opcode::ClipRect),
        PatternSlot::AnyDrawBitmap,
        PatternSlot::Op(Opcode::Restore),
    ];
    let Some(results) = match_pattern(writer, save_offset, &pattern) else {
        return false;
    };

    if base_size(results[0].size) == SAVE_LAYER_WITH_BOUNDS_SIZE {
        return false;
    }

    merge_save_layer_paint_into_draw_bitmap(writer, paints, &results[0], &results[3])
}

/// Strips the extended-size word from a recorded command size, recovering
/// the size the encoder computed before the header was written.
fn base_size(size: u32) -> u32 {
    if size >= SIZE_MASK {
        size - 4
    } else {
        size
    }
}

/// Tries every transform in order; returns the one that fired, if any.
///
/// `collapse_save_clip_restore` is skipped when a bounding hierarchy is
/// attached: the hierarchy has already indexed the span, and rewinding
/// recorded contents out from under it costs more than the optimization
/// saves.
pub(crate) fn apply_peephole(
    writer: &mut StreamWriter,
    paints: &mut PaintDictionary,
    stack_top: i32,
    has_bounding_hierarchy: bool,
    mut trace: Option<&mut (dyn RecordTrace + 'static)>,
) -> Option<RecordOpt> {
    const OPTS: [RecordOpt; RecordOpt::COUNT] = [
        RecordOpt::CollapseSaveClipRestore,
        RecordOpt::RemoveSaveLayerDirect,
        RecordOpt::RemoveSaveLayerNested,
    ];

    for opt in OPTS {
        if opt == RecordOpt::CollapseSaveClipRestore && has_bounding_hierarchy {
            continue;
        }
        if let Some(t) = trace.as_mut() {
            t.attempted(opt);
        }
        let fired = match opt {
            RecordOpt::CollapseSaveClipRestore => collapse_save_clip_restore(writer, stack_top),
            RecordOpt::RemoveSaveLayerDirect => {
                remove_save_layer_direct(writer, paints, stack_top)
            }
            RecordOpt::RemoveSaveLayerNested => {
                remove_save_layer_nested(writer, paints, stack_top)
            }
        };
        if fired {
            if let Some(t) = trace.as_mut() {
                t.fired(opt);
            }
            return Some(opt);
        }
    }
    None
}
