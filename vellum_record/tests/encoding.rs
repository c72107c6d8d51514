// Copyright 2026 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoding-level tests: command sizes, skippability, the paint-offset
//! contract, and opcode selection across every drawing verb.

use std::sync::Arc;

use peniko::{BlendMode, Color, Compose, Mix};
use vellum_record::opcode::{self, Opcode};
use vellum_record::{
    Bitmap, ClipVerb, DrawBitmapRectFlags, IRect, MaskFilter, Paint, PathFill, Picture,
    PictureRecorder, PixelRef, PointF, PointMode, RecordFlags, RectF, Region, RoundedRectF,
    SaveFlags, VertexMode,
};

fn paint() -> Paint {
    Paint::from_color(Color::from_rgba8(30, 60, 90, 255))
}

fn bitmap() -> Bitmap {
    Bitmap::new(Arc::new(PixelRef::new(8, 8, vec![0; 256])))
}

fn commands(recorder: &PictureRecorder) -> Vec<(Opcode, u32, u32)> {
    let stream = recorder.stream();
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < stream.bytes_written() {
        let (op, size) = opcode::peek_op_and_size(stream, offset);
        assert!(size > 0, "zero-sized command at {offset}");
        assert_eq!(offset % 4, 0, "command not word aligned");
        out.push((op, offset, size));
        offset += size;
    }
    assert_eq!(offset, stream.bytes_written(), "skip walk left residue");
    out
}

/// Records one of everything and checks the whole stream stays skippable
/// and every paint handle sits where the offset table promises.
#[test]
fn kitchen_sink_stream_is_skippable_with_paints_in_position() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();

    recorder.save(SaveFlags::MATRIX_CLIP).unwrap();
    recorder.translate(1.0, 2.0).unwrap();
    recorder.scale(2.0, 2.0).unwrap();
    recorder.rotate(0.5).unwrap();
    recorder.skew(0.1, 0.0).unwrap();
    recorder.concat(kurbo::Affine::IDENTITY).unwrap();
    recorder.set_matrix(kurbo::Affine::scale(3.0)).unwrap();

    recorder
        .clip_rect(&RectF::new(0.0, 0.0, 100.0, 100.0), ClipVerb::Intersect, true)
        .unwrap();
    recorder
        .clip_rrect(
            &RoundedRectF::new(0.0, 0.0, 50.0, 60.0, 4.0),
            ClipVerb::Intersect,
            false,
        )
        .unwrap();
    recorder
        .clip_path(
            &kurbo::Shape::to_path(&kurbo::Circle::new((10.0, 10.0), 5.0), 0.1),
            PathFill::Winding,
            ClipVerb::Intersect,
            true,
        )
        .unwrap();
    recorder
        .clip_region(
            &Region::from_rect(IRect::new(0, 0, 64, 64)),
            ClipVerb::Intersect,
        )
        .unwrap();

    recorder.clear(Color::from_rgba8(0, 0, 0, 0)).unwrap();
    recorder.draw_paint(&paint()).unwrap();
    recorder
        .draw_points(
            PointMode::Lines,
            &[PointF::new(0.0, 0.0), PointF::new(5.0, 5.0)],
            &paint(),
        )
        .unwrap();
    recorder
        .draw_rect(&RectF::new(0.0, 0.0, 10.0, 10.0), &paint())
        .unwrap();
    recorder
        .draw_oval(&RectF::new(0.0, 0.0, 10.0, 20.0), &paint())
        .unwrap();
    recorder
        .draw_rrect(&RoundedRectF::new(0.0, 0.0, 10.0, 20.0, 3.0), &paint())
        .unwrap();
    recorder
        .draw_path(
            &kurbo::Shape::to_path(&kurbo::Circle::new((4.0, 4.0), 2.0), 0.1),
            &paint(),
        )
        .unwrap();

    recorder
        .draw_bitmap(&bitmap(), 4.0, 4.0, Some(&paint()))
        .unwrap();
    recorder
        .draw_bitmap_rect_to_rect(
            &bitmap(),
            Some(&RectF::new(0.0, 0.0, 4.0, 4.0)),
            &RectF::new(0.0, 0.0, 32.0, 32.0),
            Some(&paint()),
            DrawBitmapRectFlags::BLEED,
        )
        .unwrap();
    recorder
        .draw_bitmap_matrix(&bitmap(), kurbo::Affine::rotate(0.3), Some(&paint()))
        .unwrap();
    recorder
        .draw_bitmap_nine(
            &bitmap(),
            &IRect::new(2, 2, 6, 6),
            &RectF::new(0.0, 0.0, 64.0, 64.0),
            Some(&paint()),
        )
        .unwrap();
    recorder
        .draw_sprite(&bitmap(), 7, 9, Some(&paint()))
        .unwrap();

    recorder.draw_text(b"hello", 5.0, 10.0, &paint()).unwrap();
    recorder
        .draw_pos_text(
            b"ab",
            &[PointF::new(0.0, 4.0), PointF::new(8.0, 4.0)],
            &paint(),
        )
        .unwrap();
    recorder
        .draw_pos_text_h(b"ab", &[0.0, 8.0], 4.0, &paint())
        .unwrap();
    recorder
        .draw_text_on_path(
            b"curve",
            &kurbo::Shape::to_path(&kurbo::Circle::new((0.0, 0.0), 20.0), 0.1),
            None,
            &paint(),
        )
        .unwrap();

    recorder
        .draw_vertices(
            VertexMode::Triangles,
            &[
                PointF::new(0.0, 0.0),
                PointF::new(10.0, 0.0),
                PointF::new(0.0, 10.0),
            ],
            Some(&[
                PointF::new(0.0, 0.0),
                PointF::new(1.0, 0.0),
                PointF::new(0.0, 1.0),
            ]),
            Some(&[
                Color::from_rgba8(255, 0, 0, 255),
                Color::from_rgba8(0, 255, 0, 255),
                Color::from_rgba8(0, 0, 255, 255),
            ]),
            Some(BlendMode::new(Mix::Multiply, Compose::SrcOver)),
            Some(&[0, 1, 2]),
            &paint(),
        )
        .unwrap();

    recorder.draw_picture(&Arc::new(Picture::new())).unwrap();
    recorder.draw_data(b"opaque blob").unwrap();

    recorder.begin_comment_group("group").unwrap();
    recorder.add_comment("key", "value").unwrap();
    recorder.end_comment_group().unwrap();

    recorder.restore().unwrap();
    recorder.end_recording().unwrap();

    let cmds = commands(&recorder);
    assert!(cmds.len() > 25);

    // Every paint-carrying command holds a live dictionary index at the
    // offset the table promises.
    for (op, offset, size) in cmds {
        let has_paint = matches!(
            op,
            Opcode::DrawBitmap
                | Opcode::DrawBitmapMatrix
                | Opcode::DrawBitmapNine
                | Opcode::DrawBitmapRectToRect
                | Opcode::DrawOval
                | Opcode::DrawPaint
                | Opcode::DrawPath
                | Opcode::DrawPoints
                | Opcode::DrawPosText
                | Opcode::DrawPosTextTopBottom
                | Opcode::DrawPosTextH
                | Opcode::DrawPosTextHTopBottom
                | Opcode::DrawRect
                | Opcode::DrawRRect
                | Opcode::DrawSprite
                | Opcode::DrawText
                | Opcode::DrawTextOnPath
                | Opcode::DrawTextTopBottom
                | Opcode::DrawVertices
        );
        if has_paint {
            let handle = recorder
                .stream()
                .read_u32_at(offset + opcode::paint_offset(op, size));
            assert_ne!(handle, 0, "{op:?} lost its paint");
            assert!(
                recorder.paints().get(handle).is_some(),
                "{op:?} points at a missing dictionary entry"
            );
        }
    }

    // Identical paints interned once across the whole sweep.
    assert_eq!(recorder.paints().len(), 1);
}

// ---------------------------------------------------------------------------
// Fixed sizes

#[test]
fn fixed_size_commands_encode_exactly() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    let base = recorder.stream().bytes_written();
    assert_eq!(base, 8, "save is header + flags");

    recorder.translate(1.0, 2.0).unwrap();
    assert_eq!(recorder.stream().bytes_written() - base, 12);

    recorder.rotate(1.0).unwrap();
    assert_eq!(recorder.stream().bytes_written(), base + 12 + 8);

    let before_clip = recorder.stream().bytes_written();
    recorder
        .clip_rect(&RectF::new(0.0, 0.0, 1.0, 1.0), ClipVerb::Intersect, false)
        .unwrap();
    // Header + rect + params + restore-jump slot.
    assert_eq!(recorder.stream().bytes_written() - before_clip, 28);

    let before_draw = recorder.stream().bytes_written();
    recorder
        .draw_rect(&RectF::new(0.0, 0.0, 1.0, 1.0), &paint())
        .unwrap();
    assert_eq!(recorder.stream().bytes_written() - before_draw, 24);

    recorder.end_recording().unwrap();
}

// ---------------------------------------------------------------------------
// Text opcode selection

fn last_op(recorder: &PictureRecorder) -> Opcode {
    commands(recorder).last().unwrap().0
}

#[test]
fn fast_text_takes_the_top_bottom_variant() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder.draw_text(b"abc", 0.0, 0.0, &paint()).unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawTextTopBottom);
}

#[test]
fn slow_paint_text_stays_plain() {
    let slow = Paint {
        mask_filter: Some(MaskFilter::Blur {
            style: vellum_record::BlurStyle::Normal,
            sigma: 2.0,
        }),
        ..paint()
    };
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder.draw_text(b"abc", 0.0, 0.0, &slow).unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawText);
}

#[test]
fn vertical_text_stays_plain() {
    let vertical = Paint {
        vertical_text: true,
        ..paint()
    };
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder.draw_text(b"abc", 0.0, 0.0, &vertical).unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawText);
}

#[test]
fn pos_text_with_one_baseline_rewrites_to_horizontal() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder
        .draw_pos_text(
            b"abc",
            &[
                PointF::new(0.0, 7.0),
                PointF::new(5.0, 7.0),
                PointF::new(10.0, 7.0),
            ],
            &paint(),
        )
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawPosTextHTopBottom);
}

#[test]
fn pos_text_with_scattered_baselines_keeps_full_points() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder
        .draw_pos_text(
            b"ab",
            &[PointF::new(0.0, 0.0), PointF::new(5.0, 9.0)],
            &paint(),
        )
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawPosTextTopBottom);
}

#[test]
fn pos_text_without_fast_bounds_is_fully_plain() {
    let slow = Paint {
        mask_filter: Some(MaskFilter::Blur {
            style: vellum_record::BlurStyle::Normal,
            sigma: 1.0,
        }),
        ..paint()
    };
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder
        .draw_pos_text(
            b"ab",
            &[PointF::new(0.0, 0.0), PointF::new(5.0, 9.0)],
            &slow,
        )
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawPosText);
}

#[test]
fn empty_text_records_nothing() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    let before = recorder.stream().bytes_written();
    recorder.draw_pos_text(b"", &[], &paint()).unwrap();
    recorder.draw_pos_text_h(b"", &[], 0.0, &paint()).unwrap();
    assert_eq!(recorder.stream().bytes_written(), before);
}

// ---------------------------------------------------------------------------
// Degenerate-shape rewrites

#[test]
fn square_rrect_clip_records_a_rect_clip() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder
        .clip_rrect(
            &RoundedRectF::new(0.0, 0.0, 10.0, 10.0, 0.0),
            ClipVerb::Intersect,
            false,
        )
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::ClipRect);
}

#[test]
fn rect_path_clip_records_a_rect_clip_without_a_path_entry() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    let rect_path = kurbo::Shape::to_path(&kurbo::Rect::new(0.0, 0.0, 8.0, 8.0), 0.1);
    recorder
        .clip_path(&rect_path, PathFill::Winding, ClipVerb::Intersect, false)
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::ClipRect);
    assert!(recorder.paths().is_empty());
}

#[test]
fn inverse_rect_path_clip_stays_a_path_clip() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    let rect_path = kurbo::Shape::to_path(&kurbo::Rect::new(0.0, 0.0, 8.0, 8.0), 0.1);
    recorder
        .clip_path(
            &rect_path,
            PathFill::InverseWinding,
            ClipVerb::Intersect,
            false,
        )
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::ClipPath);
    assert_eq!(recorder.paths().len(), 1);
}

#[test]
fn degenerate_rrect_draws_rewrite() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();

    recorder
        .draw_rrect(&RoundedRectF::new(0.0, 0.0, 10.0, 20.0, 0.0), &paint())
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawRect);

    recorder
        .draw_rrect(&RoundedRectF::new(0.0, 0.0, 10.0, 10.0, 5.0), &paint())
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawOval);

    recorder
        .draw_rrect(&RoundedRectF::new(0.0, 0.0, 10.0, 20.0, 3.0), &paint())
        .unwrap();
    assert_eq!(last_op(&recorder), Opcode::DrawRRect);
}

// ---------------------------------------------------------------------------
// Payload details

#[test]
fn vertices_flags_reflect_the_optional_arrays() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder
        .draw_vertices(
            VertexMode::TriangleFan,
            &[PointF::new(0.0, 0.0), PointF::new(1.0, 0.0)],
            None,
            None,
            None,
            None,
            &paint(),
        )
        .unwrap();

    let (op, offset, _size) = *commands(&recorder).last().unwrap();
    assert_eq!(op, Opcode::DrawVertices);
    // Payload order: paint, flags, mode, count.
    let flags = recorder.stream().read_u32_at(offset + 8);
    assert_eq!(flags, 0);
    let mode = recorder.stream().read_u32_at(offset + 12);
    assert_eq!(mode, VertexMode::TriangleFan as u32);
    let count = recorder.stream().read_u32_at(offset + 16);
    assert_eq!(count, 2);
}

#[test]
fn shared_bitmaps_and_pictures_reuse_handles() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();

    let shared = bitmap();
    recorder.draw_bitmap(&shared, 0.0, 0.0, None).unwrap();
    recorder.draw_bitmap(&shared, 8.0, 0.0, None).unwrap();
    assert_eq!(recorder.bitmaps().len(), 1);

    let picture = Arc::new(Picture::new());
    recorder.draw_picture(&picture).unwrap();
    recorder.draw_picture(&picture).unwrap();
    assert_eq!(recorder.pictures().len(), 1);

    let cmds = commands(&recorder);
    let picture_handles: Vec<u32> = cmds
        .iter()
        .filter(|c| c.0 == Opcode::DrawPicture)
        .map(|c| recorder.stream().read_u32_at(c.1 + 4))
        .collect();
    assert_eq!(picture_handles, [1, 1]);
}

#[test]
fn draw_data_is_length_prefixed_and_padded() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    let before = recorder.stream().bytes_written();
    recorder.draw_data(b"abcde").unwrap();

    let (op, offset, size) = *commands(&recorder).last().unwrap();
    assert_eq!(op, Opcode::DrawData);
    assert_eq!(offset, before);
    assert_eq!(size, 8 + 8); // header + length word + 5 bytes padded to 8
    assert_eq!(recorder.stream().read_u32_at(offset + 4), 5);
}

#[test]
fn comment_group_commands_encode_strings() {
    let mut recorder = PictureRecorder::new(RecordFlags::DISABLE_RECORD_OPTIMIZATIONS);
    recorder.begin_recording().unwrap();
    recorder.begin_comment_group("layer-debug").unwrap();
    recorder.add_comment("origin", "compositor").unwrap();
    recorder.end_comment_group().unwrap();
    recorder.end_recording().unwrap();

    let ops: Vec<Opcode> = commands(&recorder).iter().map(|c| c.0).collect();
    assert_eq!(
        ops,
        [
            Opcode::Save,
            Opcode::BeginCommentGroup,
            Opcode::Comment,
            Opcode::EndCommentGroup,
            Opcode::Restore,
        ]
    );
}
