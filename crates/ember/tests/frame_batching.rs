//! End-to-end batching through the public drawing API.

use ember::color::Color;
use ember::math::{Mat4, RectInt, Vec2, Vec3};
use ember::render2d::{Draw, PipelineKind, RecordingBackend, Sprite, TextureHandle};

const EPS: f32 = 1e-5;

fn close(a: [f32; 2], b: [f32; 2]) -> bool {
    (a[0] - b[0]).abs() < EPS && (a[1] - b[1]).abs() < EPS
}

fn flushed(draw: &mut Draw) -> RecordingBackend {
    let mut backend = RecordingBackend::new();
    draw.flush(&mut backend);
    backend
}

#[test]
fn six_hundred_rects_become_two_draw_calls() {
    let mut draw = Draw::new();
    for i in 0..600 {
        draw.rect(Vec2::new(i as f32, 0.0), Vec2::ONE);
    }
    let backend = flushed(&mut draw);
    let subs = backend.submissions();

    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].quad_count, 512);
    assert_eq!(subs[1].quad_count, 88);
    for sub in subs {
        assert_eq!(sub.kind, PipelineKind::Color);
        assert_eq!(sub.vertices.len(), sub.quad_count * 4 * 6);
        assert_eq!(sub.indices.len(), sub.quad_count * 6);
    }
    // Quad 512 is the first quad of the second item.
    assert!(close(subs[1].position(0), [511.5, -0.5]));
}

#[test]
fn capacity_boundary() {
    let mut draw = Draw::new();
    for _ in 0..512 {
        draw.rect(Vec2::ZERO, Vec2::ONE);
    }
    assert_eq!(flushed(&mut draw).submissions().len(), 1);

    for _ in 0..513 {
        draw.rect(Vec2::ZERO, Vec2::ONE);
    }
    let backend = flushed(&mut draw);
    let quads: Vec<_> = backend.submissions().iter().map(|s| s.quad_count).collect();
    assert_eq!(quads, vec![512, 1]);
}

#[test]
fn indices_repeat_the_quad_pattern() {
    let mut draw = Draw::new();
    draw.rect(Vec2::ZERO, Vec2::ONE);
    draw.rect(Vec2::ONE, Vec2::ONE);
    let backend = flushed(&mut draw);
    assert_eq!(
        backend.submissions()[0].indices,
        vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]
    );
}

#[test]
fn projection_changes_split_items_and_are_captured() {
    let a = Mat4::from_scale(Vec3::splat(0.5));
    let b = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

    let mut draw = Draw::new();
    draw.set_projection(a);
    draw.rect(Vec2::ZERO, Vec2::ONE);
    draw.rect(Vec2::ZERO, Vec2::ONE);
    draw.set_projection(b);
    draw.rect(Vec2::ZERO, Vec2::ONE);

    let backend = flushed(&mut draw);
    let subs = backend.submissions();
    assert_eq!(subs.len(), 2);
    assert_eq!((subs[0].projection, subs[0].quad_count), (a, 2));
    assert_eq!((subs[1].projection, subs[1].quad_count), (b, 1));
}

#[test]
fn color_is_stamped_per_vertex_without_breaking() {
    let mut draw = Draw::new();
    draw.set_color(Color::RED);
    draw.rect(Vec2::ZERO, Vec2::ONE);
    draw.set_color(Color::BLUE);
    draw.rect(Vec2::ZERO, Vec2::ONE);

    let backend = flushed(&mut draw);
    let sub = &backend.submissions()[0];
    assert_eq!(backend.submissions().len(), 1);
    assert_eq!(sub.color(0), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(sub.color(7), [0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn sprites_coalesce_per_texture() {
    let atlas = TextureHandle::new(1, 64, 64);
    let other = TextureHandle::new(2, 16, 16);

    let mut draw = Draw::new();
    draw.set_sprite(Some(Sprite::new(atlas)));
    draw.sprite_quad(Vec2::ZERO, Vec2::ONE);
    draw.set_sprite(Some(Sprite::from_region(atlas, RectInt::from_bounds(0, 0, 32, 32))));
    draw.sprite_quad(Vec2::ZERO, Vec2::ONE);
    draw.set_sprite(Some(Sprite::new(other)));
    draw.sprite_quad(Vec2::ZERO, Vec2::ONE);

    let backend = flushed(&mut draw);
    let subs = backend.submissions();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].texture, Some(atlas));
    assert_eq!(subs[0].quad_count, 2);
    assert_eq!(subs[1].texture, Some(other));
    assert_eq!(subs[0].vertices.len(), 2 * 4 * 8);

    // Second quad samples the lower-left quarter of the atlas.
    assert_eq!(subs[0].uv(4), Some([0.0, 0.0]));
    assert_eq!(subs[0].uv(6), Some([0.5, 0.5]));
}

#[test]
fn later_draws_paint_over_earlier_ones_across_kinds() {
    let sprite = Sprite::new(TextureHandle::new(1, 8, 8));
    let mut draw = Draw::new();
    draw.rect(Vec2::ZERO, Vec2::ONE);
    draw.set_sprite(Some(sprite));
    draw.sprite_quad(Vec2::ZERO, Vec2::ONE);
    draw.rect(Vec2::splat(5.0), Vec2::ONE);

    let backend = flushed(&mut draw);
    let subs = backend.submissions();
    let kinds: Vec<_> = subs.iter().map(|s| (s.kind, s.quad_count)).collect();
    assert_eq!(
        kinds,
        vec![
            (PipelineKind::Color, 1),
            (PipelineKind::Sprite, 1),
            (PipelineKind::Color, 1),
        ]
    );
    // The last rect issued is the last one painted.
    assert!(close(subs[2].position(0), [4.5, 4.5]));
}

#[test]
fn runs_of_one_kind_still_share_items() {
    let sprite = Sprite::new(TextureHandle::new(1, 8, 8));
    let mut draw = Draw::new();
    for _ in 0..3 {
        draw.rect(Vec2::ZERO, Vec2::ONE);
    }
    draw.set_sprite(Some(sprite));
    for _ in 0..4 {
        draw.sprite_quad(Vec2::ZERO, Vec2::ONE);
    }
    for _ in 0..2 {
        draw.rect(Vec2::ZERO, Vec2::ONE);
    }

    let backend = flushed(&mut draw);
    let quads: Vec<_> = backend.submissions().iter().map(|s| s.quad_count).collect();
    assert_eq!(quads, vec![3, 4, 2]);
}

#[test]
fn rotation_turns_corners_counter_clockwise() {
    let mut draw = Draw::new();
    draw.rect_rotated(Vec2::ZERO, Vec2::new(2.0, 1.0), 0.0);
    draw.rect_rotated(Vec2::ZERO, Vec2::new(2.0, 1.0), 90.0);
    let backend = flushed(&mut draw);
    let sub = &backend.submissions()[0];

    for corner in 0..4 {
        let [x, y] = sub.position(corner);
        // (x, y) rotated 90° CCW is (-y, x).
        assert!(close(sub.position(4 + corner), [-y, x]), "corner {corner}");
    }
}

#[test]
fn flush_resets_for_the_next_frame() {
    let mut draw = Draw::new();
    draw.rect(Vec2::ZERO, Vec2::ONE);
    let first = flushed(&mut draw);
    assert_eq!(first.submissions().len(), 1);
    assert_eq!(draw.batcher().pending_items(), 0);
    assert!(draw.batcher().color_batch().is_dirty());
    assert!(draw.batcher().sprite_batch().is_dirty());

    // Nothing drawn: nothing submitted.
    assert!(flushed(&mut draw).submissions().is_empty());

    draw.rect(Vec2::ZERO, Vec2::ONE);
    assert_eq!(draw.batcher().pending_items(), 1);
}
