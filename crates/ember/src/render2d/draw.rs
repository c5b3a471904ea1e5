//! # Draw — The Immediate-Mode 2D Drawing Context
//!
//! Gameplay code draws through a [`Draw`] value the frame loop passes to
//! every draw system. It carries the ambient state (color, sprite,
//! projection) and forwards each call to the [`Batcher`]:
//!
//! ```text
//!   draw system                  Draw                    Batcher
//!   ───────────                  ────                    ───────
//!   set_color(RED)     ──► color → both batches
//!   rect(..)           ──► color batch  ──► open/extend item
//!   set_sprite(ship)   ──► sprite batch (dirty if texture differs)
//!   sprite_quad(..)    ──► sprite batch ──► open/extend item
//!                                  ...
//!   (frame loop) flush ──────────────────────► submit items in order
//! ```
//!
//! Nothing here is global: the loop owns one `Draw`, sets the camera
//! projection before the world draw systems and the screen projection before
//! the UI, then flushes it once per frame.
//!
//! ## Sprite Fallback
//!
//! Drawing a sprite with no sprite set, or with one whose texture has no
//! pixels, draws a plain rectangle in the current color instead. The first
//! fallback is logged as a warning; later ones are silent.

use crate::color::Color;
use crate::math::{Mat4, Vec2};

use super::backend::RenderBackend;
use super::batcher::{Batcher, FlushStats};
use super::sprite::Sprite;

pub struct Draw {
    batcher: Batcher,
    color: Color,
    sprite: Option<Sprite>,
    projection: Mat4,
    warned_fallback: bool,
}

impl Draw {
    pub fn new() -> Self {
        Self {
            batcher: Batcher::new(),
            color: Color::WHITE,
            sprite: None,
            projection: Mat4::IDENTITY,
            warned_fallback: false,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.batcher.set_color(color);
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    pub fn set_sprite(&mut self, sprite: Option<Sprite>) {
        self.sprite = sprite;
        self.batcher.set_sprite(sprite);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.batcher.set_projection(projection);
    }

    /// Axis-aligned colored rectangle.
    pub fn rect(&mut self, center: Vec2, size: Vec2) {
        self.batcher.draw_quad(center, size, 0.0);
    }

    /// Colored rectangle rotated counter-clockwise about its center.
    pub fn rect_rotated(&mut self, center: Vec2, size: Vec2, rotation_degrees: f32) {
        self.batcher.draw_quad(center, size, rotation_degrees);
    }

    /// Quad textured with the current sprite.
    pub fn sprite_quad(&mut self, center: Vec2, size: Vec2) {
        self.sprite_rotated(center, size, 0.0);
    }

    pub fn sprite_rotated(&mut self, center: Vec2, size: Vec2, rotation_degrees: f32) {
        if !self.batcher.draw_sprite(center, size, rotation_degrees) {
            if !self.warned_fallback {
                self.warned_fallback = true;
                log::warn!("Sprite draw without a valid sprite, drawing a plain rect instead");
            }
            self.batcher.draw_quad(center, size, rotation_degrees);
        }
    }

    /// Draw `sprite` without changing the ambient sprite afterwards.
    pub fn sprite_with(&mut self, sprite: Sprite, center: Vec2, size: Vec2, rotation_degrees: f32) {
        let previous = self.sprite;
        self.set_sprite(Some(sprite));
        self.sprite_rotated(center, size, rotation_degrees);
        self.set_sprite(previous);
    }

    /// Submit everything drawn since the last flush.
    pub fn flush<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> FlushStats {
        self.batcher.flush(backend)
    }

    pub fn batcher(&self) -> &Batcher {
        &self.batcher
    }
}

impl Default for Draw {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render2d::backend::{PipelineKind, RecordingBackend};
    use crate::render2d::sprite::TextureHandle;

    #[test]
    fn sprite_without_sprite_falls_back_to_colored_rect() {
        let mut draw = Draw::new();
        draw.set_color(Color::RED);
        draw.sprite_quad(Vec2::ZERO, Vec2::ONE);
        draw.set_sprite(Some(Sprite::new(TextureHandle::new(7, 0, 0))));
        draw.sprite_quad(Vec2::ZERO, Vec2::ONE);

        let mut backend = RecordingBackend::new();
        draw.flush(&mut backend);
        let subs = backend.submissions();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].kind, PipelineKind::Color);
        assert_eq!(subs[0].quad_count, 2);
        assert_eq!(subs[0].color(0), Color::RED.to_array());
    }

    #[test]
    fn setters_are_readable() {
        let mut draw = Draw::new();
        let sprite = Sprite::new(TextureHandle::new(1, 4, 4));
        let proj = Mat4::orthographic_rh(0.0, 10.0, 0.0, 10.0, -1.0, 1.0);
        draw.set_color(Color::BLUE);
        draw.set_sprite(Some(sprite));
        draw.set_projection(proj);
        assert_eq!(draw.color(), Color::BLUE);
        assert_eq!(draw.sprite(), Some(&sprite));
        assert_eq!(draw.projection(), proj);
    }

    #[test]
    fn projection_is_captured_per_item() {
        let mut draw = Draw::new();
        let world = Mat4::from_scale(glam::Vec3::splat(0.5));
        let screen = Mat4::orthographic_rh(0.0, 800.0, 0.0, 600.0, -1.0, 1.0);
        draw.set_projection(world);
        draw.rect(Vec2::ZERO, Vec2::ONE);
        draw.set_projection(screen);
        draw.rect(Vec2::ZERO, Vec2::ONE);

        let mut backend = RecordingBackend::new();
        draw.flush(&mut backend);
        let subs = backend.submissions();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].projection, world);
        assert_eq!(subs[1].projection, screen);
    }

    #[test]
    fn sprite_with_restores_ambient_sprite() {
        let mut draw = Draw::new();
        let ship = Sprite::new(TextureHandle::new(1, 4, 4));
        let rock = Sprite::new(TextureHandle::new(2, 4, 4));
        draw.set_sprite(Some(ship));
        draw.sprite_with(rock, Vec2::ZERO, Vec2::ONE, 0.0);
        assert_eq!(draw.sprite(), Some(&ship));
        assert_eq!(draw.batcher().sprite_batch().sprite(), Some(&ship));
    }

    #[test]
    fn repeated_sprite_with_on_one_texture_shares_an_item() {
        let mut draw = Draw::new();
        let icon = Sprite::new(TextureHandle::new(3, 8, 8));
        for i in 0..4 {
            draw.sprite_with(icon, Vec2::new(i as f32, 0.0), Vec2::ONE, 0.0);
        }
        let other = Sprite::new(TextureHandle::new(4, 8, 8));
        draw.sprite_with(other, Vec2::ZERO, Vec2::ONE, 0.0);

        let mut backend = RecordingBackend::new();
        draw.flush(&mut backend);
        let quads: Vec<_> = backend.submissions().iter().map(|s| s.quad_count).collect();
        assert_eq!(quads, vec![4, 1]);
    }
}
