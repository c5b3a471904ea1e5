//! 2D camera and the two projections the renderer uses.
//!
//! The world projection maps world units to clip space. At `size = 1` one
//! world unit spans [`DEFAULT_PIXELS_PER_UNIT`] pixels; a larger `size` zooms
//! out. The screen projection maps window pixels (origin bottom-left, y up)
//! to clip space and is what the UI draws with.
//!
//! ```text
//!   world point ──translate(-pos)──rotate(-rot)──scale(1/size)──ortho(±hw, ±hh)──► clip
//!   screen px   ──────────────────────────────────────────────ortho(0..w, 0..h)──► clip
//!
//!   hw = width / pixels_per_unit / 2      hh = height / pixels_per_unit / 2
//! ```
//!
//! Both matrices are cached and rebuilt whenever the transform or the window
//! size changes.

use crate::math::{Mat4, Vec2, Vec3};

/// Pixels covered by one world unit at `size = 1`.
pub const DEFAULT_PIXELS_PER_UNIT: f32 = 150.0;
pub const DEFAULT_CAMERA_SIZE: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct Camera2d {
    position: Vec2,
    size: f32,
    rotation_degrees: f32,
    pixels_per_unit: f32,
    viewport: Vec2,
    world_projection: Mat4,
    inverse_world_projection: Mat4,
    screen_projection: Mat4,
    inverse_screen_projection: Mat4,
}

impl Camera2d {
    /// A camera at the origin for a `width` x `height` pixel window.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            size: DEFAULT_CAMERA_SIZE,
            rotation_degrees: 0.0,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            viewport: Vec2::new(width.max(1) as f32, height.max(1) as f32),
            world_projection: Mat4::IDENTITY,
            inverse_world_projection: Mat4::IDENTITY,
            screen_projection: Mat4::IDENTITY,
            inverse_screen_projection: Mat4::IDENTITY,
        };
        camera.recalculate();
        camera
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.set_size(size);
        self
    }

    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self.recalculate();
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.recalculate();
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
        self.recalculate();
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn set_rotation_degrees(&mut self, degrees: f32) {
        self.rotation_degrees = degrees;
        self.recalculate();
    }

    /// Set position, size and rotation at once.
    pub fn set_transform(&mut self, position: Vec2, size: f32, rotation_degrees: f32) {
        self.position = position;
        self.size = size;
        self.rotation_degrees = rotation_degrees;
        self.recalculate();
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// Window size in pixels.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Track a window resize. Zero-sized windows (minimized) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Vec2::new(width as f32, height as f32);
        self.recalculate();
    }

    /// World units to clip space.
    pub fn world_projection(&self) -> Mat4 {
        self.world_projection
    }

    /// Window pixels (y up) to clip space.
    pub fn screen_projection(&self) -> Mat4 {
        self.screen_projection
    }

    /// Half extents of the visible world area at `size = 1`.
    pub fn half_extents(&self) -> Vec2 {
        self.viewport / self.pixels_per_unit * 0.5
    }

    /// Visible world-space width and height.
    pub fn visible_world_size(&self) -> Vec2 {
        self.half_extents() * 2.0 * self.size
    }

    /// A window-pixel point (origin top-left, y down) in normalized device
    /// coordinates.
    pub fn viewport_to_ndc(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x / self.viewport.x * 2.0 - 1.0,
            (1.0 - point.y / self.viewport.y) * 2.0 - 1.0,
        )
    }

    /// A window-pixel point in world space.
    pub fn viewport_to_world(&self, point: Vec2) -> Vec2 {
        let ndc = self.viewport_to_ndc(point);
        self.inverse_world_projection
            .transform_point3(Vec3::new(ndc.x, ndc.y, 0.0))
            .truncate()
    }

    /// A window-pixel point in screen space (origin bottom-left, y up).
    pub fn viewport_to_screen(&self, point: Vec2) -> Vec2 {
        let ndc = self.viewport_to_ndc(point);
        self.inverse_screen_projection
            .transform_point3(Vec3::new(ndc.x, ndc.y, 0.0))
            .truncate()
    }

    fn recalculate(&mut self) {
        let view = Mat4::from_scale(Vec3::new(1.0 / self.size, 1.0 / self.size, 1.0))
            * Mat4::from_rotation_z(-self.rotation_degrees.to_radians())
            * Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0));
        let half = self.half_extents();
        let proj = Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -1.0, 1.0);
        self.world_projection = proj * view;
        self.inverse_world_projection = self.world_projection.inverse();

        self.screen_projection =
            Mat4::orthographic_rh(0.0, self.viewport.x, 0.0, self.viewport.y, -1.0, 1.0);
        self.inverse_screen_projection = self.screen_projection.inverse();
    }
}

impl Default for Camera2d {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}
