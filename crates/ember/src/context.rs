//! The per-frame context every system receives.
//!
//! [`Context`] bundles the resource map, input state, cursor position, frame
//! timing, the fixed-step clock, the camera and the UI into a single struct.
//! Every system receives `&mut Context`, giving it access to everything it
//! needs.

use std::path::Path;

use crate::camera::Camera2d;
use crate::config::GameConfig;
use crate::error::{EngineError, Result};
use crate::input::{CursorPosition, InputState};
use crate::math::Vec2;
use crate::render::gpu::GpuContext;
use crate::render2d::{Sprite, TextureHandle, WgpuBackend};
use crate::resources::Resources;
use crate::time::{FixedTimestep, Time};
use crate::ui::Ui;

/// The main game context, passed to all systems.
///
/// # Example
///
/// ```ignore
/// fn update(ctx: &mut Context) {
///     let dt = ctx.time.delta_secs();
///     if ctx.input.pressed(KeyCode::KeyW) {
///         ctx.resource_mut::<Ship>().thrust(dt);
///     }
/// }
///
/// fn draw(ctx: &mut Context, draw: &mut Draw) {
///     let t = ctx.alpha();
///     let pose = ctx.resource::<Ship>().history.interpolate(t);
///     draw.rect_rotated(pose.position, Vec2::splat(0.5), pose.rotation_degrees);
/// }
/// ```
pub struct Context {
    /// Game-wide singletons keyed by type.
    pub resources: Resources,
    /// Keyboard and mouse input state.
    pub input: InputState,
    /// Mouse cursor position in window coordinates.
    pub cursor: CursorPosition,
    /// Frame timing (delta time, elapsed time, FPS).
    pub time: Time,
    /// The fixed-update clock driving physics.
    pub fixed: FixedTimestep,
    pub camera: Camera2d,
    pub ui: Ui,
    exit_requested: bool,
}

impl Context {
    pub(crate) fn new(config: &GameConfig) -> Self {
        let fixed = FixedTimestep::new(config.fixed_updates_per_second.max(1))
            .with_max_frame_delta(config.max_frame_delta_secs);
        let camera = Camera2d::new(config.width, config.height)
            .with_pixels_per_unit(config.pixels_per_unit)
            .with_size(config.camera_size);

        Self {
            resources: Resources::new(),
            input: InputState::new(),
            cursor: CursorPosition::default(),
            time: Time::new(),
            fixed,
            camera,
            ui: Ui::new(config.width, config.height),
            exit_requested: false,
        }
    }

    /// Interpolation factor between the last two fixed steps.
    pub fn alpha(&self) -> f32 {
        self.fixed.alpha()
    }

    /// The cursor in world space.
    pub fn cursor_world(&self) -> Vec2 {
        self.camera.viewport_to_world(self.cursor.as_vec2())
    }

    /// The cursor in screen space (pixels, origin bottom-left).
    pub fn cursor_screen(&self) -> Vec2 {
        self.camera.viewport_to_screen(self.cursor.as_vec2())
    }

    pub fn resource<T: 'static + Send + Sync>(&self) -> &T {
        self.resources.resource::<T>()
    }

    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> &mut T {
        self.resources.resource_mut::<T>()
    }

    /// Ask the event loop to close the window after this frame.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    pub(crate) fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    // ── Textures ────────────────────────────────────────────────────────

    /// Load an image file as a texture. Loading the same path twice returns
    /// the cached handle.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureHandle> {
        self.with_renderer(|backend, gpu| backend.load_texture(gpu, path))
    }

    /// Load an image file and wrap the whole texture in a sprite.
    pub fn load_sprite(&mut self, path: impl AsRef<Path>) -> Result<Sprite> {
        self.load_texture(path).map(Sprite::new)
    }

    /// Create a texture from raw RGBA8 pixel data (top row first).
    pub fn create_texture(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<TextureHandle> {
        self.with_renderer(|backend, gpu| {
            Ok(backend.create_texture(gpu, label, width, height, data))
        })
    }

    /// Extract the backend, run `f` with it and the GPU context, reinsert.
    fn with_renderer<T>(
        &mut self,
        f: impl FnOnce(&mut WgpuBackend, &GpuContext) -> Result<T>,
    ) -> Result<T> {
        let mut backend = self
            .resources
            .resource_remove::<WgpuBackend>()
            .ok_or(EngineError::RendererNotReady)?;
        let result = match self.resources.get_resource::<GpuContext>() {
            Some(gpu) => f(&mut backend, gpu),
            None => Err(EngineError::RendererNotReady),
        };
        self.resources.insert_resource(backend);
        result
    }

    // ── Physics ─────────────────────────────────────────────────────────

    /// The 2D physics world inserted by the [`Physics2d`](crate::physics2d::Physics2d) plugin.
    #[cfg(feature = "physics2d")]
    pub fn physics(&mut self) -> &mut crate::physics2d::PhysicsWorld2d {
        self.resources.resource_mut::<crate::physics2d::PhysicsWorld2d>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_drives_clock_and_camera() {
        let config = GameConfig {
            fixed_updates_per_second: 25,
            camera_size: 2.0,
            width: 600,
            height: 300,
            ..GameConfig::default()
        };
        let ctx = Context::new(&config);
        assert!((ctx.fixed.step_secs() - 0.04).abs() < 1e-6);
        assert_eq!(ctx.camera.size(), 2.0);
        assert_eq!(ctx.ui.size(ctx.ui.root()), Vec2::new(600.0, 300.0));
    }

    #[test]
    fn textures_need_a_renderer() {
        let mut ctx = Context::new(&GameConfig::default());
        let err = ctx.create_texture("pixel", 1, 1, &[255; 4]).unwrap_err();
        assert!(matches!(err, EngineError::RendererNotReady));
    }

    #[test]
    fn cursor_at_window_center_is_camera_position() {
        let mut ctx = Context::new(&GameConfig::default());
        ctx.camera.set_position(Vec2::new(2.0, 1.0));
        ctx.cursor = CursorPosition { x: 640.0, y: 360.0 };
        assert!(ctx.cursor_world().abs_diff_eq(Vec2::new(2.0, 1.0), 1e-4));
    }
}
