//! The `Game` builder: resources, staged systems, plugins.
//!
//! [`Game`] is the main entry point for an ember application. Configure
//! resources, systems, and plugins, then call [`run`](Game::run) to start
//! the event loop.
//!
//! Systems are registered per stage. Each redraw runs them in this order:
//!
//! ```text
//!   update            every frame, variable dt (read interpolated poses here)
//!   ┌ pre_fixed       ┐
//!   │ physics step    │ once per due fixed step (0..n per frame)
//!   │ fixed           │
//!   └ post_fixed      ┘
//!   draw              world projection set, ctx.alpha() = t
//!   ui                screen projection set
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ember::prelude::*;
//!
//! fn main() -> ember::Result<()> {
//!     Game::new("My Game")
//!         .plugin(Physics2d)
//!         .setup(setup)
//!         .fixed(steer)
//!         .draw(draw)
//!         .run()
//! }
//!
//! fn draw(ctx: &mut Context, draw: &mut Draw) {
//!     draw.set_color(Color::RED);
//!     draw.rect(Vec2::ZERO, Vec2::ONE);
//! }
//! ```

use crate::config::GameConfig;
use crate::context::Context;
use crate::error::Result;
use crate::render::pass::ClearColor;
use crate::render2d::Draw;
use crate::resources::Resources;

/// A system taking the game context.
pub type System = Box<dyn FnMut(&mut Context)>;
/// A system that also draws.
pub type DrawSystem = Box<dyn FnMut(&mut Context, &mut Draw)>;

/// A plugin that can extend a [`Game`] with additional systems and resources.
///
/// # Example
///
/// ```ignore
/// pub struct MyPlugin;
///
/// impl Plugin for MyPlugin {
///     fn build(&self, game: &mut Game) {
///         game.insert_resource(MyResource::new());
///         game.add_fixed_system(|ctx| {
///             // system logic
///         });
///     }
/// }
/// ```
pub trait Plugin {
    fn build(&self, game: &mut Game);
}

// ── Systems ─────────────────────────────────────────────────────────────

/// All registered systems, grouped by stage.
#[derive(Default)]
pub(crate) struct Systems {
    pub startup: Vec<System>,
    pub update: Vec<System>,
    pub pre_fixed: Vec<System>,
    pub physics: Vec<System>,
    pub fixed: Vec<System>,
    pub post_fixed: Vec<System>,
    pub draw: Vec<DrawSystem>,
}

impl Systems {
    pub fn run_startup(&mut self, ctx: &mut Context) {
        for system in self.startup.iter_mut() {
            system(ctx);
        }
    }

    /// Everything between the time update and the flush: UI input, update
    /// systems, the fixed steps, draw systems, UI drawing.
    pub fn run_frame(&mut self, ctx: &mut Context, draw: &mut Draw, frame_delta_secs: f32) {
        let pointer = ctx.cursor_screen();
        ctx.ui.update(&ctx.input, pointer);

        for system in self.update.iter_mut() {
            system(ctx);
        }

        ctx.fixed.accumulate(frame_delta_secs);
        while ctx.fixed.step_due() {
            for system in self
                .pre_fixed
                .iter_mut()
                .chain(self.physics.iter_mut())
                .chain(self.fixed.iter_mut())
                .chain(self.post_fixed.iter_mut())
            {
                system(ctx);
            }
        }

        draw.set_projection(ctx.camera.world_projection());
        for system in self.draw.iter_mut() {
            system(ctx, draw);
        }

        draw.set_projection(ctx.camera.screen_projection());
        ctx.ui.draw(draw);
    }
}

// ── Game ────────────────────────────────────────────────────────────────

/// Collects configuration, resources and systems, then [`run`](Game::run)s.
pub struct Game {
    config: GameConfig,
    resources: Resources,
    systems: Systems,
}

impl Game {
    /// Create a new game with the given window title and default settings.
    pub fn new(title: &str) -> Self {
        Self::from_config(GameConfig {
            title: title.to_string(),
            ..GameConfig::default()
        })
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self {
            config,
            resources: Resources::new(),
            systems: Systems::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    /// Initial window size in physical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.config
    }

    /// Insert a resource (builder pattern).
    pub fn resource<T: 'static + Send + Sync>(mut self, value: T) -> Self {
        self.resources.insert_resource(value);
        self
    }

    /// Register a startup system that runs once after the renderer is ready.
    pub fn setup(mut self, system: fn(&mut Context)) -> Self {
        self.systems.startup.push(Box::new(system));
        self
    }

    /// Runs once per frame, before the fixed steps.
    pub fn update(mut self, system: fn(&mut Context)) -> Self {
        self.systems.update.push(Box::new(system));
        self
    }

    /// Register a system that runs before each physics step.
    pub fn pre_fixed(mut self, system: fn(&mut Context)) -> Self {
        self.systems.pre_fixed.push(Box::new(system));
        self
    }

    /// Register a system that runs after each physics step.
    pub fn fixed(mut self, system: fn(&mut Context)) -> Self {
        self.systems.fixed.push(Box::new(system));
        self
    }

    /// Register a system that runs last in each fixed step.
    pub fn post_fixed(mut self, system: fn(&mut Context)) -> Self {
        self.systems.post_fixed.push(Box::new(system));
        self
    }

    /// Register a draw system. The world projection is set when it runs.
    pub fn draw(mut self, system: fn(&mut Context, &mut Draw)) -> Self {
        self.systems.draw.push(Box::new(system));
        self
    }

    pub fn plugin(mut self, plugin: impl Plugin) -> Self {
        plugin.build(&mut self);
        self
    }

    /// `&mut` form of [`resource`](Self::resource), for plugins.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert_resource(value);
    }

    pub fn add_startup_system(&mut self, system: impl FnMut(&mut Context) + 'static) {
        self.systems.startup.push(Box::new(system));
    }

    pub fn add_update_system(&mut self, system: impl FnMut(&mut Context) + 'static) {
        self.systems.update.push(Box::new(system));
    }

    pub fn add_pre_fixed_system(&mut self, system: impl FnMut(&mut Context) + 'static) {
        self.systems.pre_fixed.push(Box::new(system));
    }

    /// Register a simulation step. Runs between pre-fixed and fixed systems.
    pub fn add_physics_step(&mut self, system: impl FnMut(&mut Context) + 'static) {
        self.systems.physics.push(Box::new(system));
    }

    pub fn add_fixed_system(&mut self, system: impl FnMut(&mut Context) + 'static) {
        self.systems.fixed.push(Box::new(system));
    }

    pub fn add_post_fixed_system(&mut self, system: impl FnMut(&mut Context) + 'static) {
        self.systems.post_fixed.push(Box::new(system));
    }

    pub fn add_draw_system(&mut self, system: impl FnMut(&mut Context, &mut Draw) + 'static) {
        self.systems.draw.push(Box::new(system));
    }

    /// Build the context the systems will run against.
    pub(crate) fn into_parts(self) -> (GameConfig, Context, Systems) {
        let mut ctx = Context::new(&self.config);
        ctx.resources = self.resources;
        if !ctx.resources.has_resource::<ClearColor>() {
            ctx.resources
                .insert_resource(ClearColor::from(self.config.clear_color()));
        }
        #[cfg(feature = "diagnostics")]
        ctx.resources.insert_resource(crate::diag::RenderStats::new());
        (self.config, ctx, self.systems)
    }

    /// Open the window and run until it closes. With `diagnostics` on, this
    /// also installs the logger.
    ///
    /// Fails if the event loop, window, GPU device or built-in shaders
    /// cannot be created.
    pub fn run(self) -> Result<()> {
        #[cfg(feature = "diagnostics")]
        crate::diag::init_logger();

        let event_loop = winit::event_loop::EventLoop::new()?;
        event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

        let (config, ctx, systems) = self.into_parts();
        log::info!(
            "Starting '{}' ({}x{}, {} fixed updates/s)",
            config.title,
            config.width,
            config.height,
            config.fixed_updates_per_second
        );

        let mut app = crate::window::WinitApp::new(config, ctx, systems);
        event_loop.run_app(&mut app)?;
        app.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::math::Vec2;
    use crate::render2d::{PipelineKind, RecordingBackend};

    #[derive(Default)]
    struct Trace(Vec<&'static str>);

    fn log_stage(name: &'static str) -> impl FnMut(&mut Context) + 'static {
        move |ctx: &mut Context| ctx.resource_mut::<Trace>().0.push(name)
    }

    fn traced_game() -> Game {
        let mut game = Game::new("test").resource(Trace::default());
        game.add_update_system(log_stage("update"));
        game.add_pre_fixed_system(log_stage("pre_fixed"));
        game.add_physics_step(log_stage("physics"));
        game.add_fixed_system(log_stage("fixed"));
        game.add_post_fixed_system(log_stage("post_fixed"));
        game.add_draw_system(|ctx, _| ctx.resource_mut::<Trace>().0.push("draw"));
        game
    }

    #[test]
    fn stages_run_in_loop_order() {
        let (_, mut ctx, mut systems) = traced_game().into_parts();
        let mut draw = Draw::new();

        // 30 ms at 50 Hz: one step due, 10 ms carried over.
        systems.run_frame(&mut ctx, &mut draw, 0.03);
        assert_eq!(
            ctx.resource::<Trace>().0,
            ["update", "pre_fixed", "physics", "fixed", "post_fixed", "draw"]
        );
        assert!((ctx.alpha() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn short_frames_skip_fixed_stages() {
        let (_, mut ctx, mut systems) = traced_game().into_parts();
        systems.run_frame(&mut ctx, &mut Draw::new(), 0.005);
        assert_eq!(ctx.resource::<Trace>().0, ["update", "draw"]);
    }

    #[test]
    fn long_frames_run_every_due_step() {
        let (_, mut ctx, mut systems) = traced_game().into_parts();
        systems.run_frame(&mut ctx, &mut Draw::new(), 0.065);
        let physics_steps = ctx
            .resource::<Trace>()
            .0
            .iter()
            .filter(|s| **s == "physics")
            .count();
        assert_eq!(physics_steps, 3);
        assert_eq!(ctx.fixed.steps_this_frame(), 3);
    }

    #[test]
    fn draw_systems_use_world_then_ui_uses_screen_projection() {
        let mut game = Game::new("test").size(300, 300);
        game.add_draw_system(|_, draw| draw.rect(Vec2::ZERO, Vec2::ONE));
        let (_, mut ctx, mut systems) = game.into_parts();
        let root = ctx.ui.root();
        ctx.ui.button(root);

        let mut draw = Draw::new();
        systems.run_frame(&mut ctx, &mut draw, 0.0);
        let mut backend = RecordingBackend::new();
        draw.flush(&mut backend);

        let subs = backend.submissions();
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|s| s.kind == PipelineKind::Color));
        assert_eq!(subs[0].projection, ctx.camera.world_projection());
        assert_eq!(subs[1].projection, ctx.camera.screen_projection());
    }

    #[test]
    fn plugins_register_resources_and_systems() {
        struct Counter;
        impl Plugin for Counter {
            fn build(&self, game: &mut Game) {
                game.insert_resource(0u32);
                game.add_fixed_system(|ctx| *ctx.resource_mut::<u32>() += 1);
            }
        }

        let (_, mut ctx, mut systems) = Game::new("test").plugin(Counter).into_parts();
        systems.run_frame(&mut ctx, &mut Draw::new(), 0.105);
        assert_eq!(*ctx.resource::<u32>(), 5);
    }

    #[test]
    fn closures_can_capture_state() {
        let seen = Arc::new(Mutex::new(0));
        let inner = seen.clone();
        let mut game = Game::new("test");
        game.add_startup_system(move |_| *inner.lock().unwrap() += 1);
        let (_, mut ctx, mut systems) = game.into_parts();
        systems.run_startup(&mut ctx);
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn builder_overrides_config() {
        let game = Game::new("a").title("b").size(640, 480);
        assert_eq!(game.game_config().title, "b");
        assert_eq!(game.game_config().width, 640);
        let (_, ctx, _) = game.into_parts();
        assert!(ctx.resources.has_resource::<ClearColor>());
    }
}
