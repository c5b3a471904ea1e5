//! The winit side of the engine.
//!
//! [`WinitApp`] owns the [`Context`], the registered systems and the frame's
//! [`Draw`]. winit calls into it for window creation, input and redraws;
//! each redraw runs one full frame and presents it.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::GameConfig;
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::game::Systems;
use crate::render::gpu::GpuContext;
use crate::render::pass::{ClearColor, render_frame};
use crate::render2d::{Draw, WgpuBackend};
use crate::time::Time;

pub(crate) struct WinitApp {
    config: GameConfig,
    ctx: Context,
    systems: Systems,
    draw: Draw,
    window: Option<Arc<Window>>,
    started: bool,
    error: Option<EngineError>,
    #[cfg(feature = "diagnostics")]
    fps: crate::diag::FpsCounter,
}

impl WinitApp {
    pub fn new(config: GameConfig, ctx: Context, systems: Systems) -> Self {
        Self {
            config,
            ctx,
            systems,
            draw: Draw::new(),
            window: None,
            started: false,
            error: None,
            #[cfg(feature = "diagnostics")]
            fps: crate::diag::FpsCounter::new(),
        }
    }

    /// The startup error, if the loop exited because of one.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    /// Create the window, GPU context and 2D backend.
    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = GpuContext::new(window.clone(), self.config.vsync)?;
        let backend = WgpuBackend::new(&gpu)?;

        let size = window.inner_size();
        self.ctx.camera.resize(size.width, size.height);
        self.ctx.ui.resize(size.width, size.height);

        self.ctx.resources.insert_resource(gpu);
        self.ctx.resources.insert_resource(backend);
        Ok(window)
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.ctx.time.update();
        let dt = self.ctx.time.delta_secs();

        self.systems.run_frame(&mut self.ctx, &mut self.draw, dt);
        self.render(event_loop);

        // Edges are visible to every system of the frame, then dropped.
        self.ctx.input.clear_just();

        #[cfg(feature = "diagnostics")]
        self.report_fps();

        if self.ctx.exit_requested() {
            log::info!("Exit requested, closing.");
            event_loop.exit();
        }
    }

    /// Flush the frame's draws into the backend, then encode and present.
    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(mut backend) = self.ctx.resources.resource_remove::<WgpuBackend>() else {
            return;
        };

        let stats = self.draw.flush(&mut backend);
        let clear = self
            .ctx
            .resources
            .get_resource::<ClearColor>()
            .copied()
            .unwrap_or_default()
            .to_wgpu();

        let result = match self.ctx.resources.get_resource::<GpuContext>() {
            Some(gpu) => render_frame(gpu, |frame| backend.encode(frame, clear)),
            None => Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(gpu) = self.ctx.resources.get_resource_mut::<GpuContext>() {
                    let (w, h) = gpu.surface_size();
                    gpu.resize(w, h);
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, stopping");
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("Skipped frame: {e:?}");
            }
        }
        backend.discard();

        #[cfg(feature = "diagnostics")]
        {
            let textures = backend.texture_count();
            if let Some(render_stats) = self
                .ctx
                .resources
                .get_resource_mut::<crate::diag::RenderStats>()
            {
                render_stats.record(stats, textures);
            }
        }
        #[cfg(not(feature = "diagnostics"))]
        let _ = stats;

        self.ctx.resources.insert_resource(backend);
    }

    #[cfg(feature = "diagnostics")]
    fn report_fps(&mut self) {
        let Some(fps) = self.fps.tick(std::time::Instant::now()) else {
            return;
        };
        let stats = self
            .ctx
            .resources
            .get_resource::<crate::diag::RenderStats>()
            .copied()
            .unwrap_or_default();
        let logged = crate::diag::log_counts();
        log::debug!(
            "{fps:.0} FPS, {} draw calls, {} quads, {} fixed steps total, {} warnings, {} errors",
            stats.draw_calls,
            stats.quads,
            self.ctx.fixed.total_steps(),
            logged.warnings,
            logged.errors
        );
        if self.config.show_fps_in_title {
            if let Some(window) = &self.window {
                window.set_title(&crate::diag::title_with_fps(&self.config.title, fps));
            }
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match self.create_renderer(event_loop) {
                Ok(window) => self.window = Some(window),
                Err(err) => {
                    self.fail(event_loop, err);
                    return;
                }
            }
        }

        if !self.started {
            self.started = true;
            self.systems.run_startup(&mut self.ctx);
            // Setup time is not part of the first frame.
            self.ctx.time = Time::new();
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                log::debug!("Resized to {}x{}", size.width, size.height);
                if let Some(gpu) = self.ctx.resources.get_resource_mut::<GpuContext>() {
                    gpu.resize(size.width, size.height);
                }
                self.ctx.camera.resize(size.width, size.height);
                if size.width > 0 && size.height > 0 {
                    self.ctx.ui.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.ctx.input.keys.press(key_code),
                        ElementState::Released => self.ctx.input.keys.release(key_code),
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => self.ctx.input.mouse.press(button),
                ElementState::Released => self.ctx.input.mouse.release(button),
            },

            WindowEvent::CursorMoved { position, .. } => {
                self.ctx.cursor.x = position.x as f32;
                self.ctx.cursor.y = position.y as f32;
            }

            WindowEvent::RedrawRequested => {
                if !self.started {
                    return;
                }
                self.frame(event_loop);

                // Request next frame.
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
