//! Frame acquisition and presentation.
//!
//! [`render_frame`] acquires the surface texture, hands an encoder and view
//! to the caller, then submits and presents. The 2D backend records its single
//! render pass inside the callback.

use crate::color::Color;
use crate::render::gpu::GpuContext;

/// The clear color resource. Set this to change the background color.
#[derive(Debug, Clone, Copy)]
pub struct ClearColor(pub [f64; 4]);

impl ClearColor {
    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0[0],
            g: self.0[1],
            b: self.0[2],
            a: self.0[3],
        }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::from(Color::LIGHT_DARK)
    }
}

impl From<Color> for ClearColor {
    fn from(color: Color) -> Self {
        let c = color.to_wgpu();
        Self([c.r, c.g, c.b, c.a])
    }
}

/// Per-frame render context passed to the renderer.
pub(crate) struct FrameContext<'a> {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    pub gpu: &'a GpuContext,
}

/// Render a single frame: acquire, record through `record`, submit, present.
pub(crate) fn render_frame(
    gpu: &GpuContext,
    record: impl FnOnce(&mut FrameContext<'_>),
) -> Result<(), wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("ember frame encoder"),
        });

    let mut frame = FrameContext { encoder, view, gpu };

    record(&mut frame);

    gpu.queue.submit(std::iter::once(frame.encoder.finish()));
    output.present();

    Ok(())
}
