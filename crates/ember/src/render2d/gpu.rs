//! # WgpuBackend — Turning Submissions into Draw Calls
//!
//! The batcher flushes into a [`RenderBackend`]; this is the one that talks
//! to the GPU. Flushing only records: vertex floats are appended to one
//! staging array per vertex kind and each submission becomes a
//! `DrawCommand`. [`encode`](WgpuBackend::encode) then uploads everything
//! and replays the commands inside a single render pass:
//!
//! ```text
//! flush                          encode
//! ─────                          ──────
//! submit(color, 512 quads) ─┐    upload color / sprite vertex buffers
//! submit(sprite, tex 3)   ──┼─►  upload projection slots
//! submit(color, 88 quads) ─┘     begin pass (clear)
//!                                for each command, in order:
//!                                  set pipeline + projection slot
//!                                  [bind texture]
//!                                  draw_indexed(0..n*6, base_vertex)
//! ```
//!
//! The index buffer is static: the 512-quad pattern is uploaded once and
//! every draw call reads a prefix of it, offset by `base_vertex` into the
//! shared vertex buffer of its kind.

use wgpu::util::DeviceExt;

use crate::math::Mat4;
use crate::render::GpuContext;
use crate::render::pass::FrameContext;

use super::backend::{DrawSubmission, PipelineKind, RenderBackend};
use super::pipeline::{PROJECTION_SIZE, QuadPipelines, align_up};
use super::sprite::TextureHandle;
use super::texture::TextureStore;
use super::vertex::QuadIndices;

/// One recorded draw call.
#[derive(Debug, Clone, Copy)]
struct DrawCommand {
    kind: PipelineKind,
    texture: Option<TextureHandle>,
    base_vertex: i32,
    index_count: u32,
    projection_slot: u32,
}

/// The wgpu implementation of [`RenderBackend`].
///
/// Stored as a resource next to [`GpuContext`]. It also owns the texture
/// store, since textures are only meaningful to the pipelines that sample
/// them.
pub struct WgpuBackend {
    pipelines: QuadPipelines,
    textures: TextureStore,
    index_buffer: wgpu::Buffer,

    color_vertices: Vec<f32>,
    sprite_vertices: Vec<f32>,
    projections: Vec<Mat4>,
    commands: Vec<DrawCommand>,

    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    projection_capacity: usize,
    projection_stride: u64,
}

impl WgpuBackend {
    pub fn new(gpu: &GpuContext) -> crate::Result<Self> {
        let pipelines = QuadPipelines::new(gpu)?;
        let textures = TextureStore::new(gpu, &pipelines);

        let indices = QuadIndices::new();
        let index_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad index buffer"),
            contents: bytemuck::cast_slice(indices.all()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let align = gpu.device.limits().min_uniform_buffer_offset_alignment as u64;
        let projection_stride = align_up(PROJECTION_SIZE, align);
        let projection_capacity = 16;
        let (projection_buffer, projection_bind_group) = create_projection_buffer(
            &gpu.device,
            &pipelines.projection_bind_group_layout,
            projection_stride,
            projection_capacity,
        );

        Ok(Self {
            pipelines,
            textures,
            index_buffer,
            color_vertices: Vec::new(),
            sprite_vertices: Vec::new(),
            projections: Vec::new(),
            commands: Vec::new(),
            projection_buffer,
            projection_bind_group,
            projection_capacity,
            projection_stride,
        })
    }

    /// Load an image file as a texture.
    pub fn load_texture(
        &mut self,
        gpu: &GpuContext,
        path: impl AsRef<std::path::Path>,
    ) -> crate::Result<TextureHandle> {
        self.textures.load(gpu, &self.pipelines, path)
    }

    /// Upload raw RGBA8 pixels (top row first) as a texture.
    pub fn create_texture(
        &mut self,
        gpu: &GpuContext,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> TextureHandle {
        self.textures
            .create_from_rgba(gpu, &self.pipelines, label, width, height, data)
    }

    /// The built-in 1x1 white texture.
    pub fn white_texture(&self) -> TextureHandle {
        self.textures.default_handle()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Pixel size of a loaded texture.
    pub fn texture_size(&self, handle: TextureHandle) -> (u32, u32) {
        let entry = self.textures.get(handle);
        (entry.width, entry.height)
    }

    /// Draw calls recorded since the last encode.
    pub fn pending_draw_calls(&self) -> usize {
        self.commands.len()
    }

    /// Upload the recorded geometry and replay it in one render pass that
    /// first clears to `clear`.
    pub(crate) fn encode(&mut self, frame: &mut FrameContext<'_>, clear: wgpu::Color) {
        let gpu = frame.gpu;

        let color_buffer = vertex_buffer(gpu, "color vertex buffer", &self.color_vertices);
        let sprite_buffer = vertex_buffer(gpu, "sprite vertex buffer", &self.sprite_vertices);
        self.upload_projections(gpu);

        {
            let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("2d render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for command in &self.commands {
                let offset = (command.projection_slot as u64 * self.projection_stride) as u32;
                let vertices = match command.kind {
                    PipelineKind::Color => {
                        render_pass.set_pipeline(&self.pipelines.color);
                        &color_buffer
                    }
                    PipelineKind::Sprite => {
                        render_pass.set_pipeline(&self.pipelines.sprite);
                        let texture = command
                            .texture
                            .unwrap_or_else(|| self.textures.default_handle());
                        render_pass.set_bind_group(1, &self.textures.get(texture).bind_group, &[]);
                        &sprite_buffer
                    }
                };
                let Some(vertices) = vertices else { continue };
                render_pass.set_bind_group(0, &self.projection_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, vertices.slice(..));
                render_pass.draw_indexed(0..command.index_count, command.base_vertex, 0..1);
            }
        }

        self.discard();
    }

    /// Drop everything recorded since the last encode, e.g. when the surface
    /// could not be acquired this frame.
    pub(crate) fn discard(&mut self) {
        self.color_vertices.clear();
        self.sprite_vertices.clear();
        self.projections.clear();
        self.commands.clear();
    }

    /// Write every projection slot, growing the buffer if needed.
    fn upload_projections(&mut self, gpu: &GpuContext) {
        if self.projections.is_empty() {
            return;
        }
        if self.projections.len() > self.projection_capacity {
            let capacity = self.projections.len().next_power_of_two();
            let (buffer, bind_group) = create_projection_buffer(
                &gpu.device,
                &self.pipelines.projection_bind_group_layout,
                self.projection_stride,
                capacity,
            );
            self.projection_buffer = buffer;
            self.projection_bind_group = bind_group;
            self.projection_capacity = capacity;
            log::debug!("Grew projection buffer to {capacity} slots");
        }

        let stride = self.projection_stride as usize;
        let mut bytes = vec![0u8; stride * self.projections.len()];
        for (slot, projection) in self.projections.iter().enumerate() {
            let start = slot * stride;
            bytes[start..start + PROJECTION_SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&projection.to_cols_array()));
        }
        gpu.queue.write_buffer(&self.projection_buffer, 0, &bytes);
    }

    /// Index of `projection` in this frame's slots, reusing the last slot
    /// when the projection did not change.
    fn projection_slot(&mut self, projection: Mat4) -> u32 {
        if self.projections.last() != Some(&projection) {
            self.projections.push(projection);
        }
        (self.projections.len() - 1) as u32
    }
}

impl RenderBackend for WgpuBackend {
    fn submit(&mut self, submission: DrawSubmission<'_>) {
        let projection_slot = self.projection_slot(submission.projection);
        let staging = match submission.kind {
            PipelineKind::Color => &mut self.color_vertices,
            PipelineKind::Sprite => &mut self.sprite_vertices,
        };
        let base_vertex = (staging.len() / submission.kind.floats_per_vertex()) as i32;
        staging.extend_from_slice(submission.vertices);

        self.commands.push(DrawCommand {
            kind: submission.kind,
            texture: submission.texture,
            base_vertex,
            index_count: submission.indices.len() as u32,
            projection_slot,
        });
    }
}

fn vertex_buffer(gpu: &GpuContext, label: &str, vertices: &[f32]) -> Option<wgpu::Buffer> {
    if vertices.is_empty() {
        return None;
    }
    Some(gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    }))
}

fn create_projection_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("projection uniform buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("projection bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(PROJECTION_SIZE),
            }),
        }],
    });

    (buffer, bind_group)
}
