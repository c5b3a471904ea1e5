//! # Pipeline — The Two Quad Pipelines
//!
//! Batched geometry comes in two kinds and each has its own render pipeline:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ color pipeline                 sprite pipeline                │
//! │                                                               │
//! │  color.wgsl                     sprite.wgsl                   │
//! │  ColorVertex { pos, color }     SpriteVertex { pos, color,    │
//! │                                                uv }           │
//! │  group 0: projection            group 0: projection           │
//! │           (dynamic offset)               (dynamic offset)     │
//! │                                 group 1: texture + sampler    │
//! │                                                               │
//! │  ALPHA_BLENDING, TriangleList, no culling, no depth           │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each batch item carries its own projection. All projections of a frame go
//! into one uniform buffer, one aligned slot each, and a draw call selects its
//! slot with a dynamic offset instead of a separate bind group per item.
//!
//! Shader compilation and pipeline creation run inside a validation error
//! scope. A failure is returned as [`EngineError::Shader`] rather than
//! surfacing later as a device-lost panic, so startup can log it and exit.

use crate::error::{EngineError, Result};
use crate::math::Mat4;
use crate::render::GpuContext;

use super::vertex::{ColorVertex, QuadVertex, SpriteVertex};

/// Bytes of one projection matrix.
pub(crate) const PROJECTION_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;

/// GPU state shared by every 2D draw call.
pub(crate) struct QuadPipelines {
    pub color: wgpu::RenderPipeline,
    pub sprite: wgpu::RenderPipeline,
    pub projection_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
}

impl QuadPipelines {
    pub fn new(gpu: &GpuContext) -> Result<Self> {
        let device = &gpu.device;

        let projection_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("projection bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(PROJECTION_SIZE),
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let color = build_pipeline::<ColorVertex>(
            gpu,
            "color",
            include_str!("color.wgsl"),
            &[&projection_bind_group_layout],
        )?;
        let sprite = build_pipeline::<SpriteVertex>(
            gpu,
            "sprite",
            include_str!("sprite.wgsl"),
            &[&projection_bind_group_layout, &texture_bind_group_layout],
        )?;

        // Clamped so atlas regions never pick up texels across the edge.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!("2D pipelines created (format {:?})", gpu.surface_format());

        Ok(Self {
            color,
            sprite,
            projection_bind_group_layout,
            texture_bind_group_layout,
            sampler,
        })
    }
}

/// Compile `source` and link it into a pipeline for vertex kind `V`.
fn build_pipeline<V: QuadVertex>(
    gpu: &GpuContext,
    label: &str,
    source: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> Result<wgpu::RenderPipeline> {
    let device = &gpu.device;

    // Push an error scope so validation errors come back as values.
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[V::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(EngineError::Shader {
            label: label.to_owned(),
            message: err.to_string(),
        });
    }

    log::debug!("Built {label} pipeline");
    Ok(pipeline)
}

/// Round `value` up to a multiple of `align` (a power of two).
pub(crate) fn align_up(value: u64, align: u64) -> u64 {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_the_next_multiple() {
        assert_eq!(align_up(64, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(0, 64), 0);
    }

    #[test]
    fn projection_is_a_four_by_four_float_matrix() {
        assert_eq!(PROJECTION_SIZE, 64);
    }

    #[test]
    fn shaders_declare_the_expected_entry_points() {
        for source in [include_str!("color.wgsl"), include_str!("sprite.wgsl")] {
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
        assert!(include_str!("sprite.wgsl").contains("@group(1)"));
    }
}
