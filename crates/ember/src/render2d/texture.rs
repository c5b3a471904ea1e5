//! # Textures — Uploaded Pixels and Their Handles
//!
//! Textures are loaded from flat image files (PNG/JPEG through the `image`
//! crate) or built from raw RGBA8 pixels, uploaded once, and referred to by
//! [`TextureHandle`] from then on.
//!
//! ```text
//!   handle index   entry
//!   ────────────   ─────────────────────────────
//!        0         white 1x1, created with the store
//!        1         "ship.png"          (path_cache → 1)
//!        2         "asteroids" atlas   (generated)
//! ```
//!
//! A handle the store does not know resolves to the white texture, so a
//! stray handle tints a quad instead of failing the frame.
//!
//! Pixel rows are uploaded in image order (top row first). Sprite UVs count
//! from the bottom; the sprite shader flips `v` when sampling.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

use crate::error::{EngineError, Result};
use crate::render::GpuContext;

use super::pipeline::QuadPipelines;
use super::sprite::TextureHandle;

/// A texture's bind group and pixel size.
pub(crate) struct TextureEntry {
    pub bind_group: wgpu::BindGroup,
    pub width: u32,
    pub height: u32,
}

/// Every texture uploaded so far, indexed by [`TextureHandle`].
pub(crate) struct TextureStore {
    entries: Vec<TextureEntry>,
    path_cache: HashMap<PathBuf, TextureHandle>,
}

impl TextureStore {
    /// A store holding only the white texture at index 0.
    pub fn new(gpu: &GpuContext, pipelines: &QuadPipelines) -> Self {
        let white = upload(gpu, pipelines, "white 1x1", 1, 1, &[255u8, 255, 255, 255]);
        Self {
            entries: vec![white],
            path_cache: HashMap::new(),
        }
    }

    pub fn default_handle(&self) -> TextureHandle {
        TextureHandle::new(0, 1, 1)
    }

    /// Get the entry for a handle, or the white texture for unknown handles.
    pub fn get(&self, handle: TextureHandle) -> &TextureEntry {
        self.entries.get(handle.index).unwrap_or(&self.entries[0])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Load an image file. Loading the same path twice returns the same
    /// handle without a second upload.
    pub fn load(
        &mut self,
        gpu: &GpuContext,
        pipelines: &QuadPipelines,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle> {
        let path = path.as_ref();
        if let Some(&handle) = self.path_cache.get(path) {
            return Ok(handle);
        }

        let img = image::open(path)
            .map_err(|source| EngineError::Texture {
                path: path.to_owned(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();

        let label = path.to_string_lossy();
        let handle = self.create_from_rgba(gpu, pipelines, &label, width, height, img.as_raw());
        self.path_cache.insert(path.to_owned(), handle);
        log::info!("Loaded texture '{}' ({width}x{height})", path.display());
        Ok(handle)
    }

    /// Upload raw RGBA8 pixels (top row first) as a new texture.
    pub fn create_from_rgba(
        &mut self,
        gpu: &GpuContext,
        pipelines: &QuadPipelines,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> TextureHandle {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        let handle = TextureHandle::new(self.entries.len(), width, height);
        self.entries
            .push(upload(gpu, pipelines, label, width, height, data));
        handle
    }
}

fn upload(
    gpu: &GpuContext,
    pipelines: &QuadPipelines,
    label: &str,
    width: u32,
    height: u32,
    data: &[u8],
) -> TextureEntry {
    let texture = gpu.device.create_texture_with_data(
        &gpu.queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        data,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &pipelines.texture_bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&pipelines.sampler),
            },
        ],
    });

    TextureEntry {
        bind_group,
        width,
        height,
    }
}
