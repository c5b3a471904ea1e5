//! # Vertex — Per-Corner Data for Batched Quads
//!
//! Every primitive the 2D renderer draws is a quad: four corners in a fixed
//! order (bottom-left, bottom-right, top-right, top-left) and six indices
//! forming two triangles. Corners are stamped on the CPU with world-space
//! positions and the ambient color, so quads with different transforms can
//! share one vertex buffer and one draw call.
//!
//! ## Two Vertex Kinds
//!
//! ```text
//! ColorVertex (24 bytes, 6 floats)
//! ┌────────────────┬────────────────────────┐
//! │ position       │ color                  │
//! │ [f32; 2]       │ [f32; 4]               │
//! │ offset 0       │ offset 8               │
//! │ location(0)    │ location(1)            │
//! └────────────────┴────────────────────────┘
//!
//! SpriteVertex (32 bytes, 8 floats)
//! ┌────────────────┬────────────────────────┬──────────────┐
//! │ position       │ color                  │ uv           │
//! │ [f32; 2]       │ [f32; 4]               │ [f32; 2]     │
//! │ offset 0       │ offset 8               │ offset 24    │
//! │ location(0)    │ location(1)            │ location(2)  │
//! └────────────────┴────────────────────────┴──────────────┘
//! ```
//!
//! Both are `#[repr(C)]` + `Pod`, so a `Vec<V>` is a flat run of floats that
//! can be cast to bytes for upload without copying.
//!
//! ## Shared Index Pattern
//!
//! The index buffer never changes: quad `i` uses
//! `[0, 1, 2, 2, 3, 0] + 4 * i`. [`QuadIndices`] builds it once for a full
//! batch item and every flush reads a prefix of it.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use super::backend::PipelineKind;
use super::batch_item::{BatchItem, QueuedItem};

/// Maximum number of quads one batch item holds.
pub const FIGURES_PER_BATCH: usize = 512;
pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Triangle indices of one quad relative to its first vertex.
pub const QUAD_INDEX_PATTERN: [u32; INDICES_PER_QUAD] = [0, 1, 2, 2, 3, 0];

/// A vertex type that can be staged in a [`BatchItem`].
///
/// Implemented by [`ColorVertex`] and [`SpriteVertex`]. The queue stores the
/// two concrete item kinds in an enum; `into_queued`/`from_queued` move an
/// item in and out of it without dynamic dispatch.
pub trait QuadVertex: Pod + std::fmt::Debug + 'static {
    /// Which pipeline draws this vertex kind.
    const KIND: PipelineKind;
    /// Floats per vertex.
    const FLOATS: usize = std::mem::size_of::<Self>() / std::mem::size_of::<f32>();
    const LAYOUT: wgpu::VertexBufferLayout<'static>;

    #[doc(hidden)]
    fn into_queued(item: BatchItem<Self>) -> QueuedItem;
    #[doc(hidden)]
    fn from_queued(item: &QueuedItem) -> Option<&BatchItem<Self>>;
    #[doc(hidden)]
    fn from_queued_mut(item: &mut QueuedItem) -> Option<&mut BatchItem<Self>>;
}

/// Vertex of an untextured, colored quad.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl QuadVertex for ColorVertex {
    const KIND: PipelineKind = PipelineKind::Color;
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    fn into_queued(item: BatchItem<Self>) -> QueuedItem {
        QueuedItem::Color(item)
    }

    fn from_queued(item: &QueuedItem) -> Option<&BatchItem<Self>> {
        match item {
            QueuedItem::Color(item) => Some(item),
            QueuedItem::Sprite(_) => None,
        }
    }

    fn from_queued_mut(item: &mut QueuedItem) -> Option<&mut BatchItem<Self>> {
        match item {
            QueuedItem::Color(item) => Some(item),
            QueuedItem::Sprite(_) => None,
        }
    }
}

/// Vertex of a textured quad. The color tints the sampled texel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl QuadVertex for SpriteVertex {
    const KIND: PipelineKind = PipelineKind::Sprite;
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    fn into_queued(item: BatchItem<Self>) -> QueuedItem {
        QueuedItem::Sprite(item)
    }

    fn from_queued(item: &QueuedItem) -> Option<&BatchItem<Self>> {
        match item {
            QueuedItem::Sprite(item) => Some(item),
            QueuedItem::Color(_) => None,
        }
    }

    fn from_queued_mut(item: &mut QueuedItem) -> Option<&mut BatchItem<Self>> {
        match item {
            QueuedItem::Sprite(item) => Some(item),
            QueuedItem::Color(_) => None,
        }
    }
}

/// The index pattern for a full batch item, built once and shared.
#[derive(Debug, Clone)]
pub struct QuadIndices(Arc<[u32]>);

impl QuadIndices {
    pub fn new() -> Self {
        let indices: Vec<u32> = (0..FIGURES_PER_BATCH as u32)
            .flat_map(|quad| {
                QUAD_INDEX_PATTERN.map(|i| i + quad * VERTICES_PER_QUAD as u32)
            })
            .collect();
        Self(indices.into())
    }

    /// Indices covering the first `quad_count` quads.
    ///
    /// Panics if `quad_count` exceeds [`FIGURES_PER_BATCH`].
    pub fn for_quads(&self, quad_count: usize) -> &[u32] {
        &self.0[..quad_count * INDICES_PER_QUAD]
    }

    pub fn all(&self) -> &[u32] {
        &self.0
    }
}

impl Default for QuadIndices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_counts_match_layouts() {
        assert_eq!(ColorVertex::FLOATS, 6);
        assert_eq!(SpriteVertex::FLOATS, 8);
        assert_eq!(ColorVertex::LAYOUT.array_stride, 24);
        assert_eq!(SpriteVertex::LAYOUT.array_stride, 32);
    }

    #[test]
    fn index_pattern_offsets_by_four_per_quad() {
        let indices = QuadIndices::new();
        assert_eq!(indices.all().len(), FIGURES_PER_BATCH * INDICES_PER_QUAD);
        assert_eq!(indices.for_quads(1), &[0, 1, 2, 2, 3, 0]);
        assert_eq!(&indices.for_quads(2)[6..], &[4, 5, 6, 6, 7, 4]);
        let last = &indices.all()[(FIGURES_PER_BATCH - 1) * INDICES_PER_QUAD..];
        let base = (FIGURES_PER_BATCH as u32 - 1) * 4;
        assert_eq!(last, &[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}
