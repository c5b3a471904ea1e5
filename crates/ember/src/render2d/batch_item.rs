//! Batch items: capacity-bounded staging buffers.
//!
//! A batch item is one future draw call. It is opened with a fixed state
//! (pipeline kind, projection, texture), filled with up to
//! [`FIGURES_PER_BATCH`] quads, submitted exactly once when the batcher
//! flushes, then dropped.

use crate::math::Mat4;

use super::backend::{DrawSubmission, PipelineKind, RenderBackend};
use super::sprite::TextureHandle;
use super::vertex::{
    ColorVertex, FIGURES_PER_BATCH, QuadIndices, QuadVertex, SpriteVertex, VERTICES_PER_QUAD,
};

/// Staged quads sharing one draw state.
#[derive(Debug, Clone)]
pub struct BatchItem<V: QuadVertex> {
    vertices: Vec<V>,
    quad_count: usize,
    projection: Mat4,
    texture: Option<TextureHandle>,
}

impl<V: QuadVertex> BatchItem<V> {
    /// An empty item bound to `projection` and, for sprites, `texture`.
    pub fn new(projection: Mat4, texture: Option<TextureHandle>) -> Self {
        Self {
            vertices: Vec::with_capacity(FIGURES_PER_BATCH * VERTICES_PER_QUAD),
            quad_count: 0,
            projection,
            texture,
        }
    }

    /// Whether `quads` more quads fit.
    pub fn can_accept(&self, quads: usize) -> bool {
        self.quad_count + quads <= FIGURES_PER_BATCH
    }

    /// Append pre-stamped vertices, four per quad.
    ///
    /// Panics if the quads do not fit; callers check
    /// [`can_accept`](Self::can_accept) first.
    pub fn append(&mut self, vertices: &[V]) {
        assert!(
            vertices.len() % VERTICES_PER_QUAD == 0,
            "batch item append takes whole quads, got {} vertices",
            vertices.len()
        );
        let quads = vertices.len() / VERTICES_PER_QUAD;
        assert!(
            self.can_accept(quads),
            "batch item overflow: {} + {} quads exceeds {}",
            self.quad_count,
            quads,
            FIGURES_PER_BATCH
        );
        self.vertices.extend_from_slice(vertices);
        self.quad_count += quads;
    }

    /// Submit the staged quads as one draw call.
    pub fn flush<B: RenderBackend + ?Sized>(&self, indices: &QuadIndices, backend: &mut B) {
        backend.submit(DrawSubmission {
            kind: V::KIND,
            texture: self.texture,
            projection: self.projection,
            vertices: bytemuck::cast_slice(&self.vertices),
            quad_count: self.quad_count,
            indices: indices.for_quads(self.quad_count),
        });
    }

    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }
}

/// A queued item of either kind, in creation order.
#[derive(Debug, Clone)]
pub enum QueuedItem {
    Color(BatchItem<ColorVertex>),
    Sprite(BatchItem<SpriteVertex>),
}

impl QueuedItem {
    pub fn kind(&self) -> PipelineKind {
        match self {
            QueuedItem::Color(_) => PipelineKind::Color,
            QueuedItem::Sprite(_) => PipelineKind::Sprite,
        }
    }

    pub fn quad_count(&self) -> usize {
        match self {
            QueuedItem::Color(item) => item.quad_count(),
            QueuedItem::Sprite(item) => item.quad_count(),
        }
    }

    pub fn flush<B: RenderBackend + ?Sized>(&self, indices: &QuadIndices, backend: &mut B) {
        match self {
            QueuedItem::Color(item) => item.flush(indices, backend),
            QueuedItem::Sprite(item) => item.flush(indices, backend),
        }
    }
}
