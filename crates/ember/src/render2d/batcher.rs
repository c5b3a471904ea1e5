//! The per-frame batcher.
//!
//! Owns the item queue, the two registered batches, and the shared index
//! pattern. Items are submitted in the order they were opened. A batch only
//! extends the last queued item, so each draw paints over every earlier
//! draw, whichever kind either one was.

use crate::color::Color;
use crate::math::{Mat4, Vec2};

use super::backend::RenderBackend;
use super::batch::{ColorBatch, ItemQueue, SpriteBatch};
use super::batch_item::QueuedItem;
use super::sprite::Sprite;
use super::vertex::QuadIndices;

/// Counts from one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub submissions: usize,
    pub quads: usize,
}

#[derive(Debug, Default)]
pub struct Batcher {
    queue: ItemQueue,
    color: ColorBatch,
    sprite: SpriteBatch,
    indices: QuadIndices,
}

impl Batcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_batch(&self) -> &ColorBatch {
        &self.color
    }

    pub fn sprite_batch(&self) -> &SpriteBatch {
        &self.sprite
    }

    pub fn indices(&self) -> &QuadIndices {
        &self.indices
    }

    /// Items queued since the last flush, in submission order.
    pub fn items(&self) -> &[QueuedItem] {
        self.queue.items()
    }

    pub fn pending_items(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_quads(&self) -> usize {
        self.queue.items().iter().map(QueuedItem::quad_count).sum()
    }

    /// Set the color for both batches.
    pub fn set_color(&mut self, color: Color) {
        self.color.set_color(color);
        self.sprite.set_color(color);
    }

    /// Set the projection for both batches. Both become dirty.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.color.set_projection(projection);
        self.sprite.set_projection(projection);
    }

    pub fn set_sprite(&mut self, sprite: Option<Sprite>) {
        self.sprite.set_sprite(sprite);
    }

    pub fn draw_quad(&mut self, center: Vec2, size: Vec2, rotation_degrees: f32) {
        self.color
            .draw_quad(&mut self.queue, center, size, rotation_degrees);
    }

    /// Returns `false` when no valid sprite is set.
    pub fn draw_sprite(&mut self, center: Vec2, size: Vec2, rotation_degrees: f32) -> bool {
        self.sprite
            .draw_sprite(&mut self.queue, center, size, rotation_degrees)
    }

    /// Submit every queued item in creation order, then reset.
    ///
    /// Afterwards the queue is empty and both batches are dirty, so the next
    /// frame's first draw of each kind opens a fresh item.
    pub fn flush<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> FlushStats {
        let mut stats = FlushStats::default();
        for item in self.queue.items() {
            item.flush(&self.indices, backend);
            stats.submissions += 1;
            stats.quads += item.quad_count();
        }
        self.color.set_dirty();
        self.sprite.set_dirty();
        self.queue.clear();
        stats
    }
}
