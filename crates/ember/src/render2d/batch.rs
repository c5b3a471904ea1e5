//! # Batch — Deciding When a Draw Call Breaks
//!
//! There is one batch per geometry kind. A batch holds the ambient draw state
//! for its kind (color, projection and, for sprites, the current sprite) and
//! a reference to the item it is currently filling. Each draw stamps four
//! vertices and either extends that open item or opens a new one:
//!
//! ```text
//!   draw ──► dirty? ──yes──► open new item ──► append
//!              │                  ▲
//!              no                 │
//!              ▼                  │
//!    item still last in queue? ─no┤
//!              │                  │
//!             yes                 │
//!              ▼                  │
//!        item full? ───yes────────┤
//!              │                  │
//!              no                 │
//!              ▼                  │
//!      texture changed? ──yes─────┘
//!              │
//!              no ──► append to open item
//! ```
//!
//! A batch is *dirty* when it has no open item. Setting a new projection
//! makes it dirty, as does switching to a sprite on a different texture, and
//! the batcher makes every batch dirty when it flushes. Changing the color
//! only affects vertices stamped afterwards, so it never breaks a batch.
//!
//! An open item is only extended while nothing has been queued after it.
//! `rect, sprite, rect` therefore yields three items, and every draw paints
//! over the draws issued before it, whichever batch they went to.
//!
//! ## Comparison
//!
//! - **Love2D**: `SpriteBatch` objects break on texture change, very similar.
//! - **MonoGame** (`SpriteBatch`): sorts and breaks per texture at `End()`;
//!   here breaks happen eagerly on each draw, in call order.

use std::marker::PhantomData;

use crate::color::Color;
use crate::math::{Mat4, Vec2, quad_corners, rotated_quad_corners};

use super::batch_item::{BatchItem, QueuedItem};
use super::sprite::{Sprite, TextureHandle};
use super::vertex::{ColorVertex, QuadVertex, SpriteVertex};

/// The ordered list of items waiting for the next flush.
///
/// Only batches add to it; the batcher drains it.
#[derive(Debug, Default)]
pub struct ItemQueue {
    items: Vec<QueuedItem>,
}

impl ItemQueue {
    pub(crate) fn add(&mut self, item: QueuedItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut QueuedItem> {
        self.items.get_mut(index)
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[QueuedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ambient state and open item for one vertex kind.
#[derive(Debug)]
pub struct Batch<V: QuadVertex> {
    open: Option<usize>,
    color: Color,
    projection: Mat4,
    sprite: Option<Sprite>,
    _vertex: PhantomData<V>,
}

pub type ColorBatch = Batch<ColorVertex>;
pub type SpriteBatch = Batch<SpriteVertex>;

impl<V: QuadVertex> Batch<V> {
    pub fn new() -> Self {
        Self {
            open: None,
            color: Color::WHITE,
            projection: Mat4::IDENTITY,
            sprite: None,
            _vertex: PhantomData,
        }
    }

    /// True when the next draw must open a new item.
    pub fn is_dirty(&self) -> bool {
        self.open.is_none()
    }

    /// Forget the open item.
    pub fn set_dirty(&mut self) {
        self.open = None;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Replace the projection. Always breaks the batch, even when the matrix
    /// is unchanged.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.set_dirty();
    }

    /// Append one stamped quad, opening a new item when the open one cannot
    /// take it.
    ///
    /// The open item is only extended while it is the last queued item. Once
    /// the other batch has queued something after it, extending it would
    /// paint this quad beneath that later draw.
    fn push_quad(&mut self, queue: &mut ItemQueue, quad: &[V; 4], texture: Option<TextureHandle>) {
        let tail = queue.len().checked_sub(1);
        let open = self
            .open
            .filter(|&index| Some(index) == tail)
            .and_then(|index| queue.get_mut(index))
            .and_then(V::from_queued_mut)
            .filter(|item| item.can_accept(1) && same_texture(item.texture(), texture));

        match open {
            Some(item) => item.append(quad),
            None => {
                let mut item = BatchItem::<V>::new(self.projection, texture);
                item.append(quad);
                self.open = Some(queue.add(V::into_queued(item)));
            }
        }
    }
}

impl<V: QuadVertex> Default for Batch<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl Batch<ColorVertex> {
    /// Stamp a colored quad centered at `center`, rotated counter-clockwise
    /// by `rotation_degrees`.
    pub(crate) fn draw_quad(
        &mut self,
        queue: &mut ItemQueue,
        center: Vec2,
        size: Vec2,
        rotation_degrees: f32,
    ) {
        let corners = corners(center, size, rotation_degrees);
        let color = self.color.to_array();
        let quad = corners.map(|p| ColorVertex {
            position: p.to_array(),
            color,
        });
        self.push_quad(queue, &quad, None);
    }
}

impl Batch<SpriteVertex> {
    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    /// Replace the ambient sprite. Breaks the batch when the texture changes;
    /// switching regions of one texture does not. Clearing the sprite keeps
    /// the open item, and the next sprite only reuses it if it samples the
    /// same texture.
    pub fn set_sprite(&mut self, sprite: Option<Sprite>) {
        let texture_changed = match (&self.sprite, &sprite) {
            (Some(old), Some(new)) => !old.texture().same_texture(&new.texture()),
            _ => false,
        };
        if texture_changed {
            self.set_dirty();
        }
        self.sprite = sprite;
    }

    /// Stamp a textured quad with the ambient sprite.
    ///
    /// Returns `false` and draws nothing when no valid sprite is set.
    pub(crate) fn draw_sprite(
        &mut self,
        queue: &mut ItemQueue,
        center: Vec2,
        size: Vec2,
        rotation_degrees: f32,
    ) -> bool {
        let Some(sprite) = self.sprite.filter(Sprite::is_valid) else {
            return false;
        };
        let corners = corners(center, size, rotation_degrees);
        let uvs = sprite.uv_corners();
        let color = self.color.to_array();
        let quad = [0, 1, 2, 3].map(|i| SpriteVertex {
            position: corners[i].to_array(),
            color,
            uv: uvs[i],
        });
        self.push_quad(queue, &quad, Some(sprite.texture()));
        true
    }
}

fn corners(center: Vec2, size: Vec2, rotation_degrees: f32) -> [Vec2; 4] {
    if rotation_degrees == 0.0 {
        quad_corners(center, size)
    } else {
        rotated_quad_corners(center, size, rotation_degrees)
    }
}

fn same_texture(a: Option<TextureHandle>, b: Option<TextureHandle>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same_texture(&b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render2d::backend::PipelineKind;

    fn sheet(index: usize) -> Sprite {
        Sprite::new(TextureHandle::new(index, 16, 16))
    }

    #[test]
    fn new_batch_is_dirty_and_first_draw_opens_an_item() {
        let mut queue = ItemQueue::default();
        let mut batch = ColorBatch::new();
        assert!(batch.is_dirty());
        batch.draw_quad(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        assert!(!batch.is_dirty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn color_change_does_not_break_the_batch() {
        let mut queue = ItemQueue::default();
        let mut batch = ColorBatch::new();
        batch.draw_quad(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        batch.set_color(Color::RED);
        batch.draw_quad(&mut queue, Vec2::ONE, Vec2::ONE, 0.0);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.items()[0].quad_count(), 2);
    }

    #[test]
    fn projection_change_breaks_the_batch() {
        let mut queue = ItemQueue::default();
        let mut batch = ColorBatch::new();
        batch.draw_quad(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        batch.set_projection(Mat4::IDENTITY);
        assert!(batch.is_dirty());
        batch.draw_quad(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn sprite_region_change_on_same_texture_keeps_the_item() {
        let mut queue = ItemQueue::default();
        let mut batch = SpriteBatch::new();
        batch.set_sprite(Some(sheet(1)));
        assert!(batch.draw_sprite(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0));
        let region = crate::math::RectInt::from_bounds(0, 0, 8, 8);
        let frame = Sprite::from_region(TextureHandle::new(1, 16, 16), region);
        batch.set_sprite(Some(frame));
        assert!(!batch.is_dirty());
        assert!(batch.draw_sprite(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn sprite_texture_change_breaks_the_batch() {
        let mut queue = ItemQueue::default();
        let mut batch = SpriteBatch::new();
        batch.set_sprite(Some(sheet(1)));
        batch.draw_sprite(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        batch.set_sprite(Some(sheet(2)));
        assert!(batch.is_dirty());
        batch.draw_sprite(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn open_item_behind_a_later_item_is_not_extended() {
        let mut queue = ItemQueue::default();
        let mut color = ColorBatch::new();
        let mut sprites = SpriteBatch::new();
        sprites.set_sprite(Some(sheet(1)));

        color.draw_quad(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        sprites.draw_sprite(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0);
        color.draw_quad(&mut queue, Vec2::splat(5.0), Vec2::ONE, 0.0);
        color.draw_quad(&mut queue, Vec2::splat(6.0), Vec2::ONE, 0.0);

        let counts: Vec<_> = queue.items().iter().map(|i| (i.kind(), i.quad_count())).collect();
        assert_eq!(
            counts,
            [
                (PipelineKind::Color, 1),
                (PipelineKind::Sprite, 1),
                (PipelineKind::Color, 2),
            ]
        );
    }

    #[test]
    fn a_foreign_queue_never_receives_quads_for_a_stale_index() {
        let mut first = ItemQueue::default();
        let mut second = ItemQueue::default();
        let mut batch = ColorBatch::new();
        batch.draw_quad(&mut first, Vec2::ZERO, Vec2::ONE, 0.0);

        // Index 0 is open in `first`; in `second` it would be another item.
        batch.draw_quad(&mut second, Vec2::ZERO, Vec2::ONE, 0.0);
        second.add(QueuedItem::Color(BatchItem::new(Mat4::IDENTITY, None)));
        batch.draw_quad(&mut second, Vec2::ZERO, Vec2::ONE, 0.0);

        assert_eq!(first.items()[0].quad_count(), 1);
        let counts: Vec<_> = second.items().iter().map(QueuedItem::quad_count).collect();
        assert_eq!(counts, [1, 0, 1]);
    }

    #[test]
    fn drawing_without_a_valid_sprite_is_refused() {
        let mut queue = ItemQueue::default();
        let mut batch = SpriteBatch::new();
        assert!(!batch.draw_sprite(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0));
        batch.set_sprite(Some(Sprite::new(TextureHandle::new(4, 0, 0))));
        assert!(!batch.draw_sprite(&mut queue, Vec2::ZERO, Vec2::ONE, 0.0));
        assert!(queue.is_empty());
    }
}
