//! # Render2d — Immediate-Mode Batched 2D Rendering
//!
//! Gameplay draws rectangles and sprites one call at a time. Issuing a GPU
//! draw call per rectangle would be far too slow, so draws are collected into
//! *batch items* (up to 512 quads sharing one pipeline, projection and
//! texture) and each item becomes a single draw call at the end of the frame.
//!
//! ## Architecture
//!
//! ```text
//!   Draw (facade: color, sprite, projection)
//!     │  rect / sprite_quad
//!     ▼
//!   Batch<V> ── one per vertex kind (ColorBatch, SpriteBatch)
//!     │  stamp 4 vertices, extend open item or open a new one
//!     ▼
//!   Batcher ── ordered queue of BatchItem<V>
//!     │  flush: submit in creation order, dirty all batches, clear
//!     ▼
//!   RenderBackend ── WgpuBackend (GPU) or RecordingBackend (tests)
//! ```
//!
//! ## Design Decisions
//!
//! **CPU-side vertex transform.** Quad corners (including rotation) are
//! computed on the CPU, so the shader only applies the projection. Quads with
//! different transforms share one draw call.
//!
//! **Call order is paint order.** There is no sorting. Items are submitted in
//! the order they were opened and quads within an item keep their draw order,
//! so later draws paint over earlier ones.
//!
//! **Breaks are eager.** A new item is opened the moment the state it was
//! bound to changes (projection, texture) or it fills up. No lookahead or
//! reordering is attempted.
//!
//! ## Comparison
//!
//! - **MonoGame / XNA** (`SpriteBatch`): `Begin`/`End` brackets with optional
//!   sorting modes; deferred mode behaves like this batcher.
//! - **Love2D**: automatic batching of consecutive same-texture draws, very
//!   similar to our approach.
//! - **Bevy**: extracts sprites from the ECS and uses instancing. Much more
//!   machinery; ordering comes from Z rather than call order.

pub mod backend;
pub mod batch;
pub mod batch_item;
pub mod batcher;
pub mod draw;
pub mod gpu;
pub(crate) mod pipeline;
pub mod sprite;
pub(crate) mod texture;
pub mod vertex;

pub use backend::{
    DrawSubmission, PipelineKind, RecordedSubmission, RecordingBackend, RenderBackend,
};
pub use batch::{Batch, ColorBatch, ItemQueue, SpriteBatch};
pub use batch_item::{BatchItem, QueuedItem};
pub use batcher::{Batcher, FlushStats};
pub use draw::Draw;
pub use gpu::WgpuBackend;
pub use sprite::{Sprite, TextureHandle};
pub use vertex::{ColorVertex, FIGURES_PER_BATCH, QuadIndices, QuadVertex, SpriteVertex};
