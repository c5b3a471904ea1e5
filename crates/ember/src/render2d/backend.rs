//! The submission seam between batching and the GPU.
//!
//! Batching never touches wgpu directly. Each flushed batch item becomes one
//! [`DrawSubmission`] handed to a [`RenderBackend`]. The real backend
//! ([`WgpuBackend`](super::gpu::WgpuBackend)) turns submissions into draw
//! calls; [`RecordingBackend`] keeps owned copies so batching can be tested
//! and run headless.

use crate::math::Mat4;

use super::sprite::TextureHandle;

/// Which pipeline draws a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Position + color.
    Color,
    /// Position + color + UV, sampled from a texture.
    Sprite,
}

impl PipelineKind {
    pub fn floats_per_vertex(self) -> usize {
        match self {
            PipelineKind::Color => 6,
            PipelineKind::Sprite => 8,
        }
    }
}

/// One draw call worth of geometry, borrowed from the batch item.
#[derive(Debug, Clone, Copy)]
pub struct DrawSubmission<'a> {
    pub kind: PipelineKind,
    /// Bound texture for sprite submissions.
    pub texture: Option<TextureHandle>,
    pub projection: Mat4,
    /// `quad_count * 4` vertices, flattened.
    pub vertices: &'a [f32],
    pub quad_count: usize,
    /// `quad_count * 6` indices relative to the first vertex.
    pub indices: &'a [u32],
}

impl DrawSubmission<'_> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.kind.floats_per_vertex()
    }
}

/// Receives draw submissions in flush order.
pub trait RenderBackend {
    fn submit(&mut self, submission: DrawSubmission<'_>);
}

/// An owned copy of a [`DrawSubmission`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSubmission {
    pub kind: PipelineKind,
    pub texture: Option<TextureHandle>,
    pub projection: Mat4,
    pub vertices: Vec<f32>,
    pub quad_count: usize,
    pub indices: Vec<u32>,
}

impl RecordedSubmission {
    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> [f32; 2] {
        let base = index * self.kind.floats_per_vertex();
        [self.vertices[base], self.vertices[base + 1]]
    }

    /// Color of vertex `index`.
    pub fn color(&self, index: usize) -> [f32; 4] {
        let base = index * self.kind.floats_per_vertex() + 2;
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
            self.vertices[base + 3],
        ]
    }

    /// UV of vertex `index`, for sprite submissions.
    pub fn uv(&self, index: usize) -> Option<[f32; 2]> {
        match self.kind {
            PipelineKind::Sprite => {
                let base = index * 8 + 6;
                Some([self.vertices[base], self.vertices[base + 1]])
            }
            PipelineKind::Color => None,
        }
    }
}

/// Records every submission. Useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    submissions: Vec<RecordedSubmission>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> &[RecordedSubmission] {
        &self.submissions
    }

    /// Take the recorded submissions, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<RecordedSubmission> {
        std::mem::take(&mut self.submissions)
    }

    pub fn clear(&mut self) {
        self.submissions.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn submit(&mut self, submission: DrawSubmission<'_>) {
        self.submissions.push(RecordedSubmission {
            kind: submission.kind,
            texture: submission.texture,
            projection: submission.projection,
            vertices: submission.vertices.to_vec(),
            quad_count: submission.quad_count,
            indices: submission.indices.to_vec(),
        });
    }
}
