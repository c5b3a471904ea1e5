//! Engine error type.
//!
//! Everything that can fail at a system boundary (window, GPU, files) is
//! reported through [`EngineError`]. Broken internal invariants, such as
//! overfilling a batch item, are programming errors and panic instead.

use std::path::PathBuf;

/// Errors surfaced by engine setup and resource loading.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("the window surface reports no usable texture format")]
    UnsupportedSurface,

    /// A shader failed to compile or its pipeline failed to link.
    #[error("shader '{label}' failed to build: {message}")]
    Shader { label: String, message: String },

    /// GPU resources were requested before the window and renderer exist.
    #[error("renderer is not initialized yet; create GPU resources from setup systems or later")]
    RendererNotReady,

    #[error("failed to load texture '{}': {source}", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read config '{}': {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Shorthand for results carrying an [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
