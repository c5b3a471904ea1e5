//! Common items: `use ember::prelude::*`.

// Core
pub use crate::camera::Camera2d;
pub use crate::color::Color;
pub use crate::config::GameConfig;
pub use crate::context::Context;
pub use crate::error::{EngineError, Result};
pub use crate::game::{Game, Plugin};
pub use crate::input::{CursorPosition, Input, InputState, KeyCode, MouseButton};
pub use crate::interpolation::{Pose2d, PoseHistory, RotationBlend};
pub use crate::math::{BVec2, IVec2, Mat4, Rect, RectInt, Vec2, Vec3};
pub use crate::render::{ClearColor, GpuContext};
pub use crate::resources::Resources;
pub use crate::time::{FixedTimestep, Time};
pub use crate::ui::{Margins, NodeId, Ui};

// Render 2D
pub use crate::render2d::{Draw, RenderBackend, Sprite, TextureHandle};

// Physics (feature-gated)
#[cfg(feature = "physics2d")]
pub use crate::physics2d::{BodyHandle, BodyType2d, Physics2d, PhysicsWorld2d};

// Diagnostics (feature-gated)
#[cfg(feature = "diagnostics")]
pub use crate::diag::{FpsCounter, RenderStats};
