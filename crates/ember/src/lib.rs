//! # Ember — Batched 2D Engine Core
//!
//! A small 2D game engine built around two ideas: immediate-mode drawing
//! that batches into as few GPU draw calls as possible, and a fixed-rate
//! physics clock whose poses are interpolated for smooth rendering at any
//! frame rate.
//!
//! Start with `use ember::prelude::*` and build a [`Game`](game::Game).

pub mod camera;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod game;
pub mod input;
pub mod interpolation;
pub mod math;
pub mod prelude;
pub mod render;
pub mod render2d;
pub mod resources;
pub mod time;
pub mod ui;
pub(crate) mod window;

#[cfg(feature = "physics2d")]
pub mod physics2d;

#[cfg(feature = "diagnostics")]
pub mod diag;

pub use error::{EngineError, Result};
