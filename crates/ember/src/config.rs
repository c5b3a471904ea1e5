//! Game configuration.
//!
//! [`GameConfig`] holds the window, timing, camera and presentation settings.
//! Build it in code or load it from a JSON file; missing fields take their
//! defaults.
//!
//! ```json
//! { "title": "Asteroids", "width": 1280, "height": 720, "camera_size": 3.0 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::{DEFAULT_CAMERA_SIZE, DEFAULT_PIXELS_PER_UNIT};
use crate::color::Color;
use crate::error::{EngineError, Result};
use crate::time::DEFAULT_FIXED_UPDATES_PER_SECOND;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Physics and fixed-update rate.
    pub fixed_updates_per_second: u32,
    /// Upper bound on the frame delta fed to the fixed-step accumulator.
    /// `None` lets every due step run.
    pub max_frame_delta_secs: Option<f32>,
    pub pixels_per_unit: f32,
    pub camera_size: f32,
    pub clear_color: [f32; 4],
    pub vsync: bool,
    /// Append the measured FPS to the window title once per second.
    pub show_fps_in_title: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "ember".to_owned(),
            width: 1280,
            height: 720,
            fixed_updates_per_second: DEFAULT_FIXED_UPDATES_PER_SECOND,
            max_frame_delta_secs: None,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            camera_size: DEFAULT_CAMERA_SIZE,
            clear_color: Color::LIGHT_DARK.to_array(),
            vsync: false,
            show_fps_in_title: true,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|source| EngineError::ConfigParse {
            path: path.to_owned(),
            source,
        })?;
        log::info!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn clear_color(&self) -> Color {
        Color::from(self.clear_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = GameConfig::default();
        assert_eq!(config.fixed_updates_per_second, 50);
        assert_eq!(config.pixels_per_unit, 150.0);
        assert_eq!(config.camera_size, 5.0);
        assert_eq!(config.max_frame_delta_secs, None);
        assert!(!config.vsync);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config =
            GameConfig::from_json_str(r#"{ "title": "Asteroids", "camera_size": 3.0 }"#).unwrap();
        assert_eq!(config.title, "Asteroids");
        assert_eq!(config.camera_size, 3.0);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn json_round_trip() {
        let mut config = GameConfig::default();
        config.max_frame_delta_secs = Some(0.25);
        let parsed = GameConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::from_json_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigIo { .. }));
    }
}
