//! Simulation settings
//!
//! Persisted as JSON next to the levels. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Screen, block and ball configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playing field ===
    pub screen_width: u32,
    pub screen_height: u32,

    // === Blocks ===
    /// Block width in pixels (same for every theme)
    pub cell_width: u32,
    /// Block height in pixels
    pub cell_height: u32,
    /// Whether blocks that don't count for clearing still lose hit points
    pub permanent_obstacles_take_damage: bool,

    // === Ball ===
    pub ball_radius: f32,
    /// Launch heading in radians (Y grows downward)
    pub launch_angle: f32,
    /// Launch displacement per reference tick at level velocity 1.0.
    /// Scaled by the level velocity: zero leaves the ball idle, a negative
    /// product reverses the launch heading.
    pub launch_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            permanent_obstacles_take_damage: true,

            ball_radius: BALL_RADIUS,
            launch_angle: LAUNCH_ANGLE,
            launch_speed: LAUNCH_SPEED,
        }
    }
}

impl Settings {
    /// Playing field size as a vector
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.screen_width as f32, self.screen_height as f32)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.cell_width, 50);
        assert_eq!(settings.cell_height, 30);
        assert!(settings.permanent_obstacles_take_damage);
        assert_eq!(settings.bounds(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "screen_width": 1024, "permanent_obstacles_take_damage": false }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.screen_width, 1024);
        assert_eq!(settings.screen_height, SCREEN_HEIGHT);
        assert!(!settings.permanent_obstacles_take_damage);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            ball_radius: 12.0,
            launch_speed: 3.5,
            ..Default::default()
        };
        settings.save_to_file(&path).unwrap();
        assert_eq!(Settings::load_from_file(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(Settings::load_from_file(&missing), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(&missing), Settings::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(Settings::load_from_file(&broken), Err(SettingsError::Json(_))));
    }
}
