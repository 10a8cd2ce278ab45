//! Engine configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::physics::Bounds;

/// World physics settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsDefaults {
    /// Downward acceleration in px/s², applied to bodies that allow gravity
    pub gravity_y: f32,
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Surface width in pixels
    pub output_width: u32,
    /// Surface height in pixels
    pub output_height: u32,
    /// CSS background behind every scene
    pub background_color: String,
    /// Id of the element the canvas is mounted into
    pub mount_target: String,
    pub physics: PhysicsDefaults,
    /// RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            output_width: crate::consts::DEFAULT_WIDTH,
            output_height: crate::consts::DEFAULT_HEIGHT,
            background_color: "#0c1326".to_string(),
            mount_target: "game-container".to_string(),
            physics: PhysicsDefaults::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(EngineError::InvalidDimensions {
                width: self.output_width,
                height: self.output_height,
            });
        }
        Ok(())
    }

    /// World rectangle matching the output surface
    pub fn world_bounds(&self) -> Bounds {
        Bounds::from_size(self.output_width as f32, self.output_height as f32)
    }

    pub fn with_mount_target(mut self, target: &str) -> Self {
        self.mount_target = target.to_string();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!((config.output_width, config.output_height), (960, 720));
        assert_eq!(config.background_color, "#0c1326");
        assert_eq!(config.physics.gravity_y, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config =
            GameConfig::from_json(r#"{"outputWidth": 640, "physics": {"gravityY": 300}, "seed": 9}"#).unwrap();
        assert_eq!(config.output_width, 640);
        assert_eq!(config.output_height, 720);
        assert_eq!(config.physics.gravity_y, 300.0);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.world_bounds().right, 640.0);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = GameConfig::from_json(r#"{"outputHeight": 0}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDimensions { width: 960, height: 0 }));
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json("{").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
        assert!(!err.is_host_error());
    }
}
