//! Construction-time configuration for the snowfall.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```ignore
//! use snowfall::SnowConfig;
//!
//! let config = SnowConfig::from_json_str(r#"{ "gravity": 12.0, "wind": { "easing": 0.01 } }"#)?;
//! assert_eq!(config.size_max, 4.0);
//! ```
//!
//! Programmatic construction uses the `with_*` builder methods.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::error::ConfigError;

/// Where the snowflake sprite comes from.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpriteSource {
    /// A six-armed flake generated at startup.
    #[default]
    Procedural,
    /// An image file on disk (PNG or JPEG).
    File(PathBuf),
    /// Encoded image bytes already in memory.
    #[serde(skip)]
    Bytes(Vec<u8>),
}

/// Wind model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Initial wind strength.
    pub force: f32,
    /// Initial attractor the force eases toward.
    pub target: f32,
    /// Minimum gust strength (before the x100 gust scale).
    pub min: f32,
    /// Maximum gust strength (before the x100 gust scale).
    pub max: f32,
    /// Fraction of the remaining distance to `target` covered each frame.
    pub easing: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            force: 0.1,
            target: 0.1,
            min: 0.1,
            max: 0.2,
            easing: 0.005,
        }
    }
}

/// Snowfall parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    /// Particles per logical pixel of viewport width.
    pub count_density: u32,
    /// Magnitude factor of the per-axis randomness attribute.
    pub randomness: f32,
    /// Exponent applied to the uniform sample of the randomness attribute.
    pub randomness_power: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Fall speed multiplier applied to `speed.y`.
    pub gravity: f32,
    /// Half extents of the wrap-around volume.
    pub world_size: [f32; 3],
    /// Sprite size in pixels at unit view depth, before the pixel ratio.
    pub point_size: f32,
    pub wind: WindConfig,
    pub sprite: SpriteSource,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count_density: 20,
            randomness: 0.5,
            randomness_power: 3.0,
            size_min: 1.0,
            size_max: 4.0,
            opacity_min: 0.1,
            opacity_max: 0.4,
            gravity: 25.0,
            world_size: [6.0, 6.0, 6.0],
            point_size: 30.0,
            wind: WindConfig::default(),
            sprite: SpriteSource::Procedural,
        }
    }
}

impl SnowConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SnowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_json_str(&text)
    }

    /// Check that every range is well formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("size", self.size_min, self.size_max)?;
        check_range("opacity", self.opacity_min, self.opacity_max)?;
        check_range("wind", self.wind.min, self.wind.max)?;
        if !(0.0..=1.0).contains(&self.opacity_min) || !(0.0..=1.0).contains(&self.opacity_max) {
            return Err(ConfigError::Invalid(format!(
                "opacity range [{}, {}] must lie within [0, 1]",
                self.opacity_min, self.opacity_max
            )));
        }
        if !(self.wind.easing > 0.0 && self.wind.easing < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "wind easing {} must be in (0, 1)",
                self.wind.easing
            )));
        }
        if self.world_size.iter().any(|&s| !(s > 0.0) || !s.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "world_size {:?} must be positive and finite",
                self.world_size
            )));
        }
        if !(self.point_size >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "point_size {} must not be negative",
                self.point_size
            )));
        }
        Ok(())
    }

    /// Half extents of the wrap-around volume as a vector.
    pub fn world_size(&self) -> Vec3 {
        Vec3::from_array(self.world_size)
    }

    pub fn with_count_density(mut self, density: u32) -> Self {
        self.count_density = density;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_world_size(mut self, world_size: Vec3) -> Self {
        self.world_size = world_size.to_array();
        self
    }

    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.size_min = min;
        self.size_max = max;
        self
    }

    pub fn with_opacity_range(mut self, min: f32, max: f32) -> Self {
        self.opacity_min = min;
        self.opacity_max = max;
        self
    }

    pub fn with_wind(mut self, wind: WindConfig) -> Self {
        self.wind = wind;
        self
    }

    /// Set where the snowflake sprite is loaded from.
    pub fn with_sprite(mut self, sprite: SpriteSource) -> Self {
        self.sprite = sprite;
        self
    }
}

fn check_range(name: &str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(ConfigError::Invalid(format!(
            "{name} range [{min}, {max}] must be finite with min <= max"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SnowConfig::default();
        assert_eq!(config.count_density, 20);
        assert_eq!(config.randomness, 0.5);
        assert_eq!(config.randomness_power, 3.0);
        assert_eq!((config.size_min, config.size_max), (1.0, 4.0));
        assert_eq!((config.opacity_min, config.opacity_max), (0.1, 0.4));
        assert_eq!(config.gravity, 25.0);
        assert_eq!(config.wind, WindConfig::default());
        assert_eq!(config.wind.easing, 0.005);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SnowConfig::from_json_str(r#"{ "gravity": 12.0, "wind": { "max": 0.5 } }"#).unwrap();
        assert_eq!(config.gravity, 12.0);
        assert_eq!(config.wind.max, 0.5);
        assert_eq!(config.wind.min, 0.1);
        assert_eq!(config.size_max, 4.0);
        assert_eq!(config.sprite, SpriteSource::Procedural);
    }

    #[test]
    fn test_sprite_file_from_json() {
        let config = SnowConfig::from_json_str(r#"{ "sprite": { "file": "flake.png" } }"#).unwrap();
        assert_eq!(config.sprite, SpriteSource::File(PathBuf::from("flake.png")));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = SnowConfig::from_json_str(r#"{ "size_min": 5.0, "size_max": 1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_easing_out_of_range_rejected() {
        let config = SnowConfig::default().with_wind(WindConfig {
            easing: 1.5,
            ..WindConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = SnowConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }
}
