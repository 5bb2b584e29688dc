//! Configuration system

pub use serde::{Serialize, Deserialize};

use crate::physics::AccelerationMode;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            Self::from_toml_str(&contents)
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Parse configuration from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Simulation settings shared by the frame driver and the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Minimum interval between frames in seconds
    pub target_frame_time: f64,

    /// Upper bound applied to a frame's delta time (long stalls are clamped)
    pub max_delta_time: f64,

    /// How acceleration is folded into velocity each tick
    pub acceleration_mode: AccelerationMode,

    /// Speed cap for bodies built with `PhysicsBody::with_default_speed`
    pub default_max_speed: f64,

    /// Draw collider bounding circles after the entities themselves
    pub debug_colliders: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            target_frame_time: 0.016,
            max_delta_time: 0.1,
            acceleration_mode: AccelerationMode::default(),
            default_max_speed: 500.0,
            debug_colliders: false,
        }
    }
}

impl Config for SimulationConfig {}

impl SimulationConfig {
    /// Reject settings the frame loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_frame_time > 0.0) {
            return Err(ConfigError::Invalid {
                field: "target_frame_time",
                reason: format!("must be positive, got {}", self.target_frame_time),
            });
        }
        if !(self.max_delta_time >= self.target_frame_time) {
            return Err(ConfigError::Invalid {
                field: "max_delta_time",
                reason: format!(
                    "must be at least target_frame_time ({}), got {}",
                    self.target_frame_time, self.max_delta_time
                ),
            });
        }
        if !(self.default_max_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_max_speed",
                reason: format!("must not be negative, got {}", self.default_max_speed),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_toml_str(
            "target_frame_time = 0.02\nacceleration_mode = \"per_tick\"\n",
        )
        .unwrap();

        assert_eq!(config.target_frame_time, 0.02);
        assert_eq!(config.acceleration_mode, AccelerationMode::PerTick);
        assert_eq!(config.default_max_speed, 500.0);
    }

    #[test]
    fn test_rejects_non_positive_frame_time() {
        let config = SimulationConfig {
            target_frame_time: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "target_frame_time", .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SimulationConfig::default().save_to_file("settings.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let path = std::env::temp_dir().join("arcade_engine_config_test.ron");
        let path = path.to_string_lossy().to_string();
        let config = SimulationConfig {
            debug_colliders: true,
            ..Default::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = SimulationConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
