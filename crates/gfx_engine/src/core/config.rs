//! Device configuration
//!
//! Typed configuration for the graphics device, loadable from TOML.
//! Capacities are starting sizes only; every pool grows transparently past
//! its initial capacity, so these numbers tune allocation behavior, not
//! limits.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error in the config contents
    #[error("parse error: {0}")]
    Parse(String),

    /// A field failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Initial pool capacities for the graphics device
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Starting slot count of the buffer pool
    pub initial_buffer_capacity: usize,
    /// Starting slot count of the texture pool
    pub initial_texture_capacity: usize,
    /// Starting slot count of the sampler pool
    pub initial_sampler_capacity: usize,
    /// Starting slot count of the framebuffer pool
    pub initial_framebuffer_capacity: usize,
    /// Starting slot count of the shader pool
    pub initial_shader_capacity: usize,
    /// Starting slot count of the pipeline pool
    pub initial_pipeline_capacity: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            initial_buffer_capacity: 64,
            initial_texture_capacity: 64,
            initial_sampler_capacity: 16,
            initial_framebuffer_capacity: 8,
            initial_shader_capacity: 32,
            initial_pipeline_capacity: 32,
        }
    }
}

impl DeviceConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check field values for consistency.
    ///
    /// Zero capacities are allowed (the pool allocates lazily), but
    /// implausibly large starting capacities are rejected to catch unit
    /// mistakes in config files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_INITIAL_CAPACITY: usize = 1 << 20;
        let fields = [
            ("initial_buffer_capacity", self.initial_buffer_capacity),
            ("initial_texture_capacity", self.initial_texture_capacity),
            ("initial_sampler_capacity", self.initial_sampler_capacity),
            ("initial_framebuffer_capacity", self.initial_framebuffer_capacity),
            ("initial_shader_capacity", self.initial_shader_capacity),
            ("initial_pipeline_capacity", self.initial_pipeline_capacity),
        ];
        for (name, value) in fields {
            if value > MAX_INITIAL_CAPACITY {
                return Err(ConfigError::Invalid(format!(
                    "{name} = {value} exceeds the maximum initial capacity of {MAX_INITIAL_CAPACITY}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        DeviceConfig::default().validate().unwrap();
    }

    #[test]
    fn toml_round_trip_with_partial_fields() {
        let config = DeviceConfig::from_toml_str(
            r#"
            initial_buffer_capacity = 4
            initial_texture_capacity = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_buffer_capacity, 4);
        assert_eq!(config.initial_texture_capacity, 2);
        // Unspecified fields fall back to defaults.
        assert_eq!(
            config.initial_sampler_capacity,
            DeviceConfig::default().initial_sampler_capacity
        );
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let result = DeviceConfig::from_toml_str("initial_buffer_capacity = 10000000");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = DeviceConfig::from_toml_str("initial_buffer_capacity = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
