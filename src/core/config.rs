//! Console configuration
//!
//! Loaded from a TOML file; every field has a default so an empty file (or no
//! file at all) yields a working setup for a three-strip rig.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::error::{PadError, Result};
use crate::core::types::Tempo;

/// How freshly created grids are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridInit {
    /// Color 0, LED active (new named configurations)
    #[default]
    Blank,
    /// Color 3, LED inactive (grid mirrored from the device at startup)
    Device,
}

/// Configuration for the button console
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Directory holding one `<name>.json` grid document per configuration
    pub config_dir: PathBuf,

    /// Number of LED strips on the lighting rig
    ///
    /// Commands addressing an index at or above this are rejected at bind
    /// time, not at parse time.
    pub num_strips: usize,

    /// LEDs per strip
    pub strip_length: usize,

    /// Tempo handed to effects, also bound to `default_bpm` in arguments
    pub default_bpm: f64,

    /// Upper bound on a single HTTP trigger request
    pub http_timeout_ms: u64,

    /// Optional effect/color catalog; the built-in catalog is used otherwise
    pub catalog_path: Option<PathBuf>,

    /// Fill mode for new grids
    pub grid_init: GridInit,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("button_configs"),
            num_strips: 3,
            strip_length: 70,
            default_bpm: 120.0,
            http_timeout_ms: 2000,
            catalog_path: None,
            grid_init: GridInit::Blank,
        }
    }
}

impl PadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PadError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PadConfig =
            toml::from_str(content).map_err(|e| PadError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.num_strips == 0 {
            return Err(PadError::Config("num_strips must be at least 1".into()));
        }
        if self.strip_length == 0 {
            return Err(PadError::Config("strip_length must be at least 1".into()));
        }
        if !(self.default_bpm > 0.0 && self.default_bpm.is_finite()) {
            return Err(PadError::Config(format!(
                "default_bpm must be positive, got {}",
                self.default_bpm
            )));
        }
        Ok(())
    }

    pub fn tempo(&self) -> Tempo {
        Tempo::new(self.default_bpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = PadConfig::from_toml_str("").unwrap();
        assert_eq!(config.num_strips, 3);
        assert_eq!(config.strip_length, 70);
        assert_eq!(config.config_dir, PathBuf::from("button_configs"));
        assert_eq!(config.grid_init, GridInit::Blank);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = PadConfig::from_toml_str(
            r#"
num_strips = 5
default_bpm = 96.0
grid_init = "device"
"#,
        )
        .unwrap();
        assert_eq!(config.num_strips, 5);
        assert_eq!(config.tempo(), Tempo::new(96.0));
        assert_eq!(config.grid_init, GridInit::Device);
    }

    #[test]
    fn test_validate_rejects_zero_strips() {
        let result = PadConfig::from_toml_str("num_strips = 0");
        assert!(matches!(result, Err(PadError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_bpm() {
        let mut config = PadConfig::new();
        config.default_bpm = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = PadConfig::from_toml_str("num_strips = [");
        assert!(matches!(result, Err(PadError::Config(_))));
    }
}
