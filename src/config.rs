//! Configuration module.
//!
//! Handles loading, validating, and merging `coverfit.toml`. Stock defaults
//! are overridden by whatever keys the user file sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! backend = "auto"          # auto | native | constrained
//!
//! [reduction]
//! initial_quality = 90      # First JPEG quality tried (1-100)
//! quality_step = 10         # Quality decrement per attempt
//! min_quality = 10          # Last JPEG quality tried (1-100)
//! min_dimension = 16        # Lossless shrinking stops below this edge (px)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::BackendChoice;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Crate configuration loaded from `coverfit.toml`.
///
/// All fields have defaults; a user file only lists what it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverfitConfig {
    /// Which backend to construct at startup.
    pub backend: BackendChoice,
    /// Quality ladder and size floor for artwork reduction.
    pub reduction: ReductionSettings,
}

/// Reduction settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReductionSettings {
    /// First JPEG quality tried (1-100).
    pub initial_quality: u32,
    /// Quality decrement per attempt.
    pub quality_step: u32,
    /// Last JPEG quality tried (1-100).
    pub min_quality: u32,
    /// Lossless shrinking never takes the longer edge below this many pixels.
    pub min_dimension: u32,
}

impl Default for ReductionSettings {
    fn default() -> Self {
        Self {
            initial_quality: 90,
            quality_step: 10,
            min_quality: 10,
            min_dimension: 16,
        }
    }
}

impl CoverfitConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.reduction;
        if !(1..=100).contains(&r.initial_quality) {
            return Err(ConfigError::Validation(
                "reduction.initial_quality must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&r.min_quality) {
            return Err(ConfigError::Validation(
                "reduction.min_quality must be 1-100".into(),
            ));
        }
        if r.min_quality > r.initial_quality {
            return Err(ConfigError::Validation(
                "reduction.min_quality must not exceed reduction.initial_quality".into(),
            ));
        }
        if r.quality_step == 0 {
            return Err(ConfigError::Validation(
                "reduction.quality_step must be at least 1".into(),
            ));
        }
        if r.min_dimension == 0 {
            return Err(ConfigError::Validation(
                "reduction.min_dimension must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CoverfitConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it is not valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CoverfitConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CoverfitConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `coverfit.toml` file.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<CoverfitConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Parse config from TOML text, merged onto the stock defaults.
pub fn parse_config(text: &str) -> Result<CoverfitConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(text)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `coverfit.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# coverfit configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Image backend:
#   "auto"        - use the native codecs if they work on this runtime
#   "native"      - always use the pure-Rust codec stack
#   "constrained" - no codecs; every artwork operation reports Unsupported
backend = "auto"

# ---------------------------------------------------------------------------
# Artwork reduction
# ---------------------------------------------------------------------------
[reduction]
# JPEG quality ladder: start here...
initial_quality = 90

# ...drop this much per attempt...
quality_step = 10

# ...and give up after trying this quality.
min_quality = 10

# PNG, GIF and BMP have no quality knob; they are halved in size instead,
# but never below this many pixels on the longer edge.
min_dimension = 16
"##
}
