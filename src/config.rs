//! Planner configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Nothing in the
//! crate reads configuration on its own: the loaded [`PlannerConfig`] is passed
//! explicitly to [`ThumbnailPlanner::from_config`](crate::imaging::ThumbnailPlanner::from_config)
//! and [`DirectoryOps::from_config`](crate::directory::DirectoryOps::from_config).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_path = ""                   # Prefixed onto request paths not already under it
//! new_folder_permissions = "0755"  # Octal mode for directories made by create_dir
//!
//! [defaults]
//! quality = 90                     # Encoding quality (1-100)
//! background_color = "#ffffff"     # Fill color for resizeAndFill
//! allow_enlargement = false        # Allow output larger than the source
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! base_path = "/var/www/site/"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{FillColor, TransformDefaults};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
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

/// Planner configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Root that relative request paths are resolved against. Empty means
    /// paths are used as given.
    pub base_path: PathBuf,
    /// Octal permission mode for new directories, e.g. `"0755"`.
    pub new_folder_permissions: String,
    /// Values for request fields the caller leaves unset.
    pub defaults: TransformDefaults,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            new_folder_permissions: "0755".to_string(),
            defaults: TransformDefaults::default(),
        }
    }
}

impl PlannerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mode = self.permission_mode()?;
        if mode > 0o7777 {
            return Err(ConfigError::Validation(
                "new_folder_permissions must be at most 7777".into(),
            ));
        }
        if !(1..=100).contains(&self.defaults.quality) {
            return Err(ConfigError::Validation(
                "defaults.quality must be 1-100".into(),
            ));
        }
        if let Err(e) = self.defaults.background_color.parse::<FillColor>() {
            return Err(ConfigError::Validation(format!(
                "defaults.background_color: {e}"
            )));
        }
        Ok(())
    }

    /// Parse `new_folder_permissions` as an octal mode.
    ///
    /// Accepts `"755"`, `"0755"` and `"0o755"`.
    pub fn permission_mode(&self) -> Result<u32, ConfigError> {
        let raw = self.new_folder_permissions.trim();
        let digits = raw.strip_prefix("0o").unwrap_or(raw);
        u32::from_str_radix(digits, 8).map_err(|_| {
            ConfigError::Validation(format!(
                "new_folder_permissions must be an octal mode, got {raw:?}"
            ))
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PlannerConfig::default()).expect("default config must serialize")
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
///
/// `base_path` must not contain `..`: request paths are kept under it by a
/// component prefix check, which a parent reference would defeat.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PlannerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PlannerConfig = merged.try_into()?;
    if config
        .base_path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(ConfigError::Validation(format!(
            "base_path must not contain '..', got {}",
            config.base_path.display()
        )));
    }
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<PlannerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbnail Planner Configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Root prefixed onto request paths that do not already start with it.
# Empty means paths are used as given.
base_path = ""

# Octal permission mode for directories created by create_dir.
new_folder_permissions = "0755"

# ---------------------------------------------------------------------------
# Request defaults
# ---------------------------------------------------------------------------
[defaults]
# Encoding quality (1 = worst, 100 = best). Used by JPEG and AVIF output.
quality = 90

# Border color for resizeAndFill, as hex (#rgb, #rrggbb or #rrggbbaa).
background_color = "#ffffff"

# Allow output larger than the source image.
allow_enlargement = false
"##
}
