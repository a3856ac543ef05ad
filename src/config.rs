//! Configuration: the picture profile plus CLI-level settings.
//!
//! Library callers usually build a [`RichTextPictureProfile`] directly. The
//! CLI loads a `config.toml` on top of stock defaults, the same way for a
//! single file (`--config`) or a source directory (`config.toml` at its root).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [picture]
//! max_image_width = 1024        # Upper bound for rendered width (must be > 0)
//! quality = 80                  # Encoding quality passed to the renderer (0-100)
//! create_webp_for_format = []   # Original formats that also get WebP: "jpeg", "png", "gif"
//!
//! [urls]
//! base_url = ""                 # Prefix for relative image references
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::collaborators::ImageFormat;
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

/// Per-call picture settings for rich-text rewriting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RichTextPictureProfile {
    /// Largest width ever rendered. Percentage widths are taken of this value.
    pub max_image_width: u32,
    /// Original formats that should also be offered as WebP.
    pub create_webp_for_format: Vec<ImageFormat>,
    /// Encoding quality, passed through to the renderer unchanged.
    pub quality: u32,
}

impl Default for RichTextPictureProfile {
    fn default() -> Self {
        Self {
            max_image_width: 1024,
            create_webp_for_format: Vec::new(),
            quality: 80,
        }
    }
}

impl RichTextPictureProfile {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_image_width == 0 {
            return Err(ConfigError::Validation(
                "picture.max_image_width must be greater than 0".into(),
            ));
        }
        if self.quality > 100 {
            return Err(ConfigError::Validation(
                "picture.quality must be 0-100".into(),
            ));
        }
        Ok(())
    }
}

/// URL resolution settings for the bundled resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlsConfig {
    /// Prefix joined onto relative image references. Empty = leave as written.
    pub base_url: String,
}

/// Top-level `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub picture: RichTextPictureProfile,
    pub urls: UrlsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.picture.validate()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
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

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(base: toml::Value, overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a specific config file on top of stock defaults.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Load `config.toml` from a directory, falling back to stock defaults when
/// the directory has none.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return resolve_config(stock_defaults_value(), None);
    }
    load_config_file(&config_path)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# rich-picture configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Picture profile
# ---------------------------------------------------------------------------
[picture]
# Largest width ever rendered, in pixels. Must be greater than 0.
# Images without a width, or wider than this, render at this width.
# Percentage widths (width="50%") are taken of this value.
max_image_width = 1024

# Encoding quality handed to the image service (0 = worst, 100 = best).
quality = 80

# Original formats that should also be offered as WebP.
# Any of: "jpeg", "png", "gif". Example: ["jpeg", "png"]
create_webp_for_format = []

# ---------------------------------------------------------------------------
# URL resolution
# ---------------------------------------------------------------------------
[urls]
# Prefix joined onto relative image references (src="/media/a.jpg").
# Absolute URLs and data: URIs are left alone. Empty = leave all as written.
base_url = ""
"##
}
