//! Journal configuration module.
//!
//! Handles loading, validating, and merging `journal.toml`. User values are
//! layered over stock defaults, so the file only needs the keys it changes.
//!
//! ## Config File Location
//!
//! `journal.toml` is read from the config directory (`--config-dir`, default
//! the current directory). A missing file means "all defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! scratch_dir = ""          # Where assets are written; empty = <temp>/trail-journal
//!
//! [draft]
//! author = "Randall"        # Author on a new or reset draft
//!
//! [images]
//! scale_percent = 50        # Max output dimension, % of source width (1-100)
//! quality = 50              # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4         # Max parallel photo workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::draft::DEFAULT_AUTHOR;
use crate::imaging::{Quality, TransformConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up inside the config directory.
pub const CONFIG_FILENAME: &str = "journal.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Journal configuration loaded from `journal.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    /// Directory for transformed images and the markdown file.
    /// Empty means a `trail-journal` folder in the system temp directory.
    pub scratch_dir: String,
    /// Draft defaults.
    pub draft: DraftConfig,
    /// Asset transform settings.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl JournalConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.scale_percent) {
            return Err(ConfigError::Validation(
                "images.scale_percent must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Transform settings for the pipeline.
    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig {
            scale_percent: self.images.scale_percent,
            quality: Quality::new(self.images.quality),
        }
    }

    /// Resolved scratch directory.
    pub fn scratch_path(&self) -> PathBuf {
        if self.scratch_dir.is_empty() {
            std::env::temp_dir().join("trail-journal")
        } else {
            PathBuf::from(&self.scratch_dir)
        }
    }
}

/// Defaults for a fresh draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DraftConfig {
    pub author: String,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// Asset transform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Max output dimension as a percentage of the source width.
    pub scale_percent: u32,
    /// JPEG quality (1-100).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            scale_percent: 50,
            quality: 50,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel photo workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(JournalConfig::default())
        .map_err(|e| ConfigError::Validation(format!("cannot serialize defaults: {e}")))
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

/// Load `journal.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<JournalConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: JournalConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `journal.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<JournalConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(dir)?)
}

/// Returns a fully-commented stock `journal.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Trail Journal Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory for transformed images and the generated markdown file.
# Empty = a "trail-journal" folder inside the system temp directory.
scratch_dir = ""

# ---------------------------------------------------------------------------
# Drafts
# ---------------------------------------------------------------------------
[draft]
# Author filled in on every new or reset draft.
author = "Randall"

# ---------------------------------------------------------------------------
# Image transform
# ---------------------------------------------------------------------------
[images]
# Longest output edge, as a percentage of the source image width.
scale_percent = 50

# JPEG encoding quality (1 = worst, 100 = best).
quality = 50

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel photo workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = JournalConfig::default();
        assert_eq!(config.draft.author, "Randall");
        assert_eq!(config.images.scale_percent, 50);
        assert_eq!(config.images.quality, 50);
        assert_eq!(config.processing.max_processes, None);
        assert!(config.scratch_dir.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let config: JournalConfig = toml::from_str("[images]\nquality = 80\n").unwrap();
        assert_eq!(config.images.quality, 80);
        // Defaults preserved
        assert_eq!(config.images.scale_percent, 50);
        assert_eq!(config.draft.author, "Randall");
    }

    #[test]
    fn transform_config_from_images() {
        let config: JournalConfig =
            toml::from_str("[images]\nscale_percent = 25\nquality = 90\n").unwrap();
        let transform = config.transform_config();
        assert_eq!(transform.scale_percent, 25);
        assert_eq!(transform.quality.value(), 90);
    }

    #[test]
    fn scratch_path_defaults_to_temp() {
        let config = JournalConfig::default();
        assert_eq!(
            config.scratch_path(),
            std::env::temp_dir().join("trail-journal")
        );

        let custom = JournalConfig {
            scratch_dir: "/srv/scratch".to_string(),
            ..JournalConfig::default()
        };
        assert_eq!(custom.scratch_path(), PathBuf::from("/srv/scratch"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.draft.author, "Randall");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "scratch_dir = \"out\"\n[draft]\nauthor = \"Ada\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.draft.author, "Ada");
        assert_eq!(config.scratch_dir, "out");
        assert_eq!(config.images.quality, 50);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<JournalConfig, _> = toml::from_str("[images]\nqualty = 80\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[colors]\nbg = \"#fff\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(JournalConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_out_of_range() {
        let mut config = JournalConfig::default();
        config.images.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.images.quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_scale_out_of_range() {
        let mut config = JournalConfig::default();
        config.images.scale_percent = 0;
        assert!(config.validate().is_err());
        config.images.scale_percent = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = JournalConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[images]\nquality = 200\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Threads
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("a = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(10));
        assert_eq!(merged["b"].as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[images]\nquality = 70").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["images"]["quality"].as_integer(), Some(70));
        assert_eq!(merged["images"]["scale_percent"].as_integer(), Some(50));
        assert_eq!(merged["draft"]["author"].as_str(), Some("Randall"));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[images]\nscale_percent = 500").unwrap();
        assert!(resolve_config(base, Some(overlay)).is_err());
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: JournalConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = JournalConfig::default();
        assert_eq!(config.draft.author, defaults.draft.author);
        assert_eq!(config.images.scale_percent, defaults.images.scale_percent);
        assert_eq!(config.images.quality, defaults.images.quality);
        assert_eq!(config.scratch_dir, defaults.scratch_dir);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let toml = stock_config_toml();
        for section in ["[draft]", "[images]", "[processing]", "scratch_dir"] {
            assert!(toml.contains(section), "missing {section}");
        }
    }
}
