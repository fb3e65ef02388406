//! Project configuration.
//!
//! Loads `notes.toml` from the project directory and merges it over the stock
//! defaults. The file is sparse: set only what differs from the defaults.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! root = "src/content/vault/notes"  # Notes root, relative to the project dir
//!
//! [listing]
//! surface = "notes"         # Surface shown by the listing
//! include_drafts = false    # List unpublished notes too
//!
//! [reading]
//! words_per_minute = 200
//!
//! [toc]
//! min_depth = 2             # Shallowest heading in a table of contents
//! max_depth = 3             # Deepest heading in a table of contents
//!
//! [processing]
//! max_processes = 4         # Max parallel readers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::reading::DEFAULT_WORDS_PER_MINUTE;
use crate::scan::DEFAULT_NOTES_ROOT;
use crate::slug::NOTES_SURFACE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "notes.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `notes.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotesConfig {
    /// Notes root, relative to the project directory.
    pub root: String,
    pub listing: ListingConfig,
    pub reading: ReadingConfig,
    pub toc: TocConfig,
    pub processing: ProcessingConfig,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_NOTES_ROOT.to_string(),
            listing: ListingConfig::default(),
            reading: ReadingConfig::default(),
            toc: TocConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl NotesConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reading.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "reading.words_per_minute must be greater than 0".into(),
            ));
        }
        if !(1..=6).contains(&self.toc.min_depth) || !(1..=6).contains(&self.toc.max_depth) {
            return Err(ConfigError::Validation(
                "toc depths must be between 1 and 6".into(),
            ));
        }
        if self.toc.min_depth > self.toc.max_depth {
            return Err(ConfigError::Validation(
                "toc.min_depth must not exceed toc.max_depth".into(),
            ));
        }
        if self.listing.surface.trim().is_empty() {
            return Err(ConfigError::Validation(
                "listing.surface must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The notes root resolved against `project_dir`.
    pub fn notes_root(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.root)
    }
}

/// Which notes the listing shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    pub surface: String,
    /// Include notes without a valid `publishedAt`, or with `isPublished: false`.
    pub include_drafts: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            surface: NOTES_SURFACE.to_string(),
            include_drafts: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadingConfig {
    pub words_per_minute: u32,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// Heading depth range for generated tables of contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    pub min_depth: u8,
    pub max_depth: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            min_depth: 2,
            max_depth: 3,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel note readers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(NotesConfig::default())?)
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

/// Load `notes.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `notes.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
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
) -> Result<NotesConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NotesConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `notes.toml` in the project directory.
pub fn load_config(project_dir: &Path) -> Result<NotesConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(project_dir)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

/// Returns a fully-commented stock `notes.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Notes Manifest Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Notes root, relative to the directory holding this file.
root = "src/content/vault/notes"

# ---------------------------------------------------------------------------
# Listing
# ---------------------------------------------------------------------------
[listing]
# Only notes whose front matter `surfaces` contains this value are listed.
surface = "notes"

# List notes without a valid publishedAt, or with isPublished: false.
include_drafts = false

# ---------------------------------------------------------------------------
# Reading time
# ---------------------------------------------------------------------------
[reading]
words_per_minute = 200

# ---------------------------------------------------------------------------
# Table of contents
# ---------------------------------------------------------------------------
[toc]
# Heading depth range, 1 (#) to 6 (######).
min_depth = 2
max_depth = 3

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel note readers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
