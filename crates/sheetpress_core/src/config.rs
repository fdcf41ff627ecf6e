use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tool settings stored at `~/.sheetpress/config.json`.
///
/// Only ambient behaviour lives here. Document styling is fixed and is not
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetpressConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is not set.
    pub log_level: String,
    /// Also write logs to `~/.sheetpress/logs/` with daily rotation.
    pub file_logging: bool,
}

impl Default for SheetpressConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            file_logging: false,
        }
    }
}

impl SheetpressConfig {
    /// Returns the base directory: `~/.sheetpress/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".sheetpress"))
    }

    /// Returns the config file path: `~/.sheetpress/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.sheetpress/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Loads the config from its default location.
    ///
    /// Never fails: a missing home directory, a missing file or a broken file
    /// all fall back to the defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default(&path),
            Err(e) => {
                warn!("Using default config: {e:#}");
                Self::default()
            }
        }
    }

    /// Load from `path`, returning defaults if it is absent or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config at {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Load config from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to a specific file path, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}
