//! TOML-based configuration for keepours.
//!
//! The configuration supplies the ordered list of target files to process.
//! Targets are enumerated explicitly, never discovered: the tool only ever
//! touches the files the caller names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Run-time settings.
    #[serde(default)]
    pub run: RunConfig,

    /// Target file settings.
    pub targets: TargetsConfig,
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Run-time configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// The ordered list of files to process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Optional base directory; relative entries in `files` are joined to it.
    /// Defaults to the working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Files to process, in order.
    pub files: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.files.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "targets.files".into(),
                detail: "at least one target file is required".into(),
            });
        }
        if self.targets.files.iter().any(|f| f.as_os_str().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "targets.files".into(),
                detail: "target file paths must not be empty".into(),
            });
        }

        Ok(())
    }

    /// The ordered target list with `targets.root` applied to relative
    /// entries.
    pub fn resolved_targets(&self) -> Vec<PathBuf> {
        match &self.targets.root {
            Some(root) => self
                .targets
                .files
                .iter()
                .map(|f| if f.is_absolute() { f.clone() } else { root.join(f) })
                .collect(),
            None => self.targets.files.clone(),
        }
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
