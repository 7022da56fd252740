//! Configuration File Loading
//!
//! Finds and loads the shell configuration from the usual locations,
//! falling back to built-in defaults when no file exists.

use super::ShellConfig;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "SMASH_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration file loader
pub struct ConfigLoader {
    /// Candidate files, most specific first
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader over the default search paths
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
        }
    }

    /// Create a loader over an explicit list of candidate files
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<ShellConfig> {
        Self::new().find_and_load()
    }

    /// Load the first candidate that exists, or the defaults if none does
    pub fn find_and_load(&self) -> Result<ShellConfig> {
        for path in &self.search_paths {
            if path.is_file() {
                debug!("Loading config from {}", path.display());
                return Self::load_from_path(path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(ShellConfig::default())
    }

    /// Load and validate a specific configuration file
    pub fn load_from_path(path: &Path) -> Result<ShellConfig> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let format = ConfigFormat::from_path(path);
        let config: ShellConfig = match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            })?,
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        config
            .validate()
            .map_err(|e| Error::ConfigValidationFailed {
                field: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
            paths.push(PathBuf::from(explicit));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("smash").join("config.toml"));
            paths.push(config_dir.join("smash").join("config.json"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".smash").join("config.toml"));
        }

        paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
