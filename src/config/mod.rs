//! Configuration storage
//!
//! A small TOML file holding the API origin and list page size. Missing
//! file or missing keys fall back to defaults, so a fresh install works
//! against a local backend with no setup.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default backend origin (the FastAPI dev server).
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Default number of records per list request (backend default).
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the archive REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// `limit` value sent with list requests.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "tgarchive-admin", "tgarchive-admin")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from disk, or defaults if no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base, "http://127.0.0.1:8000");
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("api_base = \"http://10.0.0.5:8000\"").unwrap();
        assert_eq!(config.api_base, "http://10.0.0.5:8000");
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }
}
