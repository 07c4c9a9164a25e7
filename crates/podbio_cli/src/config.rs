//! podbio configuration file handling

use anyhow::{Context, Result};
use podbio_palette::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "podbio.toml";

/// Top-level podbio configuration (podbio.toml)
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PodbioConfig {
    #[serde(default)]
    pub palette: ExtractorConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub themes: ThemesConfig,
}

/// Logging configuration
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter when neither `RUST_LOG` nor `-v` is given
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Where theme records come from
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ThemesConfig {
    /// JSON file holding an array of theme records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl PodbioConfig {
    /// Load configuration from a directory (looks for podbio.toml)
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `podbio init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load an explicit config path, or `podbio.toml` in the working directory
    /// if present, or the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_dir(path),
            None if Path::new(CONFIG_FILE).is_file() => Self::load_from_dir(Path::new(".")),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
