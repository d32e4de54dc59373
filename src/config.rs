// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::engine::{CandidateLabel, DEFAULT_TARGET_SIZE_MB};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Target size in MB when the command line does not supply one
    #[serde(default = "default_target_size_mb")]
    pub target_size_mb: f64,

    /// Which candidate to keep when both survive and no --keep is given.
    /// "360p" or "480p"; anything else falls back to 360p.
    #[serde(default)]
    pub keep: Option<String>,
}

fn default_target_size_mb() -> f64 {
    DEFAULT_TARGET_SIZE_MB
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            target_size_mb: default_target_size_mb(),
            keep: None,
        }
    }
}

impl DefaultsConfig {
    /// Resolve the configured keep preference to a candidate label
    pub fn keep_label(&self) -> Option<CandidateLabel> {
        match self.keep.as_deref() {
            Some("360p") => Some(CandidateLabel::P360),
            Some("480p") => Some(CandidateLabel::P480),
            _ => None,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("fitvid")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("fitvid")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or fall back to built-in defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            let config: Config = toml::from_str(&contents).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?;

            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Check if a config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Create a default config file if it doesn't exist
    pub fn ensure_default() -> Result<()> {
        if !Self::exists() {
            let config = Config::default();
            config.save()?;
        }
        Ok(())
    }
}
