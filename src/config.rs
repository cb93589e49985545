// Configuration file handling

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "taskboard.yml";

/// Which persistence medium backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub backend: Backend,
    /// Directory holding `.taskboard/`; defaults to the user data dir
    pub store_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(eyre!("Config file not found: {}", path.display()));
        }
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Store directory, falling back to the platform data dir
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("taskboard").join(CONFIG_FILE))
}

pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("taskboard"))
        .unwrap_or_else(|| PathBuf::from("."))
}
