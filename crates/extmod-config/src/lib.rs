//! Framework configuration for extmod
//!
//! The configuration file is TOML and lives at `~/.config/extmod/extmod.toml`
//! unless `EXTMOD_CONFIG` points elsewhere. It declares the module directory
//! base URL, where settings are persisted, and which modules are installed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV_VAR: &str = "EXTMOD_CONFIG";

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const SUPPORTED_KEYS: &[&str] = &["base-url", "store-path"];

const DEFAULT_BASE_URL: &str = "http://localhost/modules";

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key: {key}. Supported keys: {supported}", supported = SUPPORTED_KEYS.join(", "))]
    UnknownKey { key: String },
}

/// A module declared as installed
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstalledModule {
    pub prefix: String,
    pub version: String,
    /// Manifest file; relative paths resolve against the config file directory
    pub manifest: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<InstalledModule>,

    /// Directory the config was loaded from
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

impl Config {
    pub fn path() -> PathBuf {
        // Honor explicit override for tests / isolated runs.
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        default_config_dir().join("extmod.toml")
    }

    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from_path(&Self::path())
    }

    /// Load from a specific path, returning an empty config if the file doesn't exist
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigFileError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.source_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to_path(&Self::path())
    }

    /// Save with atomic write: temp file then rename
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        let temp_path = path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base-url" => self.base_url.clone(),
            "store-path" => self.store_path.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigFileError> {
        match key {
            "base-url" => self.base_url = Some(value),
            "store-path" => self.store_path = Some(value),
            _ => {
                return Err(ConfigFileError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.store_path.is_none() && self.modules.is_empty()
    }

    pub fn values_iter(&self) -> Vec<(&str, String)> {
        let mut values = Vec::new();
        if let Some(ref val) = self.base_url {
            values.push(("base-url", val.clone()));
        }
        if let Some(ref val) = self.store_path {
            values.push(("store-path", val.clone()));
        }
        values
    }

    /// Base URL under which module directories are served
    pub fn get_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Location of the settings document
    pub fn get_store_path(&self) -> PathBuf {
        match self.store_path {
            Some(ref p) => self.resolve(Path::new(p)),
            None => default_config_dir().join("settings.json"),
        }
    }

    /// Resolve a possibly relative path against the config file directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.source_dir {
            Some(ref dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }

    pub fn find_module(&self, prefix: &str) -> Option<&InstalledModule> {
        self.modules.iter().find(|m| m.prefix == prefix)
    }
}

fn default_config_dir() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir().map_or_else(
            || PathBuf::from(".config/extmod"),
            |h| h.join(".config").join("extmod"),
        )
    }

    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().map_or_else(
            || PathBuf::from("config\\extmod"),
            |c| c.join("extmod"),
        )
    }
}
