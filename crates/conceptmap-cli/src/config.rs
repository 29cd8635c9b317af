//! CLI configuration

use std::path::PathBuf;

use anyhow::Context;
use conceptmap_core::DEFAULT_MAX_DISTANCE;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "CONCEPTMAP_CONFIG";

/// Get the config file path
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("conceptmap")
        .join("config.toml")
}

/// Defaults applied to `view` and `distance` when flags are omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_distance: usize,
    pub bidirectional: bool,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            bidirectional: true,
            format: "table".to_string(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults
    pub fn load() -> Self {
        let path = config_file_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => {
                tracing::debug!("No config file at {:?}, using defaults", path);
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Write the config file, creating its directory if needed
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["max_distance", "bidirectional", "format"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "max_distance" => Some(self.max_distance.to_string()),
            "bidirectional" => Some(self.bidirectional.to_string()),
            "format" => Some(self.format.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "max_distance" => {
                self.max_distance = value
                    .parse()
                    .with_context(|| format!("Invalid max_distance: {}", value))?;
            }
            "bidirectional" => {
                self.bidirectional = value
                    .parse()
                    .with_context(|| format!("Invalid bidirectional (expected true/false): {}", value))?;
            }
            "format" => match value {
                "table" | "json" => self.format = value.to_string(),
                _ => anyhow::bail!("Invalid format (expected table or json): {}", value),
            },
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}
