//! Application configuration.
//!
//! Read from `config.json` in the user's config directory, then overridden by
//! `DTAB_*` environment variables.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "decision-table";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Port of the HTTP API.
    pub port: u16,
    /// SQLite file holding the table. Defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
    /// Allowed CORS origins. `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: None,
            cors_origins: None,
        }
    }
}

impl AppConfig {
    /// Load the config file and apply environment overrides.
    /// Returns defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env(|name| std::env::var(name).ok())
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Apply `DTAB_PORT`, `DTAB_DB_PATH` and `DTAB_CORS_ORIGINS` from `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("DTAB_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid DTAB_PORT {:?}", port),
            }
        }
        if let Some(path) = lookup("DTAB_DB_PATH") {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(origins) = lookup("DTAB_CORS_ORIGINS") {
            self.cors_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        self
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        let config = AppConfig::default().with_env(|name| match name {
            "DTAB_PORT" => Some("8080".to_string()),
            "DTAB_CORS_ORIGINS" => Some("http://a.test, http://b.test".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 8080);
        assert!(config.db_path.is_none());
        assert_eq!(
            config.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
    }

    #[test]
    fn invalid_port_is_ignored() {
        let config = AppConfig::default().with_env(|name| {
            (name == "DTAB_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"port": 4000}"#).unwrap();
        assert_eq!(config.port, 4000);
        assert!(config.cors_origins.is_none());
    }
}
