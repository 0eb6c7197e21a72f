use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::app_data;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// Backend endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the karaoke API (e.g. "http://localhost:3000/api")
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    app_data::client_data().api.default_base_url.clone()
}

/// Persisted session state. Only the profile identifier is cached, never the
/// full record; it exists solely to skip profile creation on return visits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub profile_id: Option<String>,
}

/// Input tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Prefer a VR session when one is available
    #[serde(default = "default_true")]
    pub prefer_vr: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { prefer_vr: default_true() }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "encore", "Encore")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &PathBuf) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_cached_profile() {
        let config = Config::default();
        assert!(config.session.profile_id.is_none());
        assert!(config.api.base_url.starts_with("http"));
    }

    #[test]
    fn round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.session.profile_id = Some("prof_12345".to_string());
        config.api.base_url = "http://example.test/api".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.session.profile_id.as_deref(), Some("prof_12345"));
        assert_eq!(loaded.api.base_url, "http://example.test/api");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.session.profile_id.is_none());
    }
}
