//! Configuration management
//!
//! Handles config file loading/saving and API key resolution.
//! Config is stored at ~/.config/reelstream/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bundled TMDB API key so the tool works out of the box; override with
/// the TMDB_API_KEY environment variable or the config file.
const DEFAULT_TMDB_KEY: &str = "89be02cb38d7d2d1f4322fd40d1504fa";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: Option<String>,
    /// Quality label listed first in the stream picker (e.g. "720")
    pub preferred_quality: Option<String>,
    /// Accepted caption language codes
    pub subtitle_languages: Option<Vec<String>>,
    /// Base URL of the stream-lookup service
    pub lookup_url: Option<String>,
    /// Explicit media player executable, bypassing OS detection
    pub player_path: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/reelstream/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reelstream").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    /// 3. Bundled default key
    pub fn tmdb_api_key(&self) -> String {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            return key;
        }
        self.tmdb_api_key
            .clone()
            .unwrap_or_else(|| DEFAULT_TMDB_KEY.to_string())
    }

    /// Preferred stream quality, defaulting to "720".
    pub fn preferred_quality(&self) -> String {
        self.preferred_quality
            .clone()
            .unwrap_or_else(|| "720".to_string())
    }

    /// Accepted caption languages, defaulting to English.
    pub fn subtitle_languages(&self) -> Vec<String> {
        self.subtitle_languages
            .clone()
            .unwrap_or_else(|| vec!["en".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.tmdb_api_key.is_none());
        assert!(config.lookup_url.is_none());
        assert_eq!(config.preferred_quality(), "720");
        assert_eq!(config.subtitle_languages(), vec!["en".to_string()]);
    }

    #[test]
    fn test_config_file_key_wins_over_default() {
        let config = Config {
            tmdb_api_key: Some("filekey".to_string()),
            ..Config::default()
        };
        // Only meaningful when TMDB_API_KEY is unset in the test env.
        if std::env::var("TMDB_API_KEY").is_err() {
            assert_eq!(config.tmdb_api_key(), "filekey");
        }
    }

    #[test]
    fn test_config_parses_toml() {
        let config: Config = toml::from_str(
            r#"
            preferred_quality = "1080"
            subtitle_languages = ["ar", "en"]
            lookup_url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.preferred_quality(), "1080");
        assert_eq!(
            config.subtitle_languages(),
            vec!["ar".to_string(), "en".to_string()]
        );
        assert_eq!(config.lookup_url.as_deref(), Some("http://localhost:9000"));
    }
}
