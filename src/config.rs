use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_REQUESTS_PER_MINUTE: usize = 10;

/// Non-secret defaults from ~/.config/youtubey/config.toml (optional).
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub preferred_lang: Option<String>,
    pub gemini_model: Option<String>,
    pub max_requests_per_minute: Option<usize>,
}

impl FileConfig {
    /// Load the config file if it exists; missing file is not an error.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: FileConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(FileConfig::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("youtubey")
        .join("config.toml")
}

/// Resolved runtime configuration. Secrets come from the environment only:
/// `GEMINI_API_KEY` for the generative service (absence disables AI paths
/// for the process lifetime) and `YOUTUBEY_COOKIES` for the authenticated
/// scrape strategy (Netscape cookie-file content, never a tracked file).
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub preferred_lang: String,
    pub gemini_model: String,
    pub max_requests_per_minute: usize,
    pub gemini_api_key: Option<String>,
    pub cookies: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        let file = FileConfig::load().unwrap_or_default();
        Config {
            port: file.port.unwrap_or(DEFAULT_PORT),
            preferred_lang: file.preferred_lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
            gemini_model: file.gemini_model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            max_requests_per_minute: file
                .max_requests_per_minute
                .unwrap_or(DEFAULT_MAX_REQUESTS_PER_MINUTE),
            gemini_api_key: env_nonempty("GEMINI_API_KEY"),
            cookies: env_nonempty("YOUTUBEY_COOKIES"),
        }
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
port = 9090
preferred_lang = "es"
gemini_model = "gemini-1.5-pro"
max_requests_per_minute = 5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, Some(9090));
        assert_eq!(config.preferred_lang.as_deref(), Some("es"));
        assert_eq!(config.gemini_model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.max_requests_per_minute, Some(5));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.port.is_none());
        assert!(config.preferred_lang.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: FileConfig = toml::from_str(r#"preferred_lang = "fr""#).unwrap();
        assert_eq!(config.preferred_lang.as_deref(), Some("fr"));
        assert!(config.gemini_model.is_none());
    }
}
