/// Application configuration
///
/// Looked up in this order, later sources winning:
/// 1. Built-in defaults (`http://localhost:8080`, no timeout, three styles)
/// 2. A TOML file: `$PROMPT_REMIX_CONFIG`, or `<config dir>/prompt-remix/config.toml`
/// 3. `PROMPT_REMIX_BASE_URL` from the environment (or a `.env` file)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const CONFIG_PATH_ENV: &str = "PROMPT_REMIX_CONFIG";
pub const BASE_URL_ENV: &str = "PROMPT_REMIX_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the generation service; calls go to `{base_url}/customers/{id}`
    pub base_url: Url,
    /// Per-request timeout. `None` leaves it to the transport
    pub request_timeout_secs: Option<u64>,
    /// Style presets offered in the picker on the home screen
    pub styles: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            styles: vec![
                "Lora 1".to_string(),
                "Lora 2".to_string(),
                "Lora 3".to_string(),
            ],
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL)
        .unwrap_or_else(|e| unreachable!("default base URL is invalid: {}", e))
}

impl Config {
    /// Load from the standard locations and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let file = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);
        let base_url = std::env::var(BASE_URL_ENV).ok().filter(|s| !s.trim().is_empty());

        Self::from_sources(file.as_deref(), base_url.as_deref())
    }

    /// Like [`Config::load`], but never fails: problems are logged and the
    /// defaults are used instead.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("⚠️  {}; falling back to default configuration", e);
                Self::default()
            }
        }
    }

    /// Build a config from an optional file and an optional base URL override.
    /// A file that does not exist is treated as empty.
    pub fn from_sources(file: Option<&Path>, base_url: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::debug!("📁 Loading config from {}", path.display());
                toml::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => Self::default(),
        };

        if let Some(raw) = base_url {
            config.base_url = Url::parse(raw.trim()).map_err(|e| ConfigError::BaseUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.base_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::BaseUrl {
                url: self.base_url.to_string(),
                reason: format!("scheme must be http or https, got '{}'", other),
            }),
        }
    }
}

/// - Linux: ~/.config/prompt-remix/config.toml
/// - macOS: ~/Library/Application Support/prompt-remix/config.toml
/// - Windows: %APPDATA%\prompt-remix\config.toml
fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("prompt-remix");
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(None, None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.styles.len(), 3);
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let config =
            Config::from_sources(Some(Path::new("/nonexistent/config.toml")), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"https://gen.example.com/v1/\"\nrequest_timeout_secs = 30\nstyles = [\"Anime\"]"
        )
        .unwrap();

        let config = Config::from_sources(Some(file.path()), None).unwrap();
        assert_eq!(config.base_url.as_str(), "https://gen.example.com/v1/");
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.styles, vec!["Anime".to_string()]);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let config = Config::from_sources(Some(file.path()), None).unwrap();
        assert_eq!(config.base_url, Config::default().base_url);
        assert_eq!(config.request_timeout_secs, Some(5));
    }

    #[test]
    fn test_env_override_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://file.example.com\"").unwrap();

        let config =
            Config::from_sources(Some(file.path()), Some("http://10.0.0.2:9000")).unwrap();
        assert_eq!(config.base_url.as_str(), "http://10.0.0.2:9000/");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            Config::from_sources(None, Some("not a url")),
            Err(ConfigError::BaseUrl { .. })
        ));
        assert!(matches!(
            Config::from_sources(None, Some("ftp://example.com")),
            Err(ConfigError::BaseUrl { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "styles = 42").unwrap();

        assert!(matches!(
            Config::from_sources(Some(file.path()), None),
            Err(ConfigError::Parse { .. })
        ));
    }
}
