//! Configuration management for copydesk.
//!
//! Loads configuration from ${COPYDESK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for copydesk configuration and data directories.
    //!
    //! COPYDESK_HOME resolution order:
    //! 1. COPYDESK_HOME environment variable (if set)
    //! 2. ~/.config/copydesk (default)

    use std::path::PathBuf;

    /// Returns the copydesk home directory.
    ///
    /// Checks COPYDESK_HOME env var first, falls back to ~/.config/copydesk
    pub fn copydesk_home() -> PathBuf {
        if let Ok(home) = std::env::var("COPYDESK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("copydesk"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        copydesk_home().join("config.toml")
    }

    /// Returns the path to the durable session file.
    pub fn session_path() -> PathBuf {
        copydesk_home().join("session.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        copydesk_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the content API (no trailing slash).
    pub api_base_url: String,

    /// Default page size for paged listings.
    pub page_size: u32,

    /// Timeout for API requests in seconds (0 disables).
    pub request_timeout_secs: u32,
}

impl Config {
    const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
    const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Default is disabled; the server decides how long requests may take.
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 0;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the api_base_url field to the config file.
    ///
    /// Creates the file with the default template if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_api_base_url(api_base_url: &str) -> Result<()> {
        Self::save_api_base_url_to(&paths::config_path(), api_base_url)
    }

    /// Saves only the api_base_url field to a specific config file path.
    pub fn save_api_base_url_to(path: &Path, api_base_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        validate_url(api_base_url)?;

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_base_url"] = value(api_base_url);

        Self::write_config(path, &doc.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    fn validate(&self) -> Result<()> {
        validate_url(&self.api_base_url)?;
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        Ok(())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    Ok(())
}

/// Returns the default config file template with commented defaults.
pub fn default_config_template() -> &'static str {
    r#"# copydesk configuration

# Base URL of the content API (no trailing slash).
api_base_url = "http://localhost:8000/api"

# Default page size for paged listings.
# page_size = 10

# Timeout for API requests in seconds (0 disables).
# request_timeout_secs = 0
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api_base_url, Config::DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, Config::DEFAULT_PAGE_SIZE);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn load_parses_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base_url = \"https://cms.example.com/api\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://cms.example.com/api");
        assert_eq!(config.page_size, Config::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn load_rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base_url = \"not a url\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_api_base_url_creates_file_from_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::save_api_base_url_to(&path, "https://cms.example.com/api").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("api_base_url = \"https://cms.example.com/api\""));
        // Template comments survive the edit
        assert!(contents.contains("# page_size"));
    }

    #[test]
    fn save_api_base_url_preserves_existing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = 25\napi_base_url = \"http://old\"\n").unwrap();

        Config::save_api_base_url_to(&path, "https://cms.example.com/api").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://cms.example.com/api");
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn default_template_parses() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(config.api_base_url, Config::DEFAULT_API_BASE_URL);
    }
}
