//! Application configuration loaded from disk and the environment.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "pokedex";

/// Prefix for environment overrides, e.g. `POKEDEX_API_URL`.
pub const ENV_PREFIX: &str = "POKEDEX";

/// Largest page the catalog API accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

const DEFAULT_CONFIG: &str = r#"# Pokédex client configuration.
# Every key can be overridden with a POKEDEX_<KEY> environment variable.

# Base URL of the catalog API.
api_url = "http://localhost:8000"

# Resource segment for list and detail requests (<api_url>/<catalog_path>).
catalog_path = "pokemons"

# Number of entries requested per page (1-100).
page_limit = 20

# Per-request timeout in seconds.
request_timeout_secs = 30

# How long list and detail responses are reused before re-fetching.
list_stale_secs = 300
detail_stale_secs = 600

# Where the login session is stored. Defaults to the config directory.
# session_path = "/home/me/.config/pokedex/session.json"
"#;

/// Runtime configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the catalog API.
    pub api_url: String,
    /// Path segment under `api_url` that serves the catalog.
    pub catalog_path: String,
    /// Entries requested per page.
    pub page_limit: u32,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Seconds a fetched page stays fresh.
    pub list_stale_secs: u64,
    /// Seconds a fetched detail record stays fresh.
    pub detail_stale_secs: u64,
    /// Explicit session file location.
    pub session_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            catalog_path: "pokemons".to_string(),
            page_limit: 20,
            request_timeout_secs: 30,
            list_stale_secs: 300,
            detail_stale_secs: 600,
            session_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (if present) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            bail!("api_url must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api_url must be an http(s) URL, got '{url}'");
        }
        if self.catalog_path.trim_matches('/').is_empty() {
            bail!("catalog_path must not be empty");
        }
        if self.page_limit == 0 || self.page_limit > MAX_PAGE_LIMIT {
            bail!(
                "page_limit must be between 1 and {MAX_PAGE_LIMIT}, got {}",
                self.page_limit
            );
        }
        Ok(())
    }

    /// Location of the persisted session file.
    pub fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(|| config_dir().join("session.json"))
    }

    /// Timeout applied to every HTTP request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Freshness window for list pages.
    pub fn list_stale(&self) -> Duration {
        Duration::from_secs(self.list_stale_secs)
    }

    /// Freshness window for detail records.
    pub fn detail_stale(&self) -> Duration {
        Duration::from_secs(self.detail_stale_secs)
    }
}

/// `~/.config/pokedex` (or the platform equivalent).
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Directory for logs and other local state.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Write the commented default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_matches_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path)?;
        assert!(path.exists());

        let parsed: AppConfig = load_file_only(&path)?;
        assert_eq!(parsed.api_url, AppConfig::default().api_url);
        assert_eq!(parsed.page_limit, 20);
        assert_eq!(parsed.catalog_path, "pokemons");
        assert_eq!(parsed.session_path, None);
        Ok(())
    }

    #[test]
    fn existing_file_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_limit = 5\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "page_limit = 5\n");
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"https://dex.example.com\"\npage_limit = 50\nsession_path = \"/tmp/s.json\"\n",
        )?;
        let parsed = load_file_only(&path)?;
        assert_eq!(parsed.api_url, "https://dex.example.com");
        assert_eq!(parsed.page_limit, 50);
        assert_eq!(parsed.list_stale_secs, 300);
        assert_eq!(parsed.session_path(), PathBuf::from("/tmp/s.json"));
        Ok(())
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.page_limit = 0;
        assert!(config.validate().is_err());
        config.page_limit = MAX_PAGE_LIMIT + 1;
        assert!(config.validate().is_err());

        config.page_limit = 20;
        config.api_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.api_url = "   ".to_string();
        assert!(config.validate().is_err());

        config.api_url = "http://localhost:8000".to_string();
        config.catalog_path = "/".to_string();
        assert!(config.validate().is_err());
    }

    // Reads only the file source so the tests do not depend on the process environment.
    fn load_file_only(path: &Path) -> Result<AppConfig> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
