//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BROWSY_*)
//! 2. TOML config file (if BROWSY_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheConfig, DEFAULT_CAPACITY, DEFAULT_TTL};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BROWSY_*)
/// 2. TOML config file (if BROWSY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Google Books API key.
    ///
    /// Set via BROWSY_GOOGLE_BOOKS_API_KEY environment variable.
    /// When unset or empty, Google Books requests are sent anonymously.
    #[serde(default)]
    pub google_books_api_key: Option<String>,

    /// Google Books API base URL.
    #[serde(default = "default_google_books_base_url")]
    pub google_books_base_url: String,

    /// Open Library base URL.
    #[serde(default = "default_open_library_base_url")]
    pub open_library_base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via BROWSY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via BROWSY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of cached book records.
    ///
    /// Set via BROWSY_CACHE_CAPACITY environment variable.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Cache entry lifetime in seconds.
    ///
    /// Set via BROWSY_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Path to the SQLite database holding shelf memberships.
    ///
    /// Set via BROWSY_SHELF_DB_PATH environment variable.
    #[serde(default = "default_shelf_db_path")]
    pub shelf_db_path: PathBuf,
}

fn default_google_books_base_url() -> String {
    "https://www.googleapis.com/books/v1".into()
}

fn default_open_library_base_url() -> String {
    "https://openlibrary.org".into()
}

fn default_user_agent() -> String {
    concat!("browsy/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_shelf_db_path() -> PathBuf {
    PathBuf::from("./browsy-shelves.sqlite")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            google_books_api_key: None,
            google_books_base_url: default_google_books_base_url(),
            open_library_base_url: default_open_library_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
            shelf_db_path: default_shelf_db_path(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Book cache sizing derived from this config.
    pub fn cache(&self) -> CacheConfig {
        CacheConfig { capacity: self.cache_capacity, ttl: Duration::from_secs(self.cache_ttl_secs) }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BROWSY_`
    /// 2. TOML file from `BROWSY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `BROWSY_CONFIG_FILE` names a file that does not exist
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = std::env::var("BROWSY_CONFIG_FILE").ok();
        if let Some(path) = config_file.as_deref()
            && !Path::new(path).is_file()
        {
            return Err(ConfigError::Missing {
                field: "BROWSY_CONFIG_FILE".into(),
                hint: format!("{path} is not a readable file"),
            });
        }

        Self::from_figment(Self::figment(config_file.as_deref()))
    }

    fn figment(config_file: Option<&str>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(
            Env::prefixed("BROWSY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Google Books API key, if one is set and non-empty.
    pub fn google_books_key(&self) -> Option<&str> {
        self.google_books_api_key.as_deref().filter(|key| !key.is_empty())
    }
}
