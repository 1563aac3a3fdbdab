//! Configuration
//!
//! Layered with figment, later layers win:
//! 1. built-in defaults
//! 2. `vitrina.toml` (or the file passed with `--config`)
//! 3. `VITRINA_*` environment variables (`VITRINA_API_URL`, `VITRINA_STORAGE_PATH`, ...)

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Config file read when none is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "vitrina.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "VITRINA_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL; also the prefix for relative upload URLs
    pub api_url: String,
    /// Durable key-value file holding the credential and admin preference
    pub storage_path: PathBuf,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Per-request timeout; unset means requests may hang indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Host-signed init data, when not given on the command line
    pub init_data: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            storage_path: PathBuf::from("vitrina-storage.json"),
            log_level: "info".to_string(),
            request_timeout_secs: None,
            init_data: None,
        }
    }
}

impl Config {
    /// Loads from [`DEFAULT_CONFIG_FILE`] and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads from `path` (missing file is fine) and the environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a source cannot be parsed or `api_url` is
    /// not a URL.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: Config = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_url().map(|_| ())
    }

    pub fn api_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_url).map_err(|source| ConfigError::ApiUrl {
            value: self.api_url.clone(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
