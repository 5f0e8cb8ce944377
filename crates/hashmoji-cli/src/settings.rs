//! CLI settings.
//!
//! Settings are layered: built-in defaults, then
//! `<config_dir>/hashmoji/config.toml` if it exists, then `HASHMOJI_*`
//! environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hashmoji_identity::{DEFAULT_AUTHORITY_URL, DEFAULT_SERVICE, DEFAULT_TIMEOUT_SECS};

use crate::logging::LogFormat;

/// Environment variable prefix.
const ENV_PREFIX: &str = "HASHMOJI";

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Base URL of the identity authority.
    pub authority_url: String,
    /// Request timeout, in seconds.
    pub timeout_secs: u64,
    /// Log output format.
    pub log_format: LogFormat,
    /// Keyring service name for stored keys.
    pub keyring_service: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_format: LogFormat::Pretty,
            keyring_service: DEFAULT_SERVICE.to_string(),
        }
    }
}

impl Settings {
    /// Returns the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hashmoji").join("config.toml"))
    }

    /// Loads settings from `path` (or the default path) and the environment.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(
        path: Option<PathBuf>,
        env: Environment,
    ) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("authority_url", defaults.authority_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("log_format", "pretty")?
            .set_default("keyring_service", defaults.keyring_service)?;

        if let Some(path) = path {
            tracing::debug!(?path, "Reading config file");
            builder = builder.add_source(File::from(path).required(false));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
