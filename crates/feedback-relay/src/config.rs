//! Configuration management for feedback-relay.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "feedback-relay";

/// Default local fallback file name.
const FEEDBACK_FILE_NAME: &str = "feedback.csv";

/// Environment key carrying the target spreadsheet id, as supplied by the
/// deployment secret store.
const SHEET_ID_ENV: &str = "GOOGLE_SHEET_ID";

/// Environment key carrying the path to the service-account bundle.
const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Default remote request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default local-file rotation threshold (10 MiB).
const DEFAULT_ROTATE_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. The `GOOGLE_SHEET_ID` / `GOOGLE_APPLICATION_CREDENTIALS` variables
/// 2. Environment variables (prefixed with `FEEDBACK_RELAY_`)
/// 3. TOML config file at `~/.config/feedback-relay/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote sheet sink configuration.
    pub sheet: SheetConfig,
    /// Local fallback sink configuration.
    pub local: LocalConfig,
}

/// Remote sheet sink configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Identifier of the target spreadsheet.
    /// The remote sink is only used when this and `credentials_path` are set.
    pub sheet_id: Option<String>,
    /// Path to the service-account credential bundle (JSON).
    pub credentials_path: Option<PathBuf>,
    /// Worksheet range rows are appended to.
    pub append_range: String,
    /// Timeout for remote calls in seconds. Must be greater than 0.
    pub request_timeout_secs: u64,
}

/// Local fallback sink configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Path to the fallback CSV file.
    /// Defaults to `~/.local/share/feedback-relay/feedback.csv`
    pub feedback_path: Option<PathBuf>,
    /// Rotate the fallback file once it reaches this many bytes.
    /// Set to 0 to disable rotation.
    pub rotate_max_bytes: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_id: None,
            credentials_path: None,
            append_range: "Sheet1".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            feedback_path: None, // Will be resolved to default at runtime
            rotate_max_bytes: DEFAULT_ROTATE_MAX_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("FEEDBACK_RELAY_").split("_"));

        let mut config: Config = figment.extract()?;
        config.apply_secret_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay the spreadsheet id and credential path from the secret-store
    /// environment keys, when present.
    ///
    /// Takes a lookup function instead of reading the process environment
    /// directly so the overlay stays testable.
    pub fn apply_secret_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(SHEET_ID_ENV) {
            self.sheet.sheet_id = Some(id);
        }
        if let Some(path) = lookup(CREDENTIALS_ENV) {
            self.sheet.credentials_path = Some(PathBuf::from(path));
        }
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.sheet.request_timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "request_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.sheet.append_range.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "append_range must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Check whether a remote sheet target is configured.
    ///
    /// Both the sheet id and the credential path must be present; a partial
    /// configuration behaves as if no remote sink were configured at all.
    #[must_use]
    pub fn remote_configured(&self) -> bool {
        self.sheet.sheet_id.is_some() && self.sheet.credentials_path.is_some()
    }

    /// Get the fallback file path, resolving defaults if not set.
    #[must_use]
    pub fn feedback_path(&self) -> PathBuf {
        self.local
            .feedback_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(FEEDBACK_FILE_NAME))
    }

    /// Get the remote request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.sheet.request_timeout_secs)
    }
}
