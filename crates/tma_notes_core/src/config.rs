//! Client configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve API endpoint, auth init data, mirror path and logging options.
//! - Reject unusable values before any client or store is built.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - Resolution goes through a lookup function so tests never touch the
//!   process environment.

use crate::launch::LaunchParams;
use crate::logging::default_log_level;
use crate::remote::RemoteConfig;
use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "TMA_NOTES_API_BASE_URL";
pub const ENV_INIT_DATA: &str = "TMA_NOTES_INIT_DATA";
pub const ENV_DB_PATH: &str = "TMA_NOTES_DB_PATH";
pub const ENV_HTTP_TIMEOUT_MS: &str = "TMA_NOTES_HTTP_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "TMA_NOTES_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TMA_NOTES_LOG_DIR";
pub const ENV_PLATFORM: &str = "TMA_NOTES_PLATFORM";
pub const ENV_DARK: &str = "TMA_NOTES_DARK";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_DB_FILE_NAME: &str = "tma_notes.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl(String),
    InvalidTimeout(String),
    InvalidFlag { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => {
                write!(f, "api base url must be an http(s) url, got `{value}`")
            }
            Self::InvalidTimeout(value) => write!(
                f,
                "http timeout must be a positive number of milliseconds, got `{value}`"
            ),
            Self::InvalidFlag { key, value } => {
                write!(f, "{key} must be true/false/1/0, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Everything needed to open one notes session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub db_path: PathBuf,
    pub request_timeout: Duration,
    pub log_level: String,
    /// File logging is off when unset.
    pub log_dir: Option<PathBuf>,
    pub launch: LaunchParams,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            request_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
            log_level: default_log_level().to_string(),
            log_dir: None,
            launch: LaunchParams::default(),
        }
    }
}

impl ClientConfig {
    /// Resolves configuration from `TMA_NOTES_*` process variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        let api_base_url = match value(ENV_API_BASE_URL) {
            Some(raw) => validate_base_url(&raw)?,
            None => defaults.api_base_url,
        };
        let request_timeout = match value(ENV_HTTP_TIMEOUT_MS) {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.request_timeout,
        };
        let dark = match value(ENV_DARK) {
            Some(raw) => parse_flag(ENV_DARK, &raw)?,
            None => false,
        };

        Ok(Self {
            api_base_url,
            db_path: value(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            request_timeout,
            log_level: value(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: value(ENV_LOG_DIR).map(PathBuf::from),
            launch: LaunchParams {
                // Init data is opaque and must not be trimmed.
                init_data_raw: lookup(ENV_INIT_DATA).unwrap_or_default(),
                platform: value(ENV_PLATFORM).unwrap_or_default(),
                dark,
            },
        })
    }

    /// Overrides the API base after validating it.
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = validate_base_url(raw.trim())?;
        Ok(self)
    }

    /// Settings for the HTTP notes client.
    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.api_base_url.clone(),
            init_data_raw: self.launch.init_data_raw.clone(),
            timeout: self.request_timeout,
        }
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(raw.to_string())
        }
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_string())),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        }),
    }
}
