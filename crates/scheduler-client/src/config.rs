//! Client configuration for the scheduler REST API.
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. First discovered config file (`./.scheduler-ctl.toml`, then
//!    `~/.config/scheduler-ctl.toml`)
//! 3. Environment variables (`SCHEDULER_API_URL`, `SCHEDULER_API_TIMEOUT_MS`)
//! 4. Explicit overrides from the command line ([`ClientConfig::with_base_url`])

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5679";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_API_URL: &str = "SCHEDULER_API_URL";
pub const ENV_API_TIMEOUT_MS: &str = "SCHEDULER_API_TIMEOUT_MS";

const CONFIG_FILENAME: &str = ".scheduler-ctl.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "scheduler-ctl.toml";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Connection settings for the scheduler API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Base URL of the scheduler service, without the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    /// Reject settings that cannot produce a request.
    pub fn validate(&self) -> ClientResult<()> {
        self.parsed_base_url()?;
        if self.timeout_ms == 0 {
            return Err(ClientError::config_error("API timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Parse the base URL, requiring an http(s) scheme and a host.
    pub fn parsed_base_url(&self) -> ClientResult<Url> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(ClientError::config_error("API base URL is empty"));
        }
        let url = Url::parse(raw)
            .map_err(|e| ClientError::config_error(format!("Invalid API base URL '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::config_error(format!(
                "API base URL must start with http:// or https://: {raw}"
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ClientError::config_error(format!(
                "API base URL has no host: {raw}"
            )));
        }
        Ok(url)
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

impl ClientConfig {
    /// Load configuration from the discovered config file and environment.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is
    /// logged and skipped rather than aborting the command.
    pub fn load() -> Self {
        let mut config = match Self::find_config_file() {
            Some(path) => match Self::load_from_path(&path) {
                Ok(config) => {
                    debug!(?path, "Loaded client config");
                    config
                }
                Err(e) => {
                    warn!(?path, error = %e, "Failed to load client config, using defaults");
                    Self::default()
                }
            },
            None => Self::default(),
        };
        config.apply_env();
        config
    }

    /// Parse a config file from an explicit path.
    pub fn load_from_path(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(contents: &str) -> ClientResult<Self> {
        toml::from_str(contents).map_err(|e| ClientError::config_error(e.to_string()))
    }

    /// Override the API base URL (from the `--api-url` flag).
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        self
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(raw) = std::env::var(ENV_API_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) => self.api.timeout_ms = timeout_ms,
                Err(e) => {
                    warn!(value = %raw, error = %e, "Ignoring invalid {}", ENV_API_TIMEOUT_MS);
                }
            }
        }
    }

    /// Search for a config file in precedence order.
    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILENAME);
        if local.is_file() {
            return Some(local);
        }

        let global = dirs::home_dir()?
            .join(GLOBAL_CONFIG_DIR)
            .join(GLOBAL_CONFIG_FILENAME);
        global.is_file().then_some(global)
    }
}
