//! Configuration schema - the five `API_*` settings, each optional until a
//! provider branch requires it.

use thiserror::Error;

/// Environment variable holding the provider identifier.
pub const API_PROVIDER: &str = "API_PROVIDER";
/// Environment variable holding the model (or Azure deployment) name.
pub const API_MODEL: &str = "API_MODEL";
/// Environment variable holding the API key.
pub const API_KEY: &str = "API_KEY";
/// Environment variable holding the endpoint / base URL.
pub const API_ENDPOINT: &str = "API_ENDPOINT";
/// Environment variable holding the API version (Azure).
pub const API_VERSION: &str = "API_VERSION";

/// A required setting was absent.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required configuration: set {key}")]
    Missing { key: &'static str },
}

/// Root configuration, read-only for the lifetime of one run.
///
/// Empty values are normalized to `None`.
#[derive(Clone, Default, PartialEq)]
pub struct Config {
    /// Provider identifier (`API_PROVIDER`).
    pub provider: Option<String>,
    /// Model identifier (`API_MODEL`).
    pub model: Option<String>,
    /// API key (`API_KEY`).
    pub api_key: Option<String>,
    /// Endpoint override (`API_ENDPOINT`).
    pub endpoint: Option<String>,
    /// API version (`API_VERSION`).
    pub api_version: Option<String>,
}

// The API key must never reach the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Config {
    /// Build a config from an arbitrary key lookup.
    ///
    /// `load_config` passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Config {
            provider: get(API_PROVIDER),
            model: get(API_MODEL),
            api_key: get(API_KEY),
            endpoint: get(API_ENDPOINT),
            api_version: get(API_VERSION),
        }
    }

    /// Provider identifier, lowercased.
    pub fn provider_name(&self) -> Option<String> {
        self.provider.as_ref().map(|p| p.to_lowercase())
    }

    pub fn require_model(&self) -> Result<&str, ConfigError> {
        require(&self.model, API_MODEL)
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        require(&self.api_key, API_KEY)
    }

    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        require(&self.endpoint, API_ENDPOINT)
    }

    pub fn require_api_version(&self) -> Result<&str, ConfigError> {
        require(&self.api_version, API_VERSION)
    }

    /// Whether an API key is set.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn require<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or(ConfigError::Missing { key })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
