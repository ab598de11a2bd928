//! Provider errors. None of these are retried; the caller terminates the run.

use elnchat_core::config::ConfigError;
use elnchat_core::types::ReplyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// `API_PROVIDER` is unset or names no known provider.
    #[error(
        "unconfigured provider {}: set API_PROVIDER to one of {}",
        .name.as_deref().map_or_else(|| "(unset)".to_string(), |n| format!("'{n}'")),
        crate::registry::known_names().join(", ")
    )]
    Unconfigured { name: Option<String> },

    /// The selected provider is missing a required setting.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The local HTTP client (TLS backend, timeouts) could not be set up.
    #[error("{provider}: failed to build HTTP client: {source}")]
    ClientSetup {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The request never completed.
    #[error("{provider}: network failure: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider rejected the credentials (401/403).
    #[error("{provider}: authentication failed ({status}): {body}")]
    Auth {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Any other non-success HTTP status.
    #[error("{provider}: API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The body was not JSON or lacked the expected reply location.
    #[error("{provider}: malformed response: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

impl ProviderError {
    /// Whether this is the "no provider bound" case.
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, ProviderError::Unconfigured { .. })
    }
}
