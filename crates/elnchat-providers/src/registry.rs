//! Provider registry - static specs for the supported chat providers, plus
//! selection from configuration.
//!
//! Adding a provider means adding one `ProviderSpec` entry and, if its wire
//! format is new, one `WireStyle` variant. Nothing else depends on which
//! provider was chosen.

use std::time::Duration;

use elnchat_core::config::Config;
use tracing::debug;

use crate::error::ProviderError;
use crate::gemini::GeminiProvider;
use crate::http_provider::HttpProvider;
use crate::ollama::OllamaProvider;
use crate::traits::ChatProvider;

/// Request timeout applied to every provider.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// ProviderSpec - static metadata for one provider
// ─────────────────────────────────────────────

/// Request/response format spoken by a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireStyle {
    /// `POST {base}/chat/completions` with bearer auth.
    OpenAiChat,
    /// `POST {endpoint}/openai/deployments/{model}/chat/completions?api-version=…`
    /// with an `api-key` header.
    AzureChat,
    /// `POST {base}/api/chat` (no auth).
    OllamaChat,
    /// `POST {base}/models/{model}:generateContent?key=…`.
    GeminiGenerate,
}

/// Static description of one chat provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Identifier matched against `API_PROVIDER` (e.g. `"openai"`).
    pub name: &'static str,
    /// Human-readable name for logs.
    pub display_name: &'static str,
    pub style: WireStyle,
    /// Base URL used when `API_ENDPOINT` is unset. `None` means the endpoint
    /// is required.
    pub default_api_base: Option<&'static str>,
    pub requires_api_key: bool,
    pub requires_api_version: bool,
}

impl ProviderSpec {
    /// Environment variables this provider cannot run without.
    pub fn required_keys(&self) -> Vec<&'static str> {
        let mut keys = vec!["API_MODEL"];
        if self.requires_api_key {
            keys.push("API_KEY");
        }
        if self.default_api_base.is_none() {
            keys.push("API_ENDPOINT");
        }
        if self.requires_api_version {
            keys.push("API_VERSION");
        }
        keys
    }

    /// `API_ENDPOINT` if set, otherwise the default base.
    pub fn resolve_api_base(&self, config: &Config) -> Result<String, ProviderError> {
        match (&config.endpoint, self.default_api_base) {
            (Some(endpoint), _) => Ok(endpoint.clone()),
            (None, Some(default)) => Ok(default.to_string()),
            (None, None) => Ok(config.require_endpoint()?.to_string()),
        }
    }
}

/// Complete list of supported providers.
pub static PROVIDERS: &[ProviderSpec] = &[
    // Azure OpenAI - API_MODEL is the deployment name
    ProviderSpec {
        name: "azure",
        display_name: "Azure OpenAI",
        style: WireStyle::AzureChat,
        default_api_base: None,
        requires_api_key: true,
        requires_api_version: true,
    },
    // Ollama - local server, no key
    ProviderSpec {
        name: "ollama",
        display_name: "Ollama",
        style: WireStyle::OllamaChat,
        default_api_base: Some("http://localhost:11434"),
        requires_api_key: false,
        requires_api_version: false,
    },
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        style: WireStyle::OpenAiChat,
        default_api_base: Some("https://api.openai.com/v1"),
        requires_api_key: true,
        requires_api_version: false,
    },
    // GWDG Chat AI - OpenAI-compatible
    ProviderSpec {
        name: "chatai",
        display_name: "Chat AI",
        style: WireStyle::OpenAiChat,
        default_api_base: Some("https://chat-ai.academiccloud.de/v1"),
        requires_api_key: true,
        requires_api_version: false,
    },
    ProviderSpec {
        name: "gemini",
        display_name: "Gemini",
        style: WireStyle::GeminiGenerate,
        default_api_base: Some("https://generativelanguage.googleapis.com/v1beta"),
        requires_api_key: true,
        requires_api_version: false,
    },
];

// ─────────────────────────────────────────────
// Lookup & selection
// ─────────────────────────────────────────────

/// Find a provider spec by name (trimmed, case-insensitive).
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    let name = name.trim().to_lowercase();
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Names of all known providers, in registry order.
pub fn known_names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|spec| spec.name).collect()
}

/// Build the chat client selected by `API_PROVIDER`.
///
/// Unknown or missing providers are rejected here, before any network call.
/// Then the provider's required settings are validated.
pub fn select_provider(config: &Config) -> Result<Box<dyn ChatProvider>, ProviderError> {
    let spec = config
        .provider
        .as_deref()
        .and_then(find_by_name)
        .ok_or_else(|| ProviderError::Unconfigured {
            name: config.provider.clone(),
        })?;

    debug!(
        provider = spec.display_name,
        model = config.model.as_deref().unwrap_or("?"),
        endpoint = config.endpoint.as_deref().unwrap_or("default"),
        "Selecting chat provider"
    );

    build_provider(spec, config)
}

/// Build a client for a specific spec.
pub fn build_provider(
    spec: &'static ProviderSpec,
    config: &Config,
) -> Result<Box<dyn ChatProvider>, ProviderError> {
    let client = build_http_client(spec)?;

    let provider: Box<dyn ChatProvider> = match spec.style {
        WireStyle::OpenAiChat => Box::new(HttpProvider::openai(spec, config, client)?),
        WireStyle::AzureChat => Box::new(HttpProvider::azure(spec, config, client)?),
        WireStyle::OllamaChat => Box::new(OllamaProvider::new(spec, config, client)?),
        WireStyle::GeminiGenerate => Box::new(GeminiProvider::new(spec, config, client)?),
    };

    Ok(provider)
}

fn build_http_client(spec: &'static ProviderSpec) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|source| ProviderError::ClientSetup {
            provider: spec.display_name,
            source,
        })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use elnchat_core::config::ConfigError;

    fn full_config(provider: &str) -> Config {
        Config {
            provider: Some(provider.to_string()),
            model: Some("some-model".to_string()),
            api_key: Some("key".to_string()),
            endpoint: Some("https://example.invalid".to_string()),
            api_version: Some("2024-06-01".to_string()),
        }
    }

    #[test]
    fn test_build_http_client() {
        for spec in PROVIDERS {
            assert!(build_http_client(spec).is_ok());
        }
    }

    #[test]
    fn test_find_by_name() {
        let spec = find_by_name("chatai").unwrap();
        assert_eq!(spec.display_name, "Chat AI");
        assert_eq!(spec.style, WireStyle::OpenAiChat);
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        assert_eq!(find_by_name(" Azure ").unwrap().name, "azure");
    }

    #[test]
    fn test_find_by_name_unknown() {
        assert!(find_by_name("anthropic").is_none());
        assert!(find_by_name("").is_none());
    }

    #[test]
    fn test_every_known_provider_binds() {
        for spec in PROVIDERS {
            let provider = select_provider(&full_config(spec.name)).unwrap();
            assert_eq!(provider.name(), spec.name);
            assert_eq!(provider.display_name(), spec.display_name);
            assert_eq!(provider.model(), "some-model");
        }
    }

    #[test]
    fn test_unknown_provider_is_unconfigured() {
        for name in ["anthropic", "open-ai", "azureopenai", "   "] {
            let err = select_provider(&full_config(name)).unwrap_err();
            assert!(err.is_unconfigured(), "{name} should be unconfigured");
        }
    }

    #[test]
    fn test_missing_provider_is_unconfigured() {
        let mut config = full_config("openai");
        config.provider = None;
        let err = select_provider(&config).unwrap_err();
        assert!(matches!(err, ProviderError::Unconfigured { name: None }));
    }

    #[test]
    fn test_ollama_needs_only_model() {
        let config = Config {
            provider: Some("ollama".into()),
            model: Some("llama3.2".into()),
            ..Default::default()
        };
        let provider = select_provider(&config).unwrap();
        assert_eq!(provider.model(), "llama3.2");
    }

    #[test]
    fn test_azure_requires_api_version() {
        let mut config = full_config("azure");
        config.api_version = None;
        let err = select_provider(&config).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Config(ConfigError::Missing { key: "API_VERSION" })
        ));
    }

    #[test]
    fn test_azure_requires_endpoint() {
        let mut config = full_config("azure");
        config.endpoint = None;
        let err = select_provider(&config).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Config(ConfigError::Missing { key: "API_ENDPOINT" })
        ));
    }

    #[test]
    fn test_openai_requires_key() {
        let mut config = full_config("openai");
        config.api_key = None;
        let err = select_provider(&config).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Config(ConfigError::Missing { key: "API_KEY" })
        ));
    }

    #[test]
    fn test_required_keys() {
        assert_eq!(
            find_by_name("azure").unwrap().required_keys(),
            vec!["API_MODEL", "API_KEY", "API_ENDPOINT", "API_VERSION"]
        );
        assert_eq!(find_by_name("ollama").unwrap().required_keys(), vec!["API_MODEL"]);
    }

    #[test]
    fn test_resolve_api_base_prefers_endpoint() {
        let spec = find_by_name("openai").unwrap();
        let mut config = full_config("openai");
        assert_eq!(spec.resolve_api_base(&config).unwrap(), "https://example.invalid");
        config.endpoint = None;
        assert_eq!(spec.resolve_api_base(&config).unwrap(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_all_providers_have_unique_names() {
        let names = known_names();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len(), "Duplicate provider names found");
    }

    #[test]
    fn test_provider_count() {
        assert_eq!(PROVIDERS.len(), 5);
    }
}
