//! HTTP provider for the OpenAI chat-completions wire format.
//!
//! Covers OpenAI and Chat AI (bearer auth against `{base}/chat/completions`)
//! and Azure OpenAI (deployment URL, `api-version` query, `api-key` header).
//! Also hosts the request/response plumbing the other providers share.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use elnchat_core::config::Config;
use elnchat_core::types::{Reply, Role, Transcript};

use crate::error::ProviderError;
use crate::registry::ProviderSpec;
use crate::traits::ChatProvider;

// ─────────────────────────────────────────────
// Shared wire plumbing
// ─────────────────────────────────────────────

/// One message in the OpenAI / Ollama `messages` array.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Map a transcript role to the OpenAI-style role tag.
pub(crate) fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::Human => "user",
        Role::Assistant => "assistant",
    }
}

pub(crate) fn wire_messages(transcript: &Transcript) -> Vec<WireMessage<'_>> {
    transcript
        .turns()
        .iter()
        .map(|t| WireMessage {
            role: wire_role(t.role),
            content: &t.text,
        })
        .collect()
}

/// Send a prepared request once and decode the JSON body.
///
/// Non-success statuses become `Auth` (401/403) or `Api` errors carrying the
/// response body.
pub(crate) async fn send_json(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<Value, ProviderError> {
    // URLs may carry an API key as a query parameter; keep them out of errors.
    let response = request.send().await.map_err(|source| {
        let source = source.without_url();
        error!(provider, error = %source, "HTTP request failed");
        ProviderError::Network { provider, source }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        error!(provider, status = %status, body = %body, "API error");

        let status_code = status.as_u16();
        return Err(match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ProviderError::Auth {
                    provider,
                    status: status_code,
                    body,
                }
            }
            _ => ProviderError::Api {
                provider,
                status: status_code,
                body,
            },
        });
    }

    response.json::<Value>().await.map_err(|e| {
        let e = e.without_url();
        error!(provider, error = %e, "Failed to parse response");
        ProviderError::MalformedResponse {
            provider,
            reason: e.to_string(),
        }
    })
}

/// Pull the reply out of a response body at a JSON pointer.
pub(crate) fn extract_reply(
    provider: &'static str,
    mut body: Value,
    pointer: &str,
) -> Result<Reply, ProviderError> {
    match body.pointer_mut(pointer) {
        Some(value) => Ok(Reply::Structured(value.take())),
        None => Err(ProviderError::MalformedResponse {
            provider,
            reason: format!("no reply at '{pointer}'"),
        }),
    }
}

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// How the request is authenticated.
#[derive(Clone)]
enum Auth {
    Bearer(String),
    Header(&'static str, String),
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<WireMessage<'a>>,
}

/// Chat-completions client for OpenAI-compatible APIs and Azure OpenAI.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// Full chat completions URL.
    url: String,
    /// Extra query parameters (Azure `api-version`).
    query: Vec<(&'static str, String)>,
    auth: Auth,
    model: String,
    /// Whether the model goes into the request body (not for Azure, where it's
    /// part of the URL).
    model_in_body: bool,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// OpenAI-compatible provider: `{base}/chat/completions` with bearer auth.
    pub fn openai(
        spec: &'static ProviderSpec,
        config: &Config,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let model = config.require_model()?.to_string();
        let api_key = config.require_api_key()?.to_string();
        let base = spec.resolve_api_base(config)?;

        Ok(HttpProvider {
            client,
            url: completions_url(&base),
            query: Vec::new(),
            auth: Auth::Bearer(api_key),
            model,
            model_in_body: true,
            spec,
        })
    }

    /// Azure OpenAI: the model is the deployment name.
    pub fn azure(
        spec: &'static ProviderSpec,
        config: &Config,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let deployment = config.require_model()?.to_string();
        let api_key = config.require_api_key()?.to_string();
        let endpoint = config.require_endpoint()?;
        let api_version = config.require_api_version()?.to_string();

        let url = format!(
            "{}/openai/deployments/{}/chat/completions",
            endpoint.trim_end_matches('/'),
            deployment
        );

        Ok(HttpProvider {
            client,
            url,
            query: vec![("api-version", api_version)],
            auth: Auth::Header("api-key", api_key),
            model: deployment,
            model_in_body: false,
            spec,
        })
    }

    /// The full request URL (without query).
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Build the full chat completions URL.
fn completions_url(base: &str) -> String {
    format!("{}/chat/completions", base.trim_end_matches('/'))
}

#[async_trait]
impl ChatProvider for HttpProvider {
    async fn send(&self, transcript: &Transcript) -> Result<Reply, ProviderError> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            messages = transcript.len(),
            "Calling LLM"
        );

        let body = ChatCompletionRequest {
            model: self.model_in_body.then_some(self.model.as_str()),
            messages: wire_messages(transcript),
        };

        let mut request = self.client.post(&self.url).json(&body);
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        request = match &self.auth {
            Auth::Bearer(key) => request.bearer_auth(key),
            Auth::Header(name, value) => request.header(*name, value),
        };

        let response = send_json(self.spec.display_name, request).await?;
        let reply = extract_reply(self.spec.display_name, response, "/choices/0/message")?;
        debug!(provider = self.spec.display_name, "LLM response received");
        Ok(reply)
    }

    fn name(&self) -> &str {
        self.spec.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
