//! Google Gemini provider - `generateContent`.
//!
//! Differences from the OpenAI format:
//! - system turns go into a top-level `system_instruction`
//! - roles are `user` / `model`, content is a `parts` array
//! - the API key travels as the `key` query parameter
//! - the reply is the concatenated `text` of every `candidates[0].content.parts`
//!   entry

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use elnchat_core::config::Config;
use elnchat_core::types::{Reply, Role, Transcript};

use crate::error::ProviderError;
use crate::http_provider::send_json;
use crate::registry::ProviderSpec;
use crate::traits::ChatProvider;

pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(
        spec: &'static ProviderSpec,
        config: &Config,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        Ok(GeminiProvider {
            client,
            api_base: spec.resolve_api_base(config)?,
            api_key: config.require_api_key()?.to_string(),
            model: config.require_model()?.to_string(),
            spec,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Build the `generateContent` request body.
fn build_body(transcript: &Transcript) -> Value {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut contents: Vec<Value> = Vec::new();

    for turn in transcript.turns() {
        let role = match turn.role {
            Role::System => {
                system_parts.push(&turn.text);
                continue;
            }
            Role::Human => "user",
            Role::Assistant => "model",
        };
        contents.push(json!({
            "role": role,
            "parts": [{ "text": turn.text }],
        }));
    }

    let mut body = json!({ "contents": contents });
    if !system_parts.is_empty() {
        body["system_instruction"] = json!({
            "parts": [{ "text": system_parts.join("\n\n") }]
        });
    }
    body
}

/// Concatenate the `text` of every part of the first candidate.
///
/// Parts without text (e.g. `functionCall`) are skipped. A candidate with no
/// text at all is malformed.
fn join_text_parts(provider: &'static str, body: &Value) -> Result<Reply, ProviderError> {
    let malformed = |reason: &str| ProviderError::MalformedResponse {
        provider,
        reason: reason.to_string(),
    };

    let parts = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("no reply at '/candidates/0/content/parts'"))?;

    let texts: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        return Err(malformed("candidate has no text parts"));
    }

    Ok(Reply::Text(texts.concat()))
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn send(&self, transcript: &Transcript) -> Result<Reply, ProviderError> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            messages = transcript.len(),
            "Calling LLM"
        );

        let request = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&build_body(transcript));

        let response = send_json(self.spec.display_name, request).await?;
        join_text_parts(self.spec.display_name, &response)
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
