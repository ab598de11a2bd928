//! Ollama provider - local model server, `POST {base}/api/chat`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use elnchat_core::config::Config;
use elnchat_core::types::{Reply, Transcript};

use crate::error::ProviderError;
use crate::http_provider::{extract_reply, send_json, wire_messages, WireMessage};
use crate::registry::ProviderSpec;
use crate::traits::ChatProvider;

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

/// Client for an Ollama server. No authentication.
pub struct OllamaProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for OllamaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl OllamaProvider {
    pub fn new(
        spec: &'static ProviderSpec,
        config: &Config,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        Ok(OllamaProvider {
            client,
            endpoint: spec.resolve_api_base(config)?,
            model: config.require_model()?.to_string(),
            spec,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    async fn send(&self, transcript: &Transcript) -> Result<Reply, ProviderError> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            endpoint = %self.endpoint,
            "Calling LLM"
        );

        let body = OllamaChatRequest {
            model: &self.model,
            messages: wire_messages(transcript),
            stream: false,
        };

        let request = self.client.post(self.chat_url()).json(&body);
        let response = send_json(self.spec.display_name, request).await?;
        extract_reply(self.spec.display_name, response, "/message")
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
