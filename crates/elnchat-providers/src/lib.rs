//! LLM provider layer for elnchat.
//!
//! # Architecture
//!
//! - [`traits::ChatProvider`] - the single `send(transcript)` capability
//! - [`registry`] - static specs for the supported providers + selection
//! - [`http_provider::HttpProvider`] - OpenAI-compatible and Azure chat completions
//! - [`ollama::OllamaProvider`] - local Ollama server
//! - [`gemini::GeminiProvider`] - Google Gemini `generateContent`

pub mod error;
pub mod gemini;
pub mod http_provider;
pub mod ollama;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use error::ProviderError;
pub use registry::{find_by_name, select_provider, ProviderSpec, WireStyle, PROVIDERS};
pub use traits::ChatProvider;
