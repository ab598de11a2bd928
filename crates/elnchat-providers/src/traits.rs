//! Chat provider trait - the one capability the rest of elnchat depends on.

use async_trait::async_trait;
use elnchat_core::types::{Reply, Transcript};

use crate::error::ProviderError;

/// A chat client bound to one vendor, model and set of credentials.
#[async_trait]
pub trait ChatProvider: Send + Sync + std::fmt::Debug {
    /// Perform exactly one round trip with the whole transcript.
    ///
    /// Failures propagate; nothing is retried.
    async fn send(&self, transcript: &Transcript) -> Result<Reply, ProviderError>;

    /// Registry name (e.g. `"openai"`), used in the proof file name.
    fn name(&self) -> &str;

    /// Model identifier, recorded in the proof body.
    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
