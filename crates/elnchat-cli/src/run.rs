//! `elnchat run` - one request, one printed reply, one proof record.
//!
//! Order: config → provider selection → actor identity → send → record.
//! Any failure ends the run; nothing is retried.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use elnchat_core::config::load_config;
use elnchat_core::types::Transcript;
use elnchat_proof::{
    CommandIdentity, IdentitySource, ProofEntry, ProofRecorder, StaticIdentity, WriteMode,
};
use elnchat_providers::{select_provider, ChatProvider};

use crate::helpers;

pub struct RunOptions {
    pub mode: WriteMode,
    pub proof_dir: PathBuf,
    pub actor: Option<String>,
    pub env_file: Option<PathBuf>,
}

/// Result of one tutorial exchange.
#[derive(Debug, PartialEq)]
pub struct Outcome {
    pub reply: String,
    pub proof_file: String,
}

pub async fn run(opts: RunOptions) -> Result<()> {
    let config = load_config(opts.env_file.as_deref());
    let provider = select_provider(&config).context("provider selection failed")?;

    let identity: Box<dyn IdentitySource> = match opts.actor {
        Some(actor) => Box::new(StaticIdentity(actor)),
        None => Box::new(CommandIdentity::git()),
    };
    let recorder = ProofRecorder::new(opts.proof_dir);

    let outcome = exchange(
        provider.as_ref(),
        identity.as_ref(),
        &recorder,
        &Transcript::tutorial(),
        opts.mode,
    )
    .await?;

    helpers::print_proof(&recorder.path_for(&outcome.proof_file));
    Ok(())
}

/// Send `transcript` once, print the reply and record the proof.
pub async fn exchange(
    provider: &dyn ChatProvider,
    identity: &dyn IdentitySource,
    recorder: &ProofRecorder,
    transcript: &Transcript,
    mode: WriteMode,
) -> Result<Outcome> {
    let actor = identity
        .lookup()
        .await
        .context("actor identity lookup failed")?;

    info!(
        provider = provider.display_name(),
        model = provider.model(),
        actor = %actor,
        "Sending conversation"
    );

    let reply = provider
        .send(transcript)
        .await
        .with_context(|| format!("{} request failed", provider.display_name()))?
        .into_text()
        .context("reply normalization failed")?;

    helpers::print_response(&reply);

    let entry = ProofEntry {
        actor: &actor,
        provider: provider.name(),
        model: provider.model(),
        transcript,
        reply: &reply,
    };
    let proof_file = recorder
        .record(&entry, mode)
        .context("failed to record proof")?;

    Ok(Outcome { reply, proof_file })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
