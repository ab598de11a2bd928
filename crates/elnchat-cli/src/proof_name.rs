//! `elnchat proof-name` - compute the proof file name without a request.

use anyhow::{Context, Result};

use elnchat_core::types::Transcript;
use elnchat_proof::{proof_file_name, CommandIdentity, IdentitySource};
use elnchat_providers::{find_by_name, ProviderError};

pub async fn run(provider: &str, actor: Option<String>) -> Result<()> {
    let spec = find_by_name(provider).ok_or_else(|| ProviderError::Unconfigured {
        name: Some(provider.to_string()),
    })?;

    let actor = match actor {
        Some(actor) => actor,
        None => CommandIdentity::git()
            .lookup()
            .await
            .context("actor identity lookup failed")?,
    };

    println!("{}", proof_file_name(&actor, spec.name, &Transcript::tutorial()));
    Ok(())
}
