//! elnchat CLI - entry point.
//!
//! # Commands
//!
//! - `elnchat run [--mode overwrite|append] [--proof-dir DIR] [--actor NAME]`:
//!   ask the configured provider the tutorial question and record the proof
//! - `elnchat status` - show configuration and known providers
//! - `elnchat proof-name --provider NAME` - print the proof file name offline

mod helpers;
mod proof_name;
mod run;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use elnchat_proof::{WriteMode, DEFAULT_PROOF_DIR};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// elnchat - ask an LLM the electronic-lab-notebook tutorial question
#[derive(Parser)]
#[command(name = "elnchat", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the tutorial conversation once and record a proof file
    Run {
        /// How an existing proof file is treated
        #[arg(long, value_enum, default_value_t = ModeArg::Overwrite)]
        mode: ModeArg,

        /// Directory the proof file is written to (must exist)
        #[arg(long, default_value = DEFAULT_PROOF_DIR)]
        proof_dir: PathBuf,

        /// Actor identity (default: `git config user.name`)
        #[arg(long)]
        actor: Option<String>,

        /// Load variables from this file instead of `./.env`
        #[arg(long)]
        env_file: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and provider status
    Status {
        /// Load variables from this file instead of `./.env`
        #[arg(long)]
        env_file: Option<PathBuf>,
    },

    /// Print the proof file name for the tutorial conversation
    ProofName {
        /// Provider identifier (e.g. "openai")
        #[arg(long)]
        provider: String,

        /// Actor identity (default: `git config user.name`)
        #[arg(long)]
        actor: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Overwrite,
    Append,
}

impl From<ModeArg> for WriteMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Overwrite => WriteMode::Overwrite,
            ModeArg::Append => WriteMode::Append,
        }
    }
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            mode,
            proof_dir,
            actor,
            env_file,
            logs,
        } => {
            init_logging(logs);
            run::run(run::RunOptions {
                mode: mode.into(),
                proof_dir,
                actor,
                env_file,
            })
            .await
        }
        Commands::Status { env_file } => {
            init_logging(false);
            status::run(env_file.as_deref())
        }
        Commands::ProofName { provider, actor } => {
            init_logging(false);
            proof_name::run(&provider, actor).await
        }
    }
}

/// Initialize tracing/logging (stderr; stdout carries the reply).
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("elnchat=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
