//! `elnchat status` - show configuration and provider status.
//!
//! - Shows each `API_*` variable (the key only as set / not set)
//! - Lists the known providers, marking the selected one and what it still needs

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use elnchat_core::config::{load_config, Config};
use elnchat_providers::registry::{find_by_name, ProviderSpec, PROVIDERS};

use crate::helpers::mark;

/// Run the status command.
pub fn run(env_file: Option<&Path>) -> Result<()> {
    let config = load_config(env_file);

    println!();
    println!("{}", "elnchat status".cyan().bold());
    println!();

    print_value("API_PROVIDER:", config.provider.as_deref());
    print_value("API_MODEL:", config.model.as_deref());
    println!("  {:<18} {}", "API_KEY:".bold(), mark(config.has_api_key()));
    print_value("API_ENDPOINT:", config.endpoint.as_deref());
    print_value("API_VERSION:", config.api_version.as_deref());

    println!();
    println!("  {}", "Providers:".bold());
    let selected = config.provider_name();

    for spec in PROVIDERS {
        let status = if selected.as_deref() == Some(spec.name) {
            let missing = missing_keys(spec, &config);
            if missing.is_empty() {
                format!("{} selected", "✓".green())
            } else {
                format!("{} selected, missing {}", "✗".red(), missing.join(", "))
            }
        } else {
            format!("{}", "·".dimmed())
        };
        println!("    {:<8} {:<14} {}", spec.name, spec.display_name, status);
    }

    if let Some(name) = &selected {
        if find_by_name(name).is_none() {
            println!();
            println!("  {} unknown provider '{}'", "✗".red(), name);
        }
    }

    println!();
    Ok(())
}

fn print_value(label: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {:<18} {}", label.bold(), v),
        None => println!("  {:<18} {}", label.bold(), mark(false)),
    }
}

/// Required variables of `spec` not present in `config`.
fn missing_keys(spec: &ProviderSpec, config: &Config) -> Vec<&'static str> {
    spec.required_keys()
        .into_iter()
        .filter(|key| match *key {
            "API_MODEL" => config.model.is_none(),
            "API_KEY" => config.api_key.is_none(),
            "API_ENDPOINT" => config.endpoint.is_none(),
            "API_VERSION" => config.api_version.is_none(),
            _ => false,
        })
        .collect()
}
