//! Config loader - seeds the environment from a `.env` file, then reads the
//! `API_*` variables.
//!
//! # Loading precedence
//! 1. Variables already set in the process environment
//! 2. `.env` file (explicit path, or `./.env`) - never overrides (1)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, API_ENDPOINT, API_KEY, API_MODEL, API_PROVIDER, API_VERSION};

/// All environment variables the config reads.
pub const ENV_KEYS: &[&str] = &[API_PROVIDER, API_MODEL, API_KEY, API_ENDPOINT, API_VERSION];

/// Load configuration from the process environment, optionally seeded from a
/// `.env` file.
///
/// A missing `.env` file is not an error.
pub fn load_config(dotenv_path: Option<&Path>) -> Config {
    load_dotenv(dotenv_path);
    let config = Config::from_lookup(|key| std::env::var(key).ok());
    debug!(?config, "Configuration loaded");
    config
}

/// What happened to the `.env` file.
#[derive(Debug, PartialEq)]
enum DotenvOutcome {
    Loaded(PathBuf),
    NotFound,
    Invalid,
}

fn load_dotenv(path: Option<&Path>) -> DotenvOutcome {
    let result = match path {
        Some(p) => dotenvy::from_path(p).map(|_| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match result {
        Ok(p) => {
            info!("Loaded environment from {}", p.display());
            DotenvOutcome::Loaded(p)
        }
        Err(e) if e.not_found() => {
            debug!("No .env file found");
            DotenvOutcome::NotFound
        }
        Err(e) => {
            warn!("Failed to load .env file: {}", e);
            DotenvOutcome::Invalid
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_env(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_from_dotenv_file() {
        // Only API_VERSION is touched here so parallel tests don't collide.
        std::env::remove_var("API_VERSION");
        let file = write_temp_env("API_VERSION=2024-02-15-preview\n");

        let config = load_config(Some(file.path()));
        assert_eq!(config.api_version.as_deref(), Some("2024-02-15-preview"));
        std::env::remove_var("API_VERSION");
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let missing = Path::new("/nonexistent/path/.env");
        assert_eq!(load_dotenv(Some(missing)), DotenvOutcome::NotFound);

        // API_MODEL is only ever set by this test.
        std::env::set_var("API_MODEL", "model-from-env");
        let config = load_config(Some(missing));
        assert_eq!(config.model.as_deref(), Some("model-from-env"));
        std::env::remove_var("API_MODEL");
    }

    #[test]
    fn test_dotenv_never_overrides_environment() {
        // API_ENDPOINT is only ever set by this test.
        std::env::set_var("API_ENDPOINT", "from-env");
        let file = write_temp_env("API_ENDPOINT=from-file\n");

        let config = load_config(Some(file.path()));
        assert_eq!(config.endpoint.as_deref(), Some("from-env"));
        std::env::remove_var("API_ENDPOINT");
    }

    #[test]
    fn test_invalid_dotenv_is_reported() {
        let file = write_temp_env("this is not a dotenv line\n");
        assert_eq!(load_dotenv(Some(file.path())), DotenvOutcome::Invalid);
    }

    #[test]
    fn test_env_keys_complete() {
        assert_eq!(ENV_KEYS.len(), 5);
        assert!(ENV_KEYS.contains(&"API_PROVIDER"));
        assert!(ENV_KEYS.contains(&"API_VERSION"));
    }
}
