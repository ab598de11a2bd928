//! Configuration - typed `API_*` settings read once from the environment.
//!
//! # Usage
//! ```no_run
//! use elnchat_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Provider: {:?}", cfg.provider);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{load_config, ENV_KEYS};
pub use schema::{Config, ConfigError};
