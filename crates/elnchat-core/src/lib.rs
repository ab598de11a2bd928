//! Core types and configuration shared by all elnchat crates.
//!
//! - [`config`] - typed `API_*` environment configuration
//! - [`types`] - transcript, roles and reply normalization

pub mod config;
pub mod types;

pub use config::{load_config, Config, ConfigError};
pub use types::{Reply, ReplyError, Role, Transcript, Turn};
