//! Shared types, error model, and configuration for feedcast.
//!
//! This crate is the foundation depended on by all other feedcast crates.
//! It provides:
//! - [`FeedcastError`] — the unified error type
//! - Domain types ([`Document`], [`ReducedDocument`], [`ListPage`], [`SaveRequest`])
//! - Configuration ([`AppConfig`], config loading, secret validation)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OpenRouterConfig, ReaderConfig, ScriptConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, require_env,
};
pub use error::{FeedcastError, Result};
pub use types::{Document, ListPage, ReducedDocument, SaveRequest};
