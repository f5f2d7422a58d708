//! CLI subcommand implementations.

pub mod errors;
pub mod record;
pub mod replay;
pub mod status;

use anyhow::{Context, Result};
use ia_core::ApiKey;
use ia_db::Database;

use crate::Config;

/// Opens the configured database, ensuring the parent directory exists.
pub fn open_database(config: &Config) -> Result<Database> {
    let parent = config
        .database_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// The configured API key. Recording commands cannot run without one.
fn api_key(config: &Config) -> Result<ApiKey> {
    let key = config
        .api_key
        .as_deref()
        .context("no API key configured (set IA_API_KEY or api_key in config.toml)")?;
    ApiKey::new(key).context("invalid API key")
}
