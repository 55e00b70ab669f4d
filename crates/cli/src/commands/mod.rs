//! CLI subcommands.

pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

use shopfront_api::config::{ApiConfig, ConfigError};
use shopfront_api::db::{self, RepositoryError};

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid seed data: {0}")]
    InvalidInput(String),
}

/// Load the API configuration and open a small pool.
async fn connect() -> Result<PgPool, CommandError> {
    let config = ApiConfig::from_env()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url, 2).await?)
}
