//! Database migration command.
//!
//! Applies the migrations embedded in the API crate
//! (`crates/api/migrations/`). The server applies the same set at startup;
//! this command exists for deploys that migrate ahead of the rollout.

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    shopfront_api::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
