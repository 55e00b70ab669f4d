//! Database operations for the API `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Customers (email is UNIQUE)
//! - `products` - Catalog items (price is NUMERIC, CHECK >= 0)
//! - `orders` - Purchase orders (FK `user_id` -> `users`, ON DELETE RESTRICT)
//! - `order_product` - Order/product membership, composite primary key,
//!   cascades from both sides
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/`, are embedded into the binary,
//! and run at server startup. They can also be run on their own via:
//! ```bash
//! cargo run -p shopfront-cli -- migrate
//! ```
//!
//! # Transactions
//!
//! Repositories borrow a `&mut PgConnection`, normally the request's
//! transaction. A transaction that is dropped without `commit()` rolls back,
//! so an early `?` return never leaves partial writes behind.

pub mod order_products;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use order_products::OrderProductRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, row still referenced).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create the tables if they do not exist yet.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history
/// disagrees with the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Which kind of constraint a database error tripped, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
}

/// Classify a sqlx error as a constraint violation.
pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.is_unique_violation() {
        Some(Violation::Unique)
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey)
    } else {
        None
    }
}
