//! Integration test helpers for the Shopfront API.
//!
//! # Running Tests
//!
//! ```bash
//! # Repository tests against a scratch database
//! SHOPFRONT_TEST_DATABASE_URL=postgres://localhost/shopfront_test \
//!     cargo test -p shopfront-integration-tests -- --ignored repositories
//!
//! # HTTP tests against a running server
//! cargo run -p shopfront-api &
//! cargo test -p shopfront-integration-tests -- --ignored api_
//! ```
//!
//! Repository tests run inside a transaction that is never committed, so
//! they leave the database as they found it. HTTP tests create their own
//! rows with unique emails and clean up after themselves where they can.

use reqwest::Client;
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL for the API under test (configurable via `SHOPFRONT_BASE_URL`).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOPFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Build an absolute URL for a path on the API under test.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// HTTP client for the API under test.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address no other test run will use.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@example.com", Uuid::new_v4().simple())
}

/// Connect to the test database and bring its schema up to date.
///
/// Reads `SHOPFRONT_TEST_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// # Panics
///
/// Panics if no URL is configured, the database is unreachable, or a
/// migration fails.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("SHOPFRONT_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("SHOPFRONT_TEST_DATABASE_URL or DATABASE_URL must be set");

    let pool = shopfront_api::db::create_pool(&SecretString::from(url), 2)
        .await
        .expect("Failed to connect to test database");
    shopfront_api::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
