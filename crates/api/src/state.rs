//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::{PgPool, Postgres, Transaction};

use crate::config::ApiConfig;
use crate::db::RepositoryError;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The pool is the only shared
/// resource; handlers never share a connection, they each open their own
/// transaction with [`AppState::begin`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Open a request-scoped transaction.
    ///
    /// The caller commits on success; dropping the transaction on any other
    /// path rolls it back and returns the connection to the pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if no connection can be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        Ok(self.inner.pool.begin().await?)
    }
}
