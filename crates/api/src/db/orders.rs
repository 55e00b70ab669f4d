//! Order repository for database operations.

use chrono::NaiveDateTime;
use sqlx::PgConnection;

use shopfront_core::{OrderId, UserId};

use super::{RepositoryError, Violation, violation};
use crate::models::{Order, OrderInput};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_date: NaiveDateTime,
    user_id: i32,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            order_date: row.order_date,
            user_id: UserId::new(row.user_id),
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository on an open connection or transaction.
    #[must_use]
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a new order with no products.
    ///
    /// The owning user is not looked up first; the foreign key decides.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&mut self, input: &OrderInput) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (order_date, user_id)
            VALUES (COALESCE($1, LOCALTIMESTAMP), $2)
            RETURNING id, order_date, user_id
            ",
        )
        .bind(input.order_date)
        .bind(input.user_id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::ForeignKey) => {
                RepositoryError::InvalidReference(format!("User {} does not exist", input.user_id))
            }
            _ => RepositoryError::Database(e),
        })?;

        Ok(row.into())
    }

    /// List every order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&mut self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_date, user_id
            FROM orders
            ORDER BY id ASC
            ",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the orders owned by a user. Unknown users simply have none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&mut self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_date, user_id
            FROM orders
            WHERE user_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&mut self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_date, user_id
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Check whether an order exists without loading it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&mut self, id: OrderId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(exists)
    }

    /// Delete an order. Its product memberships are removed with it.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&mut self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
