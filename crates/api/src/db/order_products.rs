//! Order/product association repository.
//!
//! Rows of `order_product` record which products are on which order. The
//! `(order_id, product_id)` primary key guarantees a product appears on an
//! order at most once; two racing inserts of the same pair leave one row and
//! the loser sees a unique violation.

use sqlx::PgConnection;

use shopfront_core::{OrderId, ProductId};

use super::products::ProductRow;
use super::{RepositoryError, Violation, violation};
use crate::models::Product;

/// Repository for order/product membership.
pub struct OrderProductRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> OrderProductRepository<'a> {
    /// Create a new association repository on an open connection or transaction.
    #[must_use]
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Whether the product is already on the order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM order_product
                WHERE order_id = $1 AND product_id = $2
            )
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(exists)
    }

    /// Put a product on an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the pair already exists.
    /// Returns `RepositoryError::InvalidReference` if either side doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO order_product (order_id, product_id)
            VALUES ($1, $2)
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => {
                RepositoryError::Conflict("Product already in order".to_owned())
            }
            Some(Violation::ForeignKey) => RepositoryError::InvalidReference(format!(
                "Order {order_id} or product {product_id} does not exist"
            )),
            None => RepositoryError::Database(e),
        })?;

        Ok(())
    }

    /// Take a product off an order.
    ///
    /// # Returns
    ///
    /// Returns `true` if the pair was removed, `false` if it wasn't there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &mut self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM order_product
            WHERE order_id = $1 AND product_id = $2
            ",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List the products on an order, by product ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&mut self, order_id: OrderId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.product_name, p.price
            FROM order_product op
            INNER JOIN products p ON p.id = op.product_id
            WHERE op.order_id = $1
            ORDER BY p.id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Number of products on an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&mut self, order_id: OrderId) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_product WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(&mut *self.conn)
                .await?;

        Ok(count)
    }
}
