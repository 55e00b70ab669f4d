//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgConnection;

use shopfront_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::{Product, ProductInput};

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProductRow {
    id: i32,
    product_name: String,
    price: Decimal,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            product_name: row.product_name,
            price,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository on an open connection or transaction.
    #[must_use]
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&mut self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (product_name, price)
            VALUES ($1, $2)
            RETURNING id, product_name, price
            ",
        )
        .bind(&input.product_name)
        .bind(input.price)
        .fetch_one(&mut *self.conn)
        .await?;

        row.try_into()
    }

    /// List every product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&mut self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, product_name, price
            FROM products
            ORDER BY id ASC
            ",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, product_name, price
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Replace the name and price of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &mut self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET product_name = $2, price = $3
            WHERE id = $1
            RETURNING id, product_name, price
            ",
        )
        .bind(id)
        .bind(&input.product_name)
        .bind(input.price)
        .fetch_optional(&mut *self.conn)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a product. Its order memberships are removed with it.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&mut self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
