//! User repository for database operations.

use sqlx::PgConnection;

use shopfront_core::{Email, UserId};

use super::{RepositoryError, Violation, violation};
use crate::models::{User, UserInput};

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    address: Option<String>,
    email: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            address: row.address,
            email,
        })
    }
}

/// Map a write error on `users`, turning a duplicate email into a conflict.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    match violation(&err) {
        Some(Violation::Unique) => RepositoryError::Conflict("email already exists".to_owned()),
        _ => RepositoryError::Database(err),
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository on an open connection or transaction.
    #[must_use]
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&mut self, input: &UserInput) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, address, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, address, email
            ",
        )
        .bind(&input.name)
        .bind(input.address.as_deref())
        .bind(&input.email)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    /// List every user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list(&mut self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, address, email
            FROM users
            ORDER BY id ASC
            ",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&mut self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, address, email
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Replace every field of an existing user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&mut self, id: UserId, input: &UserInput) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users
            SET name = $2, address = $3, email = $4
            WHERE id = $1
            RETURNING id, name, address, email
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.address.as_deref())
        .bind(&input.email)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(map_write_error)?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a user.
    ///
    /// Orders are not deleted along with their owner.
    ///
    /// # Returns
    ///
    /// Returns `true` if the user was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user still owns orders.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&mut self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::ForeignKey) => {
                    RepositoryError::Conflict(format!("User {id} still has orders"))
                }
                _ => RepositoryError::Database(e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}
