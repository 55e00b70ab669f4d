//! Customer handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use shopfront_core::UserId;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::schema::{JsonBody, UserSchema};
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/{id}", get(show).put(update).delete(destroy))
}

fn not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// `POST /users` - create a customer.
///
/// # Errors
///
/// 400 for an invalid body, 409 if the email is taken.
pub async fn create(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<User>)> {
    let input = body.load::<UserSchema>()?;

    let mut tx = state.begin().await?;
    let user = UserRepository::new(&mut tx).create(&input).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users` - list every customer.
///
/// # Errors
///
/// 500 if the store is unavailable.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let mut tx = state.begin().await?;
    let users = UserRepository::new(&mut tx).list().await?;
    tx.commit().await?;

    Ok(Json(users))
}

/// `GET /users/{id}` - fetch one customer.
///
/// # Errors
///
/// 404 if the user doesn't exist.
pub async fn show(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<User>> {
    let mut tx = state.begin().await?;
    let user = UserRepository::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(not_found)?;
    tx.commit().await?;

    Ok(Json(user))
}

/// `PUT /users/{id}` - replace a customer's fields.
///
/// Existence is checked before the body is validated, so an unknown ID is a
/// 404 even when the body is also invalid.
///
/// # Errors
///
/// 404 if the user doesn't exist, 400 for an invalid body, 409 if the email
/// belongs to another user.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    body: JsonBody,
) -> Result<Json<User>> {
    let mut tx = state.begin().await?;
    let mut users = UserRepository::new(&mut tx);

    if users.get_by_id(id).await?.is_none() {
        return Err(not_found());
    }

    let input = body.load::<UserSchema>()?;
    let user = users.update(id, &input).await?;
    tx.commit().await?;

    tracing::info!(user_id = %id, "User updated");
    Ok(Json(user))
}

/// `DELETE /users/{id}` - delete a customer.
///
/// # Errors
///
/// 404 if the user doesn't exist, 409 if they still own orders.
pub async fn destroy(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<Value>> {
    let mut tx = state.begin().await?;
    if !UserRepository::new(&mut tx).delete(id).await? {
        return Err(not_found());
    }
    tx.commit().await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(json!({ "message": format!("Deleted user {id}") })))
}
