use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::models::User;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /users - register an account
///
/// The password is hashed before it reaches the store; a duplicate username
/// surfaces as 409.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    let mut missing = Vec::new();
    if payload.username.is_none() {
        missing.push("username".to_string());
    }
    if payload.password.is_none() {
        missing.push("password".to_string());
    }

    let (username, password) = match (payload.username, payload.password) {
        (Some(username), Some(password)) => (username, password),
        _ => return Err(ApiError::missing_fields(missing)),
    };

    let user = state
        .users
        .create(&username, &hash_password(&password))
        .await?;

    Ok(ApiResponse::created(user))
}
