use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{parse_basic_auth, verify_password};
use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller identity extracted from basic-auth credentials.
/// Handlers take the owner from here; there is no fallback default user.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// Basic-auth middleware: decodes the Authorization header, verifies the
/// credentials against the user store, and injects `AuthUser` into the
/// request extensions.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    let credentials = parse_basic_auth(header).map_err(ApiError::unauthorized)?;

    let user = state
        .users
        .find(&credentials.username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    if !verify_password(&user.password_hash, &credentials.password) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}
