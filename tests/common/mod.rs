use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use goal_keeper_api::{app, AppState};

pub const TEST_USER: &str = "testUser";
pub const TEST_PASSWORD: &str = "123";

/// Router over fresh in-memory stores; each test owns its own state.
pub fn test_app() -> Router {
    app(AppState::in_memory())
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}

/// Drive one request through the router and decode the JSON body (Null when
/// the response has no body, e.g. 204).
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        // Default extractor rejections (e.g. Path<Uuid> on a malformed id)
        // produce plain-text bodies; surface those as a JSON string so the
        // status can still be asserted.
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    Ok((status, value))
}

pub async fn register(app: &Router, username: &str, password: &str) -> Result<()> {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "registration failed: {} {}",
        status,
        body
    );
    Ok(())
}

/// Register the standard test user and hand back its auth header value.
pub async fn seed_test_user(app: &Router) -> Result<String> {
    register(app, TEST_USER, TEST_PASSWORD).await?;
    Ok(basic_auth(TEST_USER, TEST_PASSWORD))
}

/// Create a goal and return its `data` object.
pub async fn create_goal(app: &Router, auth: &str, title: &str, color: &str) -> Result<Value> {
    let (status, body) = send(
        app,
        "POST",
        "/goals",
        Some(auth),
        Some(json!({"title": title, "color": color})),
    )
    .await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "goal creation failed: {} {}",
        status,
        body
    );
    Ok(body["data"].clone())
}
