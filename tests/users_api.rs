mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{send, test_app};

#[tokio::test]
async fn registration_returns_account_without_hash() -> Result<()> {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({"username": "illy", "password": "123"})),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "illy");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());

    Ok(())
}

#[tokio::test]
async fn duplicate_username_conflicts() -> Result<()> {
    let app = test_app();
    common::register(&app, "illy", "123").await?;

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({"username": "illy", "password": "other"})),
    )
    .await?;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    Ok(())
}

#[tokio::test]
async fn registration_validates_required_fields() -> Result<()> {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/users", None, Some(json!({}))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["username"], "This field is required");
    assert_eq!(body["field_errors"]["password"], "This field is required");

    Ok(())
}

#[tokio::test]
async fn registered_credentials_grant_access() -> Result<()> {
    let app = test_app();
    common::register(&app, "illy", "123").await?;

    let auth = common::basic_auth("illy", "123");
    let (status, body) = send(&app, "GET", "/goals", Some(&auth), None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    Ok(())
}

#[tokio::test]
async fn health_and_banner_are_public() -> Result<()> {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = send(&app, "GET", "/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Goal Keeper API");

    Ok(())
}
