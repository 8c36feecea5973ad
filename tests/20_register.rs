mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn register_returns_profile_without_password() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (status, body) = server.register("testuser", "participant").await?;

    assert_eq!(status, StatusCode::CREATED);
    let user = &body["data"];
    assert_eq!(user["username"], "testuser");
    assert_eq!(user["email"], "testuser@example.com");
    assert_eq!(user["role"], "participant");
    assert!(user.get("password").is_none());

    let id = user["id"].as_i64().unwrap();
    let stored = server.store.find_user(id).await?.expect("stored user");
    assert_ne!(stored.password_hash, "testpassword");
    assert!(bcrypt::verify("testpassword", &stored.password_hash)?);
    Ok(())
}

#[tokio::test]
async fn role_defaults_to_visitor() -> Result<()> {
    let server = common::TestServer::start().await?;
    let body = json!({
        "username": "plain",
        "first_name": "",
        "last_name": "",
        "email": "plain@example.com",
        "password": "pw"
    });
    let (status, body) = server.send(Method::POST, "/api/register/", None, Some(body)).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "visitor");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let server = common::TestServer::start().await?;
    server.register("first", "visitor").await?;

    let body = json!({
        "username": "second",
        "first_name": "A",
        "last_name": "B",
        "email": "first@example.com",
        "password": "pw"
    });
    let (status, body) = server.send(Method::POST, "/api/register/", None, Some(body)).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_reported() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (status, body) = server
        .send(Method::POST, "/api/register/", None, Some(json!({"username": "x"})))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["email", "password", "first_name", "last_name"] {
        assert_eq!(body["field_errors"][field], "This field is required.", "field {}", field);
    }
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400() -> Result<()> {
    let server = common::TestServer::start().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/register/"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}
