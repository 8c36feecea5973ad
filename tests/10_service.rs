mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (status, body) = server.send(Method::GET, "/", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Kitten Exhibition API");
    assert!(body["data"]["endpoints"]["kittens"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (status, body) = server.send(Method::GET, "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["storage"], "Memory");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404_without_auth() -> Result<()> {
    let server = common::TestServer::start().await?;
    let res = reqwest::get(server.url("/api/owners/")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
