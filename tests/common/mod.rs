#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use kitten_exhibition_api::config::AppConfig;
use kitten_exhibition_api::database::{ExhibitionStore, MemoryStore};
use kitten_exhibition_api::{app, AppState};

/// The real router served on an ephemeral port over a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<dyn ExhibitionStore>,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let store: Arc<dyn ExhibitionStore> = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), AppConfig::for_tests())?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            store,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return status plus parsed body (`Null` for empty bodies)
    pub async fn send(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).with_context(|| format!("non-JSON body: {}", text))?
        };
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, Some(token), None).await
    }

    pub async fn register(&self, username: &str, role: &str) -> Result<(StatusCode, Value)> {
        let body = json!({
            "username": username,
            "first_name": "Test",
            "last_name": "User",
            "email": format!("{}@example.com", username),
            "password": "testpassword",
            "role": role,
        });
        self.send(Method::POST, "/api/register/", None, Some(body)).await
    }

    /// Register a user and return an access token for it
    pub async fn user_token(&self, username: &str, role: &str) -> Result<String> {
        let (status, body) = self.register(username, role).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);

        let (status, body) = self
            .send(
                Method::POST,
                "/api/token/",
                None,
                Some(json!({"email": format!("{}@example.com", username), "password": "testpassword"})),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

        body["data"]["access"]
            .as_str()
            .map(str::to_string)
            .context("missing access token")
    }

    pub async fn create_breed(&self, token: &str, name: &str) -> Result<i64> {
        let (status, body) = self.post("/api/breeds/", token, json!({"name": name})).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create breed failed: {} {}", status, body);
        body["data"]["id"].as_i64().context("missing breed id")
    }

    pub async fn create_kitten(&self, token: &str, breed: i64, description: &str) -> Result<i64> {
        let (status, body) = self
            .post(
                "/api/kittens/",
                token,
                json!({
                    "color": "Black",
                    "name": "Whiskers",
                    "age": 2,
                    "description": description,
                    "breed": breed,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create kitten failed: {} {}", status, body);
        body["data"]["id"].as_i64().context("missing kitten id")
    }

    pub async fn create_rating(&self, token: &str, kitten: i64, score: i64) -> Result<(StatusCode, Value)> {
        self.post("/api/ratings/", token, json!({"kitten": kitten, "score": score, "comment": "Nice"}))
            .await
    }
}
