// handlers/public/token.rs - Token acquisition

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::auth::{AccessToken, TokenPair};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;

/// POST /api/token/ - `{ email, password }` → `{ access, refresh }`
pub async fn token_obtain(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TokenPair> {
    let Json(body) = body?;
    let pair = AuthService::new(state.store.clone(), state.tokens.clone()).login(body).await?;
    Ok(ApiResponse::success(pair))
}

/// POST /api/token/refresh/ - `{ refresh }` → `{ access }`
pub async fn token_refresh(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AccessToken> {
    let Json(body) = body?;
    let access = AuthService::new(state.store.clone(), state.tokens.clone()).refresh(body).await?;
    Ok(ApiResponse::success(access))
}
