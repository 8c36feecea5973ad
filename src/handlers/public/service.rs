// handlers/public/service.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service name, version and endpoint map
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Kitten Exhibition API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "register": "/api/register/ (public)",
                "token": "/api/token/, /api/token/refresh/ (public - token acquisition)",
                "breeds": "/api/breeds/[:id/] (participants)",
                "kittens": "/api/kittens/[:id/] (protected, ?breed=<id>)",
                "ratings": "/api/ratings/[:id/] (protected)",
                "kitten_stats": "/api/ratings/kitten-stats/:kitten_id/ (protected)",
            }
        }
    }))
}

/// GET /health - Pings the store
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.config.database.backend;

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": backend,
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "Database temporarily unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "storage": backend,
                    }
                })),
            )
        }
    }
}
