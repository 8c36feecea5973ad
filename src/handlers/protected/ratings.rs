// handlers/protected/ratings.rs - /api/ratings/

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::{KittenStats, Rating};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::RatingService;
use crate::state::AppState;
use crate::validation::WriteMode;

fn service(state: &AppState) -> RatingService {
    RatingService::new(state.store.clone())
}

/// GET /api/ratings/
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Rating>> {
    Ok(ApiResponse::success(service(&state).list().await?))
}

/// POST /api/ratings/ - One rating per user per kitten
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Rating> {
    let Json(body) = body?;
    Ok(ApiResponse::created(service(&state).create(&user, body).await?))
}

/// GET /api/ratings/:id/
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Rating> {
    let Path(id) = id?;
    Ok(ApiResponse::success(service(&state).get(id).await?))
}

/// PUT /api/ratings/:id/ - Author only
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Rating> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(ApiResponse::success(service(&state).update(&user, id, body, WriteMode::Replace).await?))
}

/// PATCH /api/ratings/:id/ - Author only
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Rating> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(ApiResponse::success(service(&state).update(&user, id, body, WriteMode::Partial).await?))
}

/// DELETE /api/ratings/:id/ - Author only
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    service(&state).delete(&user, id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /api/ratings/kitten-stats/:kitten_id/
pub async fn kitten_stats(
    State(state): State<AppState>,
    kitten_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<KittenStats> {
    let Path(kitten_id) = kitten_id?;
    Ok(ApiResponse::success(service(&state).kitten_stats(kitten_id).await?))
}
