// handlers/protected/breeds.rs - /api/breeds/ (participant-only)

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::Breed;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::BreedService;
use crate::state::AppState;
use crate::validation::WriteMode;

fn service(state: &AppState) -> BreedService {
    BreedService::new(state.store.clone())
}

/// GET /api/breeds/
pub async fn list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Breed>> {
    Ok(ApiResponse::success(service(&state).list(&user).await?))
}

/// POST /api/breeds/
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Breed> {
    let Json(body) = body?;
    Ok(ApiResponse::created(service(&state).create(&user, body).await?))
}

/// GET /api/breeds/:id/
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Breed> {
    let Path(id) = id?;
    Ok(ApiResponse::success(service(&state).get(&user, id).await?))
}

/// PUT /api/breeds/:id/
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Breed> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(ApiResponse::success(service(&state).update(&user, id, body, WriteMode::Replace).await?))
}

/// PATCH /api/breeds/:id/
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Breed> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(ApiResponse::success(service(&state).update(&user, id, body, WriteMode::Partial).await?))
}

/// DELETE /api/breeds/:id/ - Cascades to kittens and their ratings
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    service(&state).delete(&user, id).await?;
    Ok(ApiResponse::no_content())
}
