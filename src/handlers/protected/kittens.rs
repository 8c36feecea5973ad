// handlers/protected/kittens.rs - /api/kittens/

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Extension, Json,
};
use serde_json::Value;

use crate::database::models::{Kitten, KittenFilter};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::KittenService;
use crate::state::AppState;
use crate::validation::WriteMode;

fn service(state: &AppState) -> KittenService {
    KittenService::new(state.store.clone())
}

/// GET /api/kittens/?breed=<id>
pub async fn list(
    State(state): State<AppState>,
    filter: Result<Query<KittenFilter>, QueryRejection>,
) -> ApiResult<Vec<Kitten>> {
    let Query(filter) = filter?;
    Ok(ApiResponse::success(service(&state).list(filter).await?))
}

/// POST /api/kittens/ - Participants only; the requester becomes the owner
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Kitten> {
    let Json(body) = body?;
    Ok(ApiResponse::created(service(&state).create(&user, body).await?))
}

/// GET /api/kittens/:id/
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Kitten> {
    let Path(id) = id?;
    Ok(ApiResponse::success(service(&state).get(id).await?))
}

/// PUT /api/kittens/:id/ - Owner only
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Kitten> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(ApiResponse::success(service(&state).update(&user, id, body, WriteMode::Replace).await?))
}

/// PATCH /api/kittens/:id/ - Owner only
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Kitten> {
    let Path(id) = id?;
    let Json(body) = body?;
    Ok(ApiResponse::success(service(&state).update(&user, id, body, WriteMode::Partial).await?))
}

/// DELETE /api/kittens/:id/ - Owner only
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    service(&state).delete(&user, id).await?;
    Ok(ApiResponse::no_content())
}
