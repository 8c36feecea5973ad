// handlers/public/register.rs - POST /api/register/

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;

/**
 * POST /api/register/ - Create an account
 *
 * Expected Input:
 * ```json
 * {
 *   "username": "string",      // Required, unique
 *   "first_name": "string",    // Required, may be blank
 *   "last_name": "string",     // Required, may be blank
 *   "email": "string",         // Required, unique
 *   "password": "string",      // Required, stored as a bcrypt hash
 *   "role": "participant"      // Optional: participant | visitor (default)
 * }
 * ```
 *
 * Returns 201 with the profile; the password is never echoed back.
 */
pub async fn register_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(body) = body?;
    let service = UserService::new(state.store.clone(), state.config.security.password_hash_cost);
    let profile = service.register(body).await?;
    Ok(ApiResponse::created(profile))
}
