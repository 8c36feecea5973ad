pub mod auth_service;
pub mod breed_service;
pub mod kitten_service;
pub mod rating_service;
pub mod user_service;

pub use auth_service::{AuthService, LoginPayload, RefreshPayload};
pub use breed_service::BreedService;
pub use kitten_service::KittenService;
pub use rating_service::RatingService;
pub use user_service::UserService;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Deserialize a request body once authorization has passed
pub(crate) fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    if !body.is_object() {
        return Err(ApiError::invalid_json("Request body must be a JSON object"));
    }
    serde_json::from_value(body).map_err(|e| ApiError::invalid_json(format!("Invalid request body: {}", e)))
}

/// Message for a dangling reference, e.g. `breed: 99`
pub(crate) fn missing_reference(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}
