use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::parse_body;
use crate::auth::hash_password;
use crate::database::models::{NewUser, RegisterPayload, UserProfile};
use crate::database::{constraints, DatabaseError, ExhibitionStore};
use crate::error::ApiError;

pub const DUPLICATE_EMAIL: &str = "user with this email already exists.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// Public account registration
pub struct UserService {
    store: Arc<dyn ExhibitionStore>,
    hash_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn ExhibitionStore>, hash_cost: u32) -> Self {
        Self { store, hash_cost }
    }

    pub async fn register(&self, body: Value) -> Result<UserProfile, ApiError> {
        let registration = parse_body::<RegisterPayload>(body)?.validate()?;

        if self.store.find_user_by_email(&registration.email).await?.is_some() {
            return Err(ApiError::field_error("email", DUPLICATE_EMAIL));
        }

        let password_hash = hash_password(registration.password, self.hash_cost).await?;
        let user = self
            .store
            .insert_user(NewUser {
                username: registration.username,
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
                password_hash,
                role: registration.role,
            })
            .await
            .map_err(|err| match err {
                DatabaseError::UniqueViolation(ref c) if c == constraints::USERS_EMAIL => {
                    ApiError::field_error("email", DUPLICATE_EMAIL)
                }
                DatabaseError::UniqueViolation(ref c) if c == constraints::USERS_USERNAME => {
                    ApiError::field_error("username", DUPLICATE_USERNAME)
                }
                other => other.into(),
            })?;

        info!("Registered user {} ({}) as {}", user.id, user.username, user.role);
        Ok(UserProfile::from(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::config::MIN_HASH_COST;
    use crate::services::test_support;
    use crate::types::Role;
    use axum::http::StatusCode;
    use serde_json::json;

    fn body(username: &str, email: &str) -> Value {
        json!({
            "username": username,
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "password": "testpassword",
            "role": "participant"
        })
    }

    #[tokio::test]
    async fn stores_hashed_password() {
        let store = test_support::store();
        let service = UserService::new(store.clone(), MIN_HASH_COST);

        let profile = service.register(body("testuser", "testuser@example.com")).await.unwrap();
        assert_eq!(profile.role, Role::Participant);

        let stored = store.find_user(profile.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "testpassword");
        assert!(verify_password("testpassword".into(), stored.password_hash).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_and_username() {
        let store = test_support::store();
        let service = UserService::new(store, MIN_HASH_COST);
        service.register(body("first", "first@example.com")).await.unwrap();

        let err = service.register(body("second", "first@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json()["field_errors"]["email"], DUPLICATE_EMAIL);

        let err = service.register(body("first", "other@example.com")).await.unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["username"], DUPLICATE_USERNAME);
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let service = UserService::new(test_support::store(), MIN_HASH_COST);
        let mut payload = body("judge", "judge@example.com");
        payload["role"] = json!("judge");
        let err = service.register(payload).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
