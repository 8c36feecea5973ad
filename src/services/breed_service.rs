use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::parse_body;
use crate::database::models::{Breed, BreedPayload};
use crate::database::ExhibitionStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::permissions::{IsParticipant, Permission};
use crate::validation::WriteMode;

/// Breed catalog. Every action is participant-only.
pub struct BreedService {
    store: Arc<dyn ExhibitionStore>,
}

impl BreedService {
    pub fn new(store: Arc<dyn ExhibitionStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, user: &AuthUser) -> Result<Vec<Breed>, ApiError> {
        IsParticipant.check(Some(user))?;
        Ok(self.store.list_breeds().await?)
    }

    pub async fn get(&self, user: &AuthUser, id: i64) -> Result<Breed, ApiError> {
        IsParticipant.check(Some(user))?;
        self.load(id).await
    }

    pub async fn create(&self, user: &AuthUser, body: Value) -> Result<Breed, ApiError> {
        IsParticipant.check(Some(user))?;
        let input = parse_body::<BreedPayload>(body)?.validate(None, WriteMode::Create)?;
        let breed = self.store.insert_breed(input).await?;
        info!("User {} created breed {} ({})", user.id, breed.id, breed.name);
        Ok(breed)
    }

    pub async fn update(&self, user: &AuthUser, id: i64, body: Value, mode: WriteMode) -> Result<Breed, ApiError> {
        IsParticipant.check(Some(user))?;
        let stored = self.load(id).await?;
        let input = parse_body::<BreedPayload>(body)?.validate(Some(&stored), mode)?;
        Ok(self.store.update_breed(id, input).await?)
    }

    /// Cascades to the breed's kittens and their ratings
    pub async fn delete(&self, user: &AuthUser, id: i64) -> Result<(), ApiError> {
        IsParticipant.check(Some(user))?;
        self.load(id).await?;
        self.store.delete_breed(id).await?;
        info!("User {} deleted breed {}", user.id, id);
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<Breed, ApiError> {
        self.store
            .find_breed(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Breed not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use crate::types::Role;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn participant_manages_breeds() {
        let store = test_support::store();
        let participant = test_support::user(&store, "breeder", Role::Participant).await;
        let service = BreedService::new(store);

        let breed = service.create(&participant, json!({"name": "Siamese"})).await.unwrap();
        assert_eq!(breed.name, "Siamese");

        let renamed = service
            .update(&participant, breed.id, json!({"name": "Persian"}), WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(renamed.name, "Persian");
        assert_eq!(service.list(&participant).await.unwrap().len(), 1);

        service.delete(&participant, breed.id).await.unwrap();
        let err = service.get(&participant, breed.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn visitors_are_forbidden_everywhere() {
        let store = test_support::store();
        let visitor = test_support::user(&store, "visitor", Role::Visitor).await;
        let service = BreedService::new(store.clone());

        let err = service.list(&visitor).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = service.create(&visitor, json!({"name": "Siamese"})).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(store.list_breeds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let store = test_support::store();
        let participant = test_support::user(&store, "breeder", Role::Participant).await;
        let service = BreedService::new(store);

        let err = service.create(&participant, json!({"name": "  "})).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json()["field_errors"]["name"], "This field may not be blank.");
    }
}
