use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::{missing_reference, parse_body};
use crate::database::models::{Kitten, KittenFilter, KittenInput, KittenPayload};
use crate::database::{constraints, DatabaseError, ExhibitionStore};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::permissions::{ensure_owner, IsParticipant, Permission, WithMessage};
use crate::validation::WriteMode;

pub const CREATE_DENIED: &str = "You do not have permission to add kittens.";
pub const UPDATE_DENIED: &str = "You do not have permission to modify this kitten.";
pub const DELETE_DENIED: &str = "You do not have permission to delete this kitten.";
pub const DUPLICATE_DESCRIPTION: &str = "A kitten with this description already exists.";

/// Kitten listings. Participants create; only the owner mutates.
pub struct KittenService {
    store: Arc<dyn ExhibitionStore>,
}

impl KittenService {
    pub fn new(store: Arc<dyn ExhibitionStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: KittenFilter) -> Result<Vec<Kitten>, ApiError> {
        Ok(self.store.list_kittens(filter).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Kitten, ApiError> {
        self.load(id).await
    }

    /// The requester becomes the owner
    pub async fn create(&self, user: &AuthUser, body: Value) -> Result<Kitten, ApiError> {
        WithMessage { inner: IsParticipant, message: CREATE_DENIED }.check(Some(user))?;

        let input = parse_body::<KittenPayload>(body)?.validate(None, WriteMode::Create)?;
        self.check_references(&input, None).await?;

        let kitten = self
            .store
            .insert_kitten(user.id, input.clone())
            .await
            .map_err(|e| map_write_error(e, &input))?;
        info!("User {} registered kitten {} ({})", user.id, kitten.id, kitten.name);
        Ok(kitten)
    }

    /// PUT or PATCH; ownership is checked before the body is looked at
    pub async fn update(&self, user: &AuthUser, id: i64, body: Value, mode: WriteMode) -> Result<Kitten, ApiError> {
        let stored = self.load(id).await?;
        ensure_owner(user, stored.owner_id, UPDATE_DENIED)?;

        let input = parse_body::<KittenPayload>(body)?.validate(Some(&stored), mode)?;
        self.check_references(&input, Some(id)).await?;

        self.store
            .update_kitten(id, input.clone())
            .await
            .map_err(|e| map_write_error(e, &input))
    }

    /// Cascades to the kitten's ratings
    pub async fn delete(&self, user: &AuthUser, id: i64) -> Result<(), ApiError> {
        let stored = self.load(id).await?;
        ensure_owner(user, stored.owner_id, DELETE_DENIED)?;
        self.store.delete_kitten(id).await?;
        info!("User {} deleted kitten {}", user.id, id);
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<Kitten, ApiError> {
        self.store
            .find_kitten(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Kitten not found"))
    }

    async fn check_references(&self, input: &KittenInput, exclude: Option<i64>) -> Result<(), ApiError> {
        if self.store.find_breed(input.breed_id).await?.is_none() {
            return Err(ApiError::field_error("breed", missing_reference(input.breed_id)));
        }
        if let Some(description) = &input.description {
            if self.store.description_taken(description, exclude).await? {
                return Err(ApiError::field_error("description", DUPLICATE_DESCRIPTION));
            }
        }
        Ok(())
    }
}

/// A write racing past `check_references` still lands on the right field
fn map_write_error(err: DatabaseError, input: &KittenInput) -> ApiError {
    match err {
        DatabaseError::UniqueViolation(ref c) if c == constraints::KITTENS_DESCRIPTION => {
            ApiError::field_error("description", DUPLICATE_DESCRIPTION)
        }
        DatabaseError::ForeignKeyViolation(ref c) if c == constraints::KITTENS_BREED => {
            ApiError::field_error("breed", missing_reference(input.breed_id))
        }
        other => other.into(),
    }
}
