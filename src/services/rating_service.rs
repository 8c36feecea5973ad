use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::{missing_reference, parse_body};
use crate::database::models::{KittenStats, Rating, RatingInput, RatingPayload};
use crate::database::{constraints, DatabaseError, ExhibitionStore};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::permissions::ensure_owner;
use crate::validation::WriteMode;

pub const ALREADY_RATED: &str = "You have already rated this kitten.";
pub const UPDATE_DENIED: &str = "You do not have permission to modify this rating.";
pub const DELETE_DENIED: &str = "You do not have permission to delete this rating.";

/// Ratings. Any authenticated user rates each kitten once; only the author mutates.
pub struct RatingService {
    store: Arc<dyn ExhibitionStore>,
}

impl RatingService {
    pub fn new(store: Arc<dyn ExhibitionStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Rating>, ApiError> {
        Ok(self.store.list_ratings().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Rating, ApiError> {
        self.load(id).await
    }

    /// The requester becomes the author
    pub async fn create(&self, user: &AuthUser, body: Value) -> Result<Rating, ApiError> {
        let input = parse_body::<RatingPayload>(body)?.validate(None, WriteMode::Create)?;
        self.check_references(user, &input, None).await?;

        let rating = self
            .store
            .insert_rating(user.id, input.clone())
            .await
            .map_err(|e| map_write_error(e, &input))?;
        info!("User {} rated kitten {} with {}", user.id, rating.kitten_id, rating.score);
        Ok(rating)
    }

    /// PUT or PATCH; authorship is checked before the body is looked at
    pub async fn update(&self, user: &AuthUser, id: i64, body: Value, mode: WriteMode) -> Result<Rating, ApiError> {
        let stored = self.load(id).await?;
        ensure_owner(user, stored.user_id, UPDATE_DENIED)?;

        let input = parse_body::<RatingPayload>(body)?.validate(Some(&stored), mode)?;
        self.check_references(user, &input, Some(id)).await?;

        self.store
            .update_rating(id, input.clone())
            .await
            .map_err(|e| map_write_error(e, &input))
    }

    pub async fn delete(&self, user: &AuthUser, id: i64) -> Result<(), ApiError> {
        let stored = self.load(id).await?;
        ensure_owner(user, stored.user_id, DELETE_DENIED)?;
        self.store.delete_rating(id).await?;
        info!("User {} deleted rating {}", user.id, id);
        Ok(())
    }

    /// Sum and count of a kitten's scores
    pub async fn kitten_stats(&self, kitten_id: i64) -> Result<KittenStats, ApiError> {
        if self.store.find_kitten(kitten_id).await?.is_none() {
            return Err(ApiError::not_found("Kitten not found"));
        }
        Ok(self.store.kitten_stats(kitten_id).await?)
    }

    async fn load(&self, id: i64) -> Result<Rating, ApiError> {
        self.store
            .find_rating(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Rating not found"))
    }

    /// Kitten must exist and the author must not have rated it under another rating
    async fn check_references(&self, user: &AuthUser, input: &RatingInput, current: Option<i64>) -> Result<(), ApiError> {
        if self.store.find_kitten(input.kitten_id).await?.is_none() {
            return Err(ApiError::field_error("kitten", missing_reference(input.kitten_id)));
        }
        if let Some(existing) = self.store.find_user_rating(user.id, input.kitten_id).await? {
            if Some(existing.id) != current {
                debug!("User {} already rated kitten {}", user.id, input.kitten_id);
                return Err(ApiError::validation_error(ALREADY_RATED, None));
            }
        }
        Ok(())
    }
}

/// The unique constraint is the backstop for concurrent duplicates
fn map_write_error(err: DatabaseError, input: &RatingInput) -> ApiError {
    match err {
        DatabaseError::UniqueViolation(ref c) if c == constraints::RATINGS_USER_KITTEN => {
            ApiError::validation_error(ALREADY_RATED, None)
        }
        DatabaseError::ForeignKeyViolation(ref c) if c == constraints::RATINGS_KITTEN => {
            ApiError::field_error("kitten", missing_reference(input.kitten_id))
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{BreedInput, KittenInput};
    use crate::services::test_support;
    use crate::types::Role;
    use axum::http::StatusCode;
    use serde_json::json;

    struct Fixture {
        service: RatingService,
        store: Arc<dyn ExhibitionStore>,
        rater: AuthUser,
        kitten_id: i64,
    }

    async fn add_kitten(store: &Arc<dyn ExhibitionStore>, owner: i64, breed_id: i64, name: &str) -> i64 {
        store
            .insert_kitten(
                owner,
                KittenInput {
                    color: "White".into(),
                    name: name.into(),
                    age: 1,
                    description: None,
                    breed_id,
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn fixture() -> Fixture {
        let store = test_support::store();
        let owner = test_support::user(&store, "owner", Role::Participant).await;
        let rater = test_support::user(&store, "rater", Role::Visitor).await;
        let breed = store.insert_breed(BreedInput { name: "Siamese".into() }).await.unwrap();
        let kitten_id = add_kitten(&store, owner.id, breed.id, "Snow").await;
        Fixture {
            service: RatingService::new(store.clone()),
            store,
            rater,
            kitten_id,
        }
    }

    #[tokio::test]
    async fn second_rating_for_same_kitten_fails() {
        let f = fixture().await;
        let rating = f
            .service
            .create(&f.rater, json!({"kitten": f.kitten_id, "score": 5, "comment": "Great"}))
            .await
            .unwrap();
        assert_eq!(rating.user_id, f.rater.id);

        let err = f
            .service
            .create(&f.rater, json!({"kitten": f.kitten_id, "score": 3}))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), ALREADY_RATED);
        assert_eq!(f.store.list_ratings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn score_out_of_range_fails() {
        let f = fixture().await;
        let err = f
            .service
            .create(&f.rater, json!({"kitten": f.kitten_id, "score": 6}))
            .await
            .unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["score"], "Rating must be between 1 and 5.");
    }

    #[tokio::test]
    async fn score_out_of_range_fails_on_update() {
        let f = fixture().await;
        let rating = f
            .service
            .create(&f.rater, json!({"kitten": f.kitten_id, "score": 3}))
            .await
            .unwrap();

        for (body, mode) in [
            (json!({"score": 0}), WriteMode::Partial),
            (json!({"kitten": f.kitten_id, "score": 9}), WriteMode::Replace),
        ] {
            let err = f.service.update(&f.rater, rating.id, body, mode).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_json()["field_errors"]["score"], "Rating must be between 1 and 5.");
        }
        assert_eq!(f.store.find_rating(rating.id).await.unwrap().unwrap().score, 3);
    }

    #[tokio::test]
    async fn only_author_mutates() {
        let f = fixture().await;
        let rating = f
            .service
            .create(&f.rater, json!({"kitten": f.kitten_id, "score": 4}))
            .await
            .unwrap();
        let other = test_support::user(&f.store, "other", Role::Visitor).await;

        let err = f
            .service
            .update(&other, rating.id, json!({"score": 1}), WriteMode::Partial)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = f.service.delete(&other, rating.id).await.unwrap_err();
        assert_eq!(err.message(), DELETE_DENIED);

        let updated = f
            .service
            .update(&f.rater, rating.id, json!({"score": 2}), WriteMode::Partial)
            .await
            .unwrap();
        assert_eq!(updated.score, 2);
        assert_eq!(updated.kitten_id, f.kitten_id);
    }

    #[tokio::test]
    async fn moving_onto_rated_kitten_fails() {
        let f = fixture().await;
        let owner = test_support::user(&f.store, "owner2", Role::Participant).await;
        let breed = f.store.insert_breed(BreedInput { name: "Persian".into() }).await.unwrap();
        let second = add_kitten(&f.store, owner.id, breed.id, "Fluff").await;

        f.service.create(&f.rater, json!({"kitten": f.kitten_id, "score": 4})).await.unwrap();
        let movable = f.service.create(&f.rater, json!({"kitten": second, "score": 3})).await.unwrap();

        let err = f
            .service
            .update(&f.rater, movable.id, json!({"kitten": f.kitten_id}), WriteMode::Partial)
            .await
            .unwrap_err();
        assert_eq!(err.message(), ALREADY_RATED);
    }

    #[tokio::test]
    async fn stats_sum_scores() {
        let f = fixture().await;
        let second = test_support::user(&f.store, "second", Role::Participant).await;
        f.service.create(&f.rater, json!({"kitten": f.kitten_id, "score": 5})).await.unwrap();
        f.service.create(&second, json!({"kitten": f.kitten_id, "score": 4})).await.unwrap();

        let stats = f.service.kitten_stats(f.kitten_id).await.unwrap();
        assert_eq!(stats.total_score, Some(9));
        assert_eq!(stats.rating_count, 2);

        let err = f.service.kitten_stats(9999).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Kitten not found");
    }
}
