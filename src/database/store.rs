use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Breed, BreedInput, Kitten, KittenFilter, KittenInput, KittenStats, NewUser, Rating, RatingInput, User};

/// Persistence seam for the exhibition tables.
///
/// Implementations enforce the relational rules themselves: unique email and
/// username, unique non-null kitten description, one rating per (user, kitten),
/// foreign keys, and cascading deletes (breed → kittens → ratings, user →
/// kittens and ratings). Violations come back as `DatabaseError::UniqueViolation`
/// or `DatabaseError::ForeignKeyViolation` carrying the constraint name.
///
/// Mutations of a missing row return `DatabaseError::NotFound`. Lists are ordered by id.
#[async_trait]
pub trait ExhibitionStore: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Users
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn delete_user(&self, id: i64) -> Result<(), DatabaseError>;

    // Breeds
    async fn list_breeds(&self) -> Result<Vec<Breed>, DatabaseError>;
    async fn find_breed(&self, id: i64) -> Result<Option<Breed>, DatabaseError>;
    async fn insert_breed(&self, input: BreedInput) -> Result<Breed, DatabaseError>;
    async fn update_breed(&self, id: i64, input: BreedInput) -> Result<Breed, DatabaseError>;
    async fn delete_breed(&self, id: i64) -> Result<(), DatabaseError>;

    // Kittens
    async fn list_kittens(&self, filter: KittenFilter) -> Result<Vec<Kitten>, DatabaseError>;
    async fn find_kitten(&self, id: i64) -> Result<Option<Kitten>, DatabaseError>;
    async fn insert_kitten(&self, owner_id: i64, input: KittenInput) -> Result<Kitten, DatabaseError>;
    /// Owner is never touched
    async fn update_kitten(&self, id: i64, input: KittenInput) -> Result<Kitten, DatabaseError>;
    async fn delete_kitten(&self, id: i64) -> Result<(), DatabaseError>;
    /// Whether a kitten other than `exclude` already uses this description
    async fn description_taken(&self, description: &str, exclude: Option<i64>) -> Result<bool, DatabaseError>;

    // Ratings
    async fn list_ratings(&self) -> Result<Vec<Rating>, DatabaseError>;
    async fn find_rating(&self, id: i64) -> Result<Option<Rating>, DatabaseError>;
    async fn find_user_rating(&self, user_id: i64, kitten_id: i64) -> Result<Option<Rating>, DatabaseError>;
    async fn insert_rating(&self, user_id: i64, input: RatingInput) -> Result<Rating, DatabaseError>;
    /// Author is never touched
    async fn update_rating(&self, id: i64, input: RatingInput) -> Result<Rating, DatabaseError>;
    async fn delete_rating(&self, id: i64) -> Result<(), DatabaseError>;
    async fn kitten_stats(&self, kitten_id: i64) -> Result<KittenStats, DatabaseError>;
}
