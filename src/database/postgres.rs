use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Breed, BreedInput, Kitten, KittenFilter, KittenInput, KittenStats, NewUser, Rating, RatingInput, User};
use super::store::ExhibitionStore;

const USER_COLUMNS: &str = "id, username, first_name, last_name, email, password, role, date_joined";
const KITTEN_COLUMNS: &str = "id, color, name, age, description, breed_id, owner_id";
const RATING_COLUMNS: &str = "id, kitten_id, user_id, score, comment";

/// `ExhibitionStore` over the Postgres schema in `migrations/`
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn expect_deleted(rows: u64, what: &str, id: i64) -> Result<(), DatabaseError> {
        if rows == 0 {
            Err(DatabaseError::NotFound(format!("{} {} not found", what, id)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ExhibitionStore for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, first_name, last_name, email, password, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(email).fetch_optional(&self.pool).await?)
    }

    async fn delete_user(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::expect_deleted(result.rows_affected(), "User", id)
    }

    async fn list_breeds(&self) -> Result<Vec<Breed>, DatabaseError> {
        Ok(sqlx::query_as::<_, Breed>("SELECT id, name FROM breeds ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_breed(&self, id: i64) -> Result<Option<Breed>, DatabaseError> {
        Ok(sqlx::query_as::<_, Breed>("SELECT id, name FROM breeds WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_breed(&self, input: BreedInput) -> Result<Breed, DatabaseError> {
        Ok(sqlx::query_as::<_, Breed>("INSERT INTO breeds (name) VALUES ($1) RETURNING id, name")
            .bind(&input.name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_breed(&self, id: i64, input: BreedInput) -> Result<Breed, DatabaseError> {
        Ok(sqlx::query_as::<_, Breed>("UPDATE breeds SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(&input.name)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_breed(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM breeds WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::expect_deleted(result.rows_affected(), "Breed", id)
    }

    async fn list_kittens(&self, filter: KittenFilter) -> Result<Vec<Kitten>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM kittens WHERE ($1::BIGINT IS NULL OR breed_id = $1) ORDER BY id",
            KITTEN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Kitten>(&sql)
            .bind(filter.breed)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_kitten(&self, id: i64) -> Result<Option<Kitten>, DatabaseError> {
        let sql = format!("SELECT {} FROM kittens WHERE id = $1", KITTEN_COLUMNS);
        Ok(sqlx::query_as::<_, Kitten>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn insert_kitten(&self, owner_id: i64, input: KittenInput) -> Result<Kitten, DatabaseError> {
        let sql = format!(
            "INSERT INTO kittens (color, name, age, description, breed_id, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            KITTEN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Kitten>(&sql)
            .bind(&input.color)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.description)
            .bind(input.breed_id)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_kitten(&self, id: i64, input: KittenInput) -> Result<Kitten, DatabaseError> {
        let sql = format!(
            "UPDATE kittens SET color = $2, name = $3, age = $4, description = $5, breed_id = $6 \
             WHERE id = $1 RETURNING {}",
            KITTEN_COLUMNS
        );
        Ok(sqlx::query_as::<_, Kitten>(&sql)
            .bind(id)
            .bind(&input.color)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.description)
            .bind(input.breed_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_kitten(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM kittens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::expect_deleted(result.rows_affected(), "Kitten", id)
    }

    async fn description_taken(&self, description: &str, exclude: Option<i64>) -> Result<bool, DatabaseError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM kittens WHERE description = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(description)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn list_ratings(&self) -> Result<Vec<Rating>, DatabaseError> {
        let sql = format!("SELECT {} FROM ratings ORDER BY id", RATING_COLUMNS);
        Ok(sqlx::query_as::<_, Rating>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_rating(&self, id: i64) -> Result<Option<Rating>, DatabaseError> {
        let sql = format!("SELECT {} FROM ratings WHERE id = $1", RATING_COLUMNS);
        Ok(sqlx::query_as::<_, Rating>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_user_rating(&self, user_id: i64, kitten_id: i64) -> Result<Option<Rating>, DatabaseError> {
        let sql = format!("SELECT {} FROM ratings WHERE user_id = $1 AND kitten_id = $2", RATING_COLUMNS);
        Ok(sqlx::query_as::<_, Rating>(&sql)
            .bind(user_id)
            .bind(kitten_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_rating(&self, user_id: i64, input: RatingInput) -> Result<Rating, DatabaseError> {
        let sql = format!(
            "INSERT INTO ratings (kitten_id, user_id, score, comment) VALUES ($1, $2, $3, $4) RETURNING {}",
            RATING_COLUMNS
        );
        Ok(sqlx::query_as::<_, Rating>(&sql)
            .bind(input.kitten_id)
            .bind(user_id)
            .bind(input.score)
            .bind(&input.comment)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_rating(&self, id: i64, input: RatingInput) -> Result<Rating, DatabaseError> {
        let sql = format!(
            "UPDATE ratings SET kitten_id = $2, score = $3, comment = $4 WHERE id = $1 RETURNING {}",
            RATING_COLUMNS
        );
        Ok(sqlx::query_as::<_, Rating>(&sql)
            .bind(id)
            .bind(input.kitten_id)
            .bind(input.score)
            .bind(&input.comment)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_rating(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Self::expect_deleted(result.rows_affected(), "Rating", id)
    }

    async fn kitten_stats(&self, kitten_id: i64) -> Result<KittenStats, DatabaseError> {
        Ok(sqlx::query_as::<_, KittenStats>(
            "SELECT SUM(score)::BIGINT AS total_score, COUNT(id) AS rating_count FROM ratings WHERE kitten_id = $1",
        )
        .bind(kitten_id)
        .fetch_one(&self.pool)
        .await?)
    }
}
