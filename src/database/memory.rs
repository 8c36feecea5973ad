use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::manager::{constraints, DatabaseError};
use super::models::{Breed, BreedInput, Kitten, KittenFilter, KittenInput, KittenStats, NewUser, Rating, RatingInput, User};
use super::store::ExhibitionStore;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    breeds: BTreeMap<i64, Breed>,
    kittens: BTreeMap<i64, Kitten>,
    ratings: BTreeMap<i64, Rating>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_kitten(&self, id: Option<i64>, input: &KittenInput) -> Result<(), DatabaseError> {
        if !self.breeds.contains_key(&input.breed_id) {
            return Err(DatabaseError::ForeignKeyViolation(constraints::KITTENS_BREED.to_string()));
        }
        if let Some(description) = &input.description {
            let clash = self
                .kittens
                .values()
                .any(|k| Some(k.id) != id && k.description.as_deref() == Some(description.as_str()));
            if clash {
                return Err(DatabaseError::UniqueViolation(constraints::KITTENS_DESCRIPTION.to_string()));
            }
        }
        Ok(())
    }

    fn check_rating(&self, id: Option<i64>, user_id: i64, input: &RatingInput) -> Result<(), DatabaseError> {
        if !self.kittens.contains_key(&input.kitten_id) {
            return Err(DatabaseError::ForeignKeyViolation(constraints::RATINGS_KITTEN.to_string()));
        }
        if !self.users.contains_key(&user_id) {
            return Err(DatabaseError::ForeignKeyViolation(constraints::RATINGS_USER.to_string()));
        }
        let clash = self
            .ratings
            .values()
            .any(|r| Some(r.id) != id && r.user_id == user_id && r.kitten_id == input.kitten_id);
        if clash {
            return Err(DatabaseError::UniqueViolation(constraints::RATINGS_USER_KITTEN.to_string()));
        }
        Ok(())
    }

    fn cascade_kittens(&mut self, doomed: Vec<i64>) {
        for id in &doomed {
            self.kittens.remove(id);
        }
        self.ratings.retain(|_, r| !doomed.contains(&r.kitten_id));
    }
}

/// Process-local `ExhibitionStore` with the same constraints as the SQL schema.
/// A single lock serializes writers, which also closes the rating uniqueness race.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(what: &str, id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("{} {} not found", what, id))
}

#[async_trait]
impl ExhibitionStore for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation(constraints::USERS_EMAIL.to_string()));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation(constraints::USERS_USERNAME.to_string()));
        }
        let id = tables.next_id();
        let row = User {
            id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            date_joined: Utc::now(),
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or_else(|| not_found("User", id))?;
        let owned: Vec<i64> = tables.kittens.values().filter(|k| k.owner_id == id).map(|k| k.id).collect();
        tables.cascade_kittens(owned);
        tables.ratings.retain(|_, r| r.user_id != id);
        Ok(())
    }

    async fn list_breeds(&self) -> Result<Vec<Breed>, DatabaseError> {
        Ok(self.tables.read().await.breeds.values().cloned().collect())
    }

    async fn find_breed(&self, id: i64) -> Result<Option<Breed>, DatabaseError> {
        Ok(self.tables.read().await.breeds.get(&id).cloned())
    }

    async fn insert_breed(&self, input: BreedInput) -> Result<Breed, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let breed = Breed { id, name: input.name };
        tables.breeds.insert(id, breed.clone());
        Ok(breed)
    }

    async fn update_breed(&self, id: i64, input: BreedInput) -> Result<Breed, DatabaseError> {
        let mut tables = self.tables.write().await;
        let breed = tables.breeds.get_mut(&id).ok_or_else(|| not_found("Breed", id))?;
        breed.name = input.name;
        Ok(breed.clone())
    }

    async fn delete_breed(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.breeds.remove(&id).ok_or_else(|| not_found("Breed", id))?;
        let doomed: Vec<i64> = tables.kittens.values().filter(|k| k.breed_id == id).map(|k| k.id).collect();
        tables.cascade_kittens(doomed);
        Ok(())
    }

    async fn list_kittens(&self, filter: KittenFilter) -> Result<Vec<Kitten>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .kittens
            .values()
            .filter(|k| filter.breed.map_or(true, |breed| k.breed_id == breed))
            .cloned()
            .collect())
    }

    async fn find_kitten(&self, id: i64) -> Result<Option<Kitten>, DatabaseError> {
        Ok(self.tables.read().await.kittens.get(&id).cloned())
    }

    async fn insert_kitten(&self, owner_id: i64, input: KittenInput) -> Result<Kitten, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(DatabaseError::ForeignKeyViolation(constraints::KITTENS_OWNER.to_string()));
        }
        tables.check_kitten(None, &input)?;
        let id = tables.next_id();
        let kitten = Kitten {
            id,
            color: input.color,
            name: input.name,
            age: input.age,
            description: input.description,
            breed_id: input.breed_id,
            owner_id,
        };
        tables.kittens.insert(id, kitten.clone());
        Ok(kitten)
    }

    async fn update_kitten(&self, id: i64, input: KittenInput) -> Result<Kitten, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.kittens.contains_key(&id) {
            return Err(not_found("Kitten", id));
        }
        tables.check_kitten(Some(id), &input)?;
        let kitten = tables.kittens.get_mut(&id).ok_or_else(|| not_found("Kitten", id))?;
        kitten.color = input.color;
        kitten.name = input.name;
        kitten.age = input.age;
        kitten.description = input.description;
        kitten.breed_id = input.breed_id;
        Ok(kitten.clone())
    }

    async fn delete_kitten(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.kittens.contains_key(&id) {
            return Err(not_found("Kitten", id));
        }
        tables.cascade_kittens(vec![id]);
        Ok(())
    }

    async fn description_taken(&self, description: &str, exclude: Option<i64>) -> Result<bool, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .kittens
            .values()
            .any(|k| Some(k.id) != exclude && k.description.as_deref() == Some(description)))
    }

    async fn list_ratings(&self) -> Result<Vec<Rating>, DatabaseError> {
        Ok(self.tables.read().await.ratings.values().cloned().collect())
    }

    async fn find_rating(&self, id: i64) -> Result<Option<Rating>, DatabaseError> {
        Ok(self.tables.read().await.ratings.get(&id).cloned())
    }

    async fn find_user_rating(&self, user_id: i64, kitten_id: i64) -> Result<Option<Rating>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .ratings
            .values()
            .find(|r| r.user_id == user_id && r.kitten_id == kitten_id)
            .cloned())
    }

    async fn insert_rating(&self, user_id: i64, input: RatingInput) -> Result<Rating, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_rating(None, user_id, &input)?;
        let id = tables.next_id();
        let rating = Rating {
            id,
            kitten_id: input.kitten_id,
            user_id,
            score: input.score,
            comment: input.comment,
        };
        tables.ratings.insert(id, rating.clone());
        Ok(rating)
    }

    async fn update_rating(&self, id: i64, input: RatingInput) -> Result<Rating, DatabaseError> {
        let mut tables = self.tables.write().await;
        let user_id = tables.ratings.get(&id).map(|r| r.user_id).ok_or_else(|| not_found("Rating", id))?;
        tables.check_rating(Some(id), user_id, &input)?;
        let rating = tables.ratings.get_mut(&id).ok_or_else(|| not_found("Rating", id))?;
        rating.kitten_id = input.kitten_id;
        rating.score = input.score;
        rating.comment = input.comment;
        Ok(rating.clone())
    }

    async fn delete_rating(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.ratings.remove(&id).map(|_| ()).ok_or_else(|| not_found("Rating", id))
    }

    async fn kitten_stats(&self, kitten_id: i64) -> Result<KittenStats, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(KittenStats::from_scores(
            tables.ratings.values().filter(|r| r.kitten_id == kitten_id).map(|r| r.score),
        ))
    }
}
