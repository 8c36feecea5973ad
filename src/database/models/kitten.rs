use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::validation::{self, ValidationErrors, WriteMode};

pub const KITTEN_TEXT_MAX: usize = 100;

/// `breed` and `owner` carry ids on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Kitten {
    pub id: i64,
    pub color: String,
    pub name: String,
    pub age: i32,
    pub description: Option<String>,
    #[serde(rename = "breed")]
    pub breed_id: i64,
    #[serde(rename = "owner")]
    pub owner_id: i64,
}

/// Incoming kitten body. `owner` is read-only and therefore not accepted.
#[derive(Debug, Default, Deserialize)]
pub struct KittenPayload {
    #[serde(default, deserialize_with = "validation::nullable")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "validation::nullable")]
    pub breed: Option<Option<i64>>,
}

/// Validated kitten fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KittenInput {
    pub color: String,
    pub name: String,
    pub age: i32,
    pub description: Option<String>,
    pub breed_id: i64,
}

/// `GET /api/kittens/?breed=<id>`; an empty `breed=` means no filter
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct KittenFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub breed: Option<i64>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl KittenPayload {
    pub fn validate(self, stored: Option<&Kitten>, mode: WriteMode) -> Result<KittenInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let color = validation::not_null(&mut errors, "color", self.color);
        let name = validation::not_null(&mut errors, "name", self.name);
        let age = validation::not_null(&mut errors, "age", self.age);
        let breed = validation::not_null(&mut errors, "breed", self.breed);
        let description = validation::not_null(&mut errors, "description", self.description);

        let color = validation::resolve(&mut errors, "color", color, stored.map(|k| k.color.clone()), mode);
        let color = validation::text(&mut errors, "color", color, KITTEN_TEXT_MAX);

        let name = validation::resolve(&mut errors, "name", name, stored.map(|k| k.name.clone()), mode);
        let name = validation::text(&mut errors, "name", name, KITTEN_TEXT_MAX);

        let age = validation::resolve(&mut errors, "age", age, stored.map(|k| i64::from(k.age)), mode)
            .and_then(|age| validation::age(&mut errors, "age", age));

        let breed_id = validation::resolve(&mut errors, "breed", breed, stored.map(|k| k.breed_id), mode);

        // Optional everywhere: an omitted description keeps the stored one
        let description = match description {
            Some(d) => validation::normalize_description(Some(d)),
            None => stored.and_then(|k| k.description.clone()),
        };

        match (color, name, age, breed_id) {
            (Some(color), Some(name), Some(age), Some(breed_id)) => errors.finish(KittenInput {
                color,
                name,
                age,
                description,
                breed_id,
            }),
            _ => Err(errors),
        }
    }
}
