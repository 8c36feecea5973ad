use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{self, ValidationErrors, WriteMode};

pub const BREED_NAME_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Breed {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BreedPayload {
    #[serde(default, deserialize_with = "validation::nullable")]
    pub name: Option<Option<String>>,
}

/// Validated breed fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedInput {
    pub name: String,
}

impl BreedPayload {
    pub fn validate(self, stored: Option<&Breed>, mode: WriteMode) -> Result<BreedInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = validation::not_null(&mut errors, "name", self.name);
        let name = validation::resolve(&mut errors, "name", name, stored.map(|b| b.name.clone()), mode);
        let name = validation::text(&mut errors, "name", name, BREED_NAME_MAX);

        match name {
            Some(name) => errors.finish(BreedInput { name }),
            None => Err(errors),
        }
    }
}
