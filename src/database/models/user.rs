use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::Role;
use crate::validation::{self, ValidationErrors, REQUIRED};

pub const USERNAME_MAX: usize = 150;
pub const NAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 250;

/// Stored account. Deliberately not `Serialize`: the password hash never leaves the store layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub date_joined: DateTime<Utc>,
}

/// Public representation returned by registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Row to insert; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// POST /api/register/ body
#[derive(Debug, Default, Deserialize)]
pub struct RegisterPayload {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Validated registration, plaintext password still attached
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterPayload {
    pub fn validate(self) -> Result<Registration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.username.is_none() {
            errors.add("username", REQUIRED);
        }
        let username = validation::text(&mut errors, "username", self.username, USERNAME_MAX);

        let first_name = match self.first_name {
            Some(v) => validation::optional_text(&mut errors, "first_name", v, NAME_MAX),
            None => {
                errors.add("first_name", REQUIRED);
                String::new()
            }
        };
        let last_name = match self.last_name {
            Some(v) => validation::optional_text(&mut errors, "last_name", v, NAME_MAX),
            None => {
                errors.add("last_name", REQUIRED);
                String::new()
            }
        };

        if self.email.is_none() {
            errors.add("email", REQUIRED);
        }
        let email = validation::text(&mut errors, "email", self.email, EMAIL_MAX)
            .filter(|email| validation::email(&mut errors, "email", email));

        let password = match self.password {
            Some(p) if !p.is_empty() => Some(p),
            Some(_) => {
                errors.add("password", validation::BLANK);
                None
            }
            None => {
                errors.add("password", REQUIRED);
                None
            }
        };

        match (username, email, password) {
            (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(Registration {
                username,
                first_name,
                last_name,
                email,
                password,
                role: self.role.unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}
