use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::parse_body;
use crate::auth::{verify_password, AccessToken, TokenIssuer, TokenPair};
use crate::database::ExhibitionStore;
use crate::error::ApiError;
use crate::validation::{ValidationErrors, REQUIRED};

pub const INVALID_CREDENTIALS: &str = "No active account found with the given credentials";

/// POST /api/token/ body
#[derive(Debug, Default, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/token/refresh/ body
#[derive(Debug, Default, Deserialize)]
pub struct RefreshPayload {
    pub refresh: Option<String>,
}

/// Token login and refresh
pub struct AuthService {
    store: Arc<dyn ExhibitionStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn ExhibitionStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    pub async fn login(&self, body: Value) -> Result<TokenPair, ApiError> {
        let payload = parse_body::<LoginPayload>(body)?;

        let mut errors = ValidationErrors::new();
        if payload.email.is_none() {
            errors.add("email", REQUIRED);
        }
        if payload.password.is_none() {
            errors.add("password", REQUIRED);
        }
        let (Some(email), Some(password)) = (payload.email, payload.password) else {
            return Err(errors.into());
        };

        let Some(user) = self.store.find_user_by_email(email.trim()).await? else {
            warn!("Login attempt for unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password, user.password_hash.clone()).await? {
            warn!("Login failed for user {}", user.id);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let pair = self.tokens.issue_pair(user.id)?;
        info!("Issued token pair for user {}", user.id);
        Ok(pair)
    }

    pub async fn refresh(&self, body: Value) -> Result<AccessToken, ApiError> {
        let payload = parse_body::<RefreshPayload>(body)?;
        let refresh = payload
            .refresh
            .ok_or_else(|| ApiError::field_error("refresh", REQUIRED))?;
        Ok(self.tokens.refresh(&refresh)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenType;
    use crate::config::AppConfig;
    use crate::services::test_support;
    use crate::types::Role;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn service() -> (AuthService, TokenIssuer, i64) {
        let store = test_support::store();
        let user = test_support::user(&store, "cat", Role::Visitor).await;
        let tokens = TokenIssuer::from_config(&AppConfig::for_tests().security).unwrap();
        (AuthService::new(store, tokens.clone()), tokens, user.id)
    }

    #[tokio::test]
    async fn login_issues_pair() {
        let (service, tokens, user_id) = service().await;
        let pair = service
            .login(json!({"email": "cat@example.com", "password": "password"}))
            .await
            .unwrap();
        let claims = tokens.verify(&pair.access, TokenType::Access).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert!(tokens.verify(&pair.refresh, TokenType::Refresh).is_ok());
    }

    #[tokio::test]
    async fn bad_credentials_are_401() {
        let (service, _, _) = service().await;
        for body in [
            json!({"email": "cat@example.com", "password": "wrong"}),
            json!({"email": "nobody@example.com", "password": "password"}),
        ] {
            let err = service.login(body).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.message(), INVALID_CREDENTIALS);
        }

        let err = service.login(json!({})).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_requires_refresh_token() {
        let (service, tokens, user_id) = service().await;
        let pair = tokens.issue_pair(user_id).unwrap();

        let fresh = service.refresh(json!({"refresh": pair.refresh})).await.unwrap();
        assert!(tokens.verify(&fresh.access, TokenType::Access).is_ok());

        let err = service.refresh(json!({"refresh": pair.access})).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Token is invalid or expired");
    }
}
