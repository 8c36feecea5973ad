use std::sync::Arc;

use crate::auth::{JwtError, TokenIssuer};
use crate::config::AppConfig;
use crate::database::ExhibitionStore;

/// Shared, cheaply clonable handle injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ExhibitionStore>,
    pub tokens: TokenIssuer,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ExhibitionStore>, config: AppConfig) -> Result<Self, JwtError> {
        let tokens = TokenIssuer::from_config(&config.security)?;
        Ok(Self {
            store,
            tokens,
            config: Arc::new(config),
        })
    }
}
