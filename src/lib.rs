pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod permissions;
pub mod router;
pub mod services;
pub mod state;
pub mod types;
pub mod validation;

pub use router::app;
pub use state::AppState;
