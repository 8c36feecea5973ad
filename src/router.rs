use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router: public routes, bearer-protected `/api/` resources, global layers
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    // Auth runs only for matched protected routes, so unknown paths stay 404
    let protected = Router::new()
        .merge(breed_routes())
        .merge(kitten_routes())
        .merge(rating_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(public::service::root))
        .route("/health", get(public::service::health))
        .merge(public_api_routes())
        // Protected API
        .merge(protected)
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)));

    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_api_routes() -> Router<AppState> {
    use public::{register, token};

    Router::new()
        .route("/api/register/", post(register::register_post))
        .route("/api/token/", post(token::token_obtain))
        .route("/api/token/refresh/", post(token::token_refresh))
}

fn breed_routes() -> Router<AppState> {
    use protected::breeds;

    Router::new()
        .route("/api/breeds/", get(breeds::list).post(breeds::create))
        .route(
            "/api/breeds/:id/",
            get(breeds::get)
                .put(breeds::put)
                .patch(breeds::patch)
                .delete(breeds::delete),
        )
}

fn kitten_routes() -> Router<AppState> {
    use protected::kittens;

    Router::new()
        .route("/api/kittens/", get(kittens::list).post(kittens::create))
        .route(
            "/api/kittens/:id/",
            get(kittens::get)
                .put(kittens::put)
                .patch(kittens::patch)
                .delete(kittens::delete),
        )
}

fn rating_routes() -> Router<AppState> {
    use protected::ratings;

    Router::new()
        .route("/api/ratings/", get(ratings::list).post(ratings::create))
        .route("/api/ratings/kitten-stats/:kitten_id/", get(ratings::kitten_stats))
        .route(
            "/api/ratings/:id/",
            get(ratings::get)
                .put(ratings::put)
                .patch(ratings::patch)
                .delete(ratings::delete),
        )
}

/// Permissive when no origins are configured, an allow-list otherwise
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
