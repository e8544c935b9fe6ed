use crate::handlers::{
    auth::{login, register},
    health::health_check,
    user::{current_profile, update_profile},
};
use crate::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router,
    handler::Handler,
    routing::{get, patch, post},
};
use tower_governor::GovernorLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Rate limit configuration. Only login gets one: it's the endpoint
    // worth brute-forcing.
    let login_conf = rate_limit::create_login_config();

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login.layer(GovernorLayer::new(login_conf))));

    // Both user routes authenticate via the AuthenticatedUser extractor in
    // their handlers, so there is no auth layer to forget here.
    let user_routes = Router::new()
        .route("/me", get(current_profile))
        .route("/", patch(update_profile));

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
