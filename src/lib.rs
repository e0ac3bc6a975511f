pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
}

impl AppState {
    /// Wires the SQLite repository and user service over `pool`.
    pub fn from_pool(pool: sqlx::SqlitePool) -> Self {
        let user_repository = Arc::new(repositories::SqliteUserRepository::new(pool));
        let user_service = Arc::new(services::UserService::new(user_repository));
        Self { user_service }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/create_user", post(handlers::create_user))
        .route("/user/", post(handlers::create_user))
        .route("/update_user", put(handlers::update_user))
        .route("/users", get(handlers::list_users))
        .route(
            "/users/{id}",
            get(handlers::read_user).delete(handlers::delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
