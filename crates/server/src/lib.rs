mod api;
pub mod config;
mod error;
mod state;
mod workspace;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

pub use self::state::AppState;
pub use self::workspace::Workspace;

/// Transport settings applied around the routes.
#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub allow_origin: HeaderValue,
    pub body_limit: usize,
}

/// Build the API router.
pub fn create_app(state: Arc<AppState>, options: &HttpOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(options.allow_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::home_handler))
        .route("/register_faces", post(api::register_handler))
        .route("/upload", post(api::upload_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(options.body_limit))
        .layer(cors)
        .with_state(state)
}
