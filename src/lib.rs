use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

pub mod client_key;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;

use state::AppState;

// Build the router with all routes
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/chat", post(handlers::chat_handler))
        .route("/api/emoji", get(handlers::emoji_handler))
        .with_state(state)
}
