// routes/app_routes.rs

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    app_state::AppState,
    handlers::{health_handlers::health, message_handlers},
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/messages/create", post(message_handlers::create_message))
        .route("/api/v1/messages/", get(message_handlers::get_message))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
