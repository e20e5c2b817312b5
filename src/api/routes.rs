//! API Routes
//!
//! Configures the Axum router with every entity endpoint.

use axum::{
    routing::{get, patch, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    channel_last_message_handler, channel_pin_handler, delete_handler, get_handler,
    health_handler, set_handler, stats_handler, AppState,
};
use crate::entity::{Channel, Guild, Message, User};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /<kind>` - Store or merge an entity
/// - `GET /<kind>/:id` - Read an entity back
/// - `DELETE /<kind>/:id` - Drop an entity
/// - `PATCH /channels/:id/pin` - Record a pin timestamp
/// - `PATCH /channels/:id/last-message` - Record the newest message id
/// - `GET /stats` - Per-store statistics
/// - `GET /health` - Health check endpoint
///
/// `<kind>` is one of `channels`, `users`, `guilds` or `messages`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/channels", put(set_handler::<Channel>))
        .route(
            "/channels/:id",
            get(get_handler::<Channel>).delete(delete_handler::<Channel>),
        )
        .route("/channels/:id/pin", patch(channel_pin_handler))
        .route(
            "/channels/:id/last-message",
            patch(channel_last_message_handler),
        )
        .route("/users", put(set_handler::<User>))
        .route(
            "/users/:id",
            get(get_handler::<User>).delete(delete_handler::<User>),
        )
        .route("/guilds", put(set_handler::<Guild>))
        .route(
            "/guilds/:id",
            get(get_handler::<Guild>).delete(delete_handler::<Guild>),
        )
        .route("/messages", put(set_handler::<Message>))
        .route(
            "/messages/:id",
            get(get_handler::<Message>).delete(delete_handler::<Message>),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
