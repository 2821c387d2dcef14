//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes live at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, messages, notifications, typing};
use crate::state::AppState;

/// Create the API router (health routes are separate so they bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(channel_routes())
        .merge(user_routes())
}

/// Per-channel typing, messages and read marks
fn channel_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/channels/:channel_id/typing",
            get(typing::list_typists).post(typing::set_typing),
        )
        .route(
            "/channels/:channel_id/messages",
            get(messages::get_messages).post(messages::create_message),
        )
        .route(
            "/channels/:channel_id/notifications/read",
            post(notifications::mark_channel_read),
        )
}

/// The caller's own notifications
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me/notifications", get(notifications::list_unread))
        .route("/users/@me/notifications/read", post(notifications::mark_all_read))
}
