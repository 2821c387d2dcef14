//! # chat-api
//!
//! REST API server built with Axum: typing indicators, message send and
//! unread notifications, plus the background typing sweeper.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod scheduler;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
