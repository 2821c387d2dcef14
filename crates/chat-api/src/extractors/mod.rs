//! Axum extractors for request handling
//!
//! Custom extractors for authentication, path parameters and validation.

mod auth;
mod path;
mod validated;

pub use auth::AuthUser;
pub use path::ChannelIdPath;
pub use validated::{ValidatedJson, ValidatedQuery};
