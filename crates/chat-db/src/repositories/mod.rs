//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in chat-core.

mod channel;
mod error;
mod message;
mod notification;
mod user;

pub use channel::PgChannelRepository;
pub use message::PgMessageRepository;
pub use notification::PgNotificationRepository;
pub use user::{PgChannelMembership, PgUserRepository};
