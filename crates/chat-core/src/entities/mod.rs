//! Domain entities - core business objects

mod channel;
mod message;
mod notification;
mod typing;
mod user;

pub use channel::Channel;
pub use message::{Message, MAX_MESSAGE_LENGTH};
pub use notification::{Notification, NotificationKind, UnknownNotificationKind};
pub use typing::{TypingRecord, DEFAULT_ACTIVE_WINDOW_MS, DEFAULT_RETENTION_WINDOW_MS};
pub use user::{User, ANONYMOUS_DISPLAY_NAME};
