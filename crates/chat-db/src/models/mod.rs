//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod message;
mod notification;
mod user;

pub use channel::ChannelModel;
pub use message::MessageModel;
pub use notification::NotificationModel;
pub use user::UserModel;
