//! Ports implemented by the infrastructure crates

mod repositories;

pub use repositories::{
    ChannelMembership, ChannelRepository, MessageRepository, NotificationRepository, RepoResult,
    TypingRepository, UserRepository,
};
