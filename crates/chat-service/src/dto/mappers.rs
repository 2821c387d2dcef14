//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chat_core::{Message, Notification, User};

use super::responses::{
    FanOutStatus, MessageAuthorResponse, MessageResponse, NotificationResponse,
    SentMessageResponse,
};

/// Shown when a message's author row no longer exists
pub const UNKNOWN_AUTHOR_NAME: &str = "Unknown User";

// ============================================================================
// Message Mappers
// ============================================================================

/// Message together with its author, if the author still exists
#[derive(Debug, Clone)]
pub struct MessageWithAuthor {
    pub message: Message,
    pub author: Option<User>,
}

impl From<MessageWithAuthor> for MessageResponse {
    fn from(value: MessageWithAuthor) -> Self {
        let MessageWithAuthor { message, author } = value;
        let name = author
            .as_ref()
            .map_or(UNKNOWN_AUTHOR_NAME, User::display_name)
            .to_string();

        Self {
            id: message.id.to_string(),
            channel_id: message.channel_id.to_string(),
            author: MessageAuthorResponse {
                id: message.author_id.to_string(),
                name,
            },
            content: message.content,
            timestamp: message.created_at,
        }
    }
}

impl SentMessageResponse {
    pub fn new(message: Message, notifications: FanOutStatus) -> Self {
        Self {
            id: message.id.to_string(),
            channel_id: message.channel_id.to_string(),
            author_id: message.author_id.to_string(),
            content: message.content,
            timestamp: message.created_at,
            notifications,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.to_string(),
            channel_id: n.channel_id.to_string(),
            message_id: n.message_id.to_string(),
            author_id: n.author_id.to_string(),
            is_read: n.is_read,
            kind: n.kind,
            created_at: n.created_at,
        }
    }
}
