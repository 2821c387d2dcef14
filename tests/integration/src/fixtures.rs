//! Request bodies and response shapes used by the API tests

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct TypingBody {
    pub is_typing: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub content: String,
}

impl MessageBody {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Fan-out outcome attached to a sent message
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FanOut {
    Delivered { recipients: usize, created: u64 },
    Failed { retryable: bool },
}

#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub content: String,
    pub notifications: FanOut,
}

#[derive(Debug, Deserialize)]
pub struct MessageAuthor {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListedMessage {
    pub id: String,
    pub author: MessageAuthor,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct Notification {
    pub id: String,
    pub channel_id: String,
    pub message_id: String,
    pub author_id: String,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
