//! Notification entity - per-recipient unread marker for channel activity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::Snowflake;

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A message was posted in a channel the recipient belongs to
    #[default]
    NewMessage,
}

impl NotificationKind {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewMessage => "new_message",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised stored notification kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct UnknownNotificationKind(pub String);

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_message" => Ok(Self::NewMessage),
            other => Err(UnknownNotificationKind(other.to_string())),
        }
    }
}

/// Notification entity
///
/// Fan-out keeps at most one unread notification per (recipient, channel).
/// The `message_id` is the message that first produced unseen activity and
/// is never advanced by later messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Snowflake,
    pub recipient_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub author_id: Snowflake,
    pub is_read: bool,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread new-message notification
    pub fn new_message(
        id: Snowflake,
        recipient_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
        author_id: Snowflake,
    ) -> Self {
        Self {
            id,
            recipient_id,
            channel_id,
            message_id,
            author_id,
            is_read: false,
            kind: NotificationKind::NewMessage,
            created_at: Utc::now(),
        }
    }

    /// Mark as read; returns false if it already was
    pub fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.is_read, true)
    }
}
