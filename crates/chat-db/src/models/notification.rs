//! Notification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub recipient_id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub author_id: i64,
    pub is_read: bool,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
