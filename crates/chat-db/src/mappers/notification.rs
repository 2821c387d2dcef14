//! Notification entity <-> model mapper

use chrono::{DateTime, Utc};

use chat_core::entities::{Notification, NotificationKind};
use chat_core::error::DomainError;
use chat_core::value_objects::Snowflake;

use crate::models::NotificationModel;

impl TryFrom<NotificationModel> for Notification {
    type Error = DomainError;

    fn try_from(model: NotificationModel) -> Result<Self, Self::Error> {
        let kind = model
            .kind
            .parse::<NotificationKind>()
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(Notification {
            id: Snowflake::new(model.id),
            recipient_id: Snowflake::new(model.recipient_id),
            channel_id: Snowflake::new(model.channel_id),
            message_id: Snowflake::new(model.message_id),
            author_id: Snowflake::new(model.author_id),
            is_read: model.is_read,
            kind,
            created_at: model.created_at,
        })
    }
}

/// Column-major view of a notification batch, bound as `UNNEST` arrays
#[derive(Debug, Default)]
pub struct NotificationColumns {
    pub ids: Vec<i64>,
    pub recipient_ids: Vec<i64>,
    pub channel_ids: Vec<i64>,
    pub message_ids: Vec<i64>,
    pub author_ids: Vec<i64>,
    pub kinds: Vec<String>,
    pub created_ats: Vec<DateTime<Utc>>,
}

impl NotificationColumns {
    pub fn new(notifications: &[Notification]) -> Self {
        let mut columns = Self::default();
        for n in notifications {
            columns.ids.push(n.id.into_inner());
            columns.recipient_ids.push(n.recipient_id.into_inner());
            columns.channel_ids.push(n.channel_id.into_inner());
            columns.message_ids.push(n.message_id.into_inner());
            columns.author_ids.push(n.author_id.into_inner());
            columns.kinds.push(n.kind.as_str().to_string());
            columns.created_ats.push(n.created_at);
        }
        columns
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
