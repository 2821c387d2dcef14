//! Channel entity - a conversation that messages, typing records and
//! notifications are scoped to

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Channel entity
///
/// Only the identity is consulted by the presence and notification paths;
/// the name is carried for seeding and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Channel {
    /// Create a new channel
    #[must_use]
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Name with surrounding whitespace removed
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.trim()
    }
}
