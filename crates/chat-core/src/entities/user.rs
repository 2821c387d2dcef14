//! User entity - represents a chat user

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Name shown for users without a usable display name
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new User
    pub fn new(id: Snowflake, name: Option<String>) -> Self {
        Self {
            id,
            name,
            created_at: Utc::now(),
        }
    }

    /// Name to show to other users, falling back to "Anonymous"
    pub fn display_name(&self) -> &str {
        Self::normalize_display_name(self.name.as_deref())
    }

    /// Trim a candidate name; missing or blank names become "Anonymous"
    pub fn normalize_display_name(name: Option<&str>) -> &str {
        match name.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => ANONYMOUS_DISPLAY_NAME,
        }
    }
}
