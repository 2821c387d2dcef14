//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chat_core::NotificationKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Message Responses
// ============================================================================

/// Author shown next to a message
#[derive(Debug, Clone, Serialize)]
pub struct MessageAuthorResponse {
    pub id: String,
    pub name: String,
}

/// Message in a channel listing
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub channel_id: String,
    pub author: MessageAuthorResponse,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of the notification fan-out that follows a send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FanOutStatus {
    Delivered { recipients: usize, created: u64 },
    /// The message is stored but recipients were not notified
    Failed { retryable: bool },
}

/// Response to a successful send
#[derive(Debug, Clone, Serialize)]
pub struct SentMessageResponse {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub notifications: FanOutStatus,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub channel_id: String,
    pub message_id: String,
    pub author_id: String,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health of the two stores the service depends on
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && redis_healthy { "ready" } else { "not_ready" }
                .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
