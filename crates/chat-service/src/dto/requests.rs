//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and, where they carry user
//! input, `Validate`.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Typing Requests
// ============================================================================

/// Typing signal; `false` clears the caller's record
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct TypingRequest {
    pub is_typing: bool,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send message request
///
/// Content rules (blank, too long) belong to the message service so they
/// surface as `EMPTY_CONTENT` / `CONTENT_TOO_LONG`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub content: String,
}

/// Query parameters for listing channel messages
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct ListMessagesQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl ListMessagesQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

// ============================================================================
// Notification Requests
// ============================================================================

/// Query parameters for listing unread notifications
///
/// The channel id stays a string here; the handler parses it so a malformed
/// id is reported as a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnreadNotificationsQuery {
    pub channel_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_message_leaves_length_to_service() {
        let long = CreateMessageRequest {
            content: "a".repeat(chat_core::MAX_MESSAGE_LENGTH + 1),
        };
        assert!(long.validate().is_ok());

        let req: CreateMessageRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(req.content, "hi");
    }

    #[test]
    fn test_list_messages_limit() {
        assert_eq!(ListMessagesQuery::default().limit(), 50);
        assert!(ListMessagesQuery { limit: Some(0) }.validate().is_err());
        assert!(ListMessagesQuery { limit: Some(101) }.validate().is_err());
        assert!(ListMessagesQuery { limit: Some(100) }.validate().is_ok());
    }

    #[test]
    fn test_typing_request_deserialize() {
        let req: TypingRequest = serde_json::from_str(r#"{"is_typing":true}"#).unwrap();
        assert!(req.is_typing);
        assert!(serde_json::from_str::<TypingRequest>("{}").is_err());
    }
}
