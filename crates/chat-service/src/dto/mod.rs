//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreateMessageRequest, ListMessagesQuery, TypingRequest, UnreadNotificationsQuery};

pub use responses::{
    FanOutStatus, HealthChecks, HealthResponse, MessageAuthorResponse, MessageResponse,
    NotificationResponse, ReadinessResponse, SentMessageResponse,
};

pub use mappers::{MessageWithAuthor, UNKNOWN_AUTHOR_NAME};
