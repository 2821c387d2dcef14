//! # chat-service
//!
//! Application layer: typing presence, notification fan-out and the message
//! send path, plus the DTOs the HTTP layer serializes.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::{
    FanOutReport, IdentityService, MessageService, NotificationService, PresenceService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
