//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod health;
pub mod messages;
pub mod notifications;
pub mod typing;

/// Current wall-clock time in Unix milliseconds, passed explicitly to the
/// presence operations
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
