//! Typing record - ephemeral "user is typing" state per (channel, user)

use crate::value_objects::Snowflake;

/// Default window during which a typing signal counts as active (10s)
pub const DEFAULT_ACTIVE_WINDOW_MS: i64 = 10_000;

/// Default age after which a typing record is swept from storage (60s)
pub const DEFAULT_RETENTION_WINDOW_MS: i64 = 60_000;

/// One typing-state record, unique per (channel_id, user_id)
///
/// Absence of a record means "not typing". A record older than the active
/// window is logically expired even if the sweep has not removed it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingRecord {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    /// Snapshot of the user's name at the last signal
    pub display_name: String,
    /// Unix milliseconds of the last "is typing" signal
    pub last_typed_at: i64,
}

impl TypingRecord {
    pub fn new(
        channel_id: Snowflake,
        user_id: Snowflake,
        display_name: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            channel_id,
            user_id,
            display_name: display_name.into(),
            last_typed_at: now_ms,
        }
    }

    /// Lower bound (inclusive) of `last_typed_at` for active records
    #[inline]
    pub fn active_since(now_ms: i64, active_window_ms: i64) -> i64 {
        now_ms.saturating_sub(active_window_ms)
    }

    /// `last_typed_at` values strictly below this are eligible for the sweep
    #[inline]
    pub fn expiry_cutoff(now_ms: i64, retention_window_ms: i64) -> i64 {
        now_ms.saturating_sub(retention_window_ms)
    }

    #[inline]
    pub fn is_active(&self, now_ms: i64, active_window_ms: i64) -> bool {
        self.last_typed_at >= Self::active_since(now_ms, active_window_ms)
    }
}
