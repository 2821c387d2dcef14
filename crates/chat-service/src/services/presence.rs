//! Presence service
//!
//! Typing indicators. Presence is read on demand by polling clients; nothing
//! is pushed when a record changes.

use std::collections::HashSet;

use chat_core::{Snowflake, TypingRecord, User};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record or clear a typing signal.
    ///
    /// `true` inserts the record or refreshes its timestamp and name;
    /// `false` removes it, and removing an absent record is a no-op.
    #[instrument(skip(self, display_name))]
    pub async fn set_typing(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        display_name: Option<&str>,
        is_typing: bool,
        now_ms: i64,
    ) -> ServiceResult<()> {
        let store = self.ctx.typing_repo();

        if is_typing {
            let name = User::normalize_display_name(display_name);
            store
                .upsert(&TypingRecord::new(channel_id, user_id, name, now_ms))
                .await?;
            debug!(last_typed_at = now_ms, "Typing signal recorded");
        } else {
            let removed = store.remove(channel_id, user_id).await?;
            debug!(removed, "Typing signal cleared");
        }

        Ok(())
    }

    /// Names of users typing in a channel within the active window, oldest
    /// signal first, without the caller and with one entry per user.
    #[instrument(skip(self))]
    pub async fn list_active_typists(
        &self,
        channel_id: Snowflake,
        exclude_user_id: Snowflake,
        now_ms: i64,
        active_window_ms: i64,
    ) -> ServiceResult<Vec<String>> {
        let since = TypingRecord::active_since(now_ms, active_window_ms);
        let records = self.ctx.typing_repo().find_active(channel_id, since).await?;

        let mut seen = HashSet::with_capacity(records.len());
        let names = records
            .into_iter()
            .filter(|r| r.user_id != exclude_user_id && r.is_active(now_ms, active_window_ms))
            .filter(|r| seen.insert(r.user_id))
            .map(|r| r.display_name)
            .collect();

        Ok(names)
    }

    /// Delete every record older than the retention window; returns how many
    /// were removed.
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self, now_ms: i64, retention_window_ms: i64) -> ServiceResult<u64> {
        let cutoff = TypingRecord::expiry_cutoff(now_ms, retention_window_ms);
        let removed = self.ctx.typing_repo().remove_older_than(cutoff).await?;

        info!(removed, cutoff, "Expired typing records swept");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;
    use chat_core::{TypingRepository, DEFAULT_ACTIVE_WINDOW_MS};

    const NOW: i64 = 1_750_000_000_000;
    const WINDOW: i64 = DEFAULT_ACTIVE_WINDOW_MS;
    const RETENTION: i64 = 60_000;

    #[tokio::test]
    async fn test_clearing_twice_is_a_no_op() {
        let h = TestHarness::new();
        let presence = PresenceService::new(&h.ctx);
        let (channel, user) = (Snowflake::new(1), Snowflake::new(2));

        presence.set_typing(channel, user, Some("alice"), true, NOW).await.unwrap();
        presence.set_typing(channel, user, None, false, NOW).await.unwrap();
        presence.set_typing(channel, user, None, false, NOW).await.unwrap();

        assert!(h.typing.find(channel, user).await.unwrap().is_none());
        assert_eq!(h.typing.count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_keeps_single_record_with_latest_time() {
        let h = TestHarness::new();
        let presence = PresenceService::new(&h.ctx);
        let (channel, user) = (Snowflake::new(1), Snowflake::new(2));

        presence.set_typing(channel, user, Some("alice"), true, NOW).await.unwrap();
        presence
            .set_typing(channel, user, Some("Alice B"), true, NOW + 2_000)
            .await
            .unwrap();

        let record = h.typing.find(channel, user).await.unwrap().unwrap();
        assert_eq!(record.last_typed_at, NOW + 2_000);
        assert_eq!(record.display_name, "Alice B");
        assert_eq!(h.typing.count(), 1);
    }

    #[tokio::test]
    async fn test_blank_name_is_stored_as_anonymous() {
        let h = TestHarness::new();
        let presence = PresenceService::new(&h.ctx);
        let (channel, user) = (Snowflake::new(1), Snowflake::new(2));

        presence.set_typing(channel, user, Some("  "), true, NOW).await.unwrap();

        let names = presence
            .list_active_typists(channel, Snowflake::new(99), NOW, WINDOW)
            .await
            .unwrap();
        assert_eq!(names, vec!["Anonymous".to_string()]);
    }

    #[tokio::test]
    async fn test_window_excludes_stale_records() {
        let h = TestHarness::new();
        let presence = PresenceService::new(&h.ctx);
        let channel = Snowflake::new(1);

        presence
            .set_typing(channel, Snowflake::new(2), Some("recent"), true, NOW - 5_000)
            .await
            .unwrap();
        presence
            .set_typing(channel, Snowflake::new(3), Some("stale"), true, NOW - 15_000)
            .await
            .unwrap();

        let names = presence
            .list_active_typists(channel, Snowflake::new(99), NOW, WINDOW)
            .await
            .unwrap();
        assert_eq!(names, vec!["recent".to_string()]);
    }

    #[tokio::test]
    async fn test_caller_is_never_listed() {
        let h = TestHarness::new();
        let presence = PresenceService::new(&h.ctx);
        let (channel, me, other) = (Snowflake::new(1), Snowflake::new(2), Snowflake::new(3));

        presence.set_typing(channel, me, Some("me"), true, NOW - 1_000).await.unwrap();
        presence.set_typing(channel, other, Some("bob"), true, NOW).await.unwrap();

        let names = presence.list_active_typists(channel, me, NOW, WINDOW).await.unwrap();
        assert_eq!(names, vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn test_typists_are_ordered_and_scoped_to_channel() {
        let h = TestHarness::new();
        let presence = PresenceService::new(&h.ctx);
        let (channel, elsewhere) = (Snowflake::new(1), Snowflake::new(5));

        presence.set_typing(channel, Snowflake::new(3), Some("second"), true, NOW - 1_000).await.unwrap();
        presence.set_typing(channel, Snowflake::new(2), Some("first"), true, NOW - 3_000).await.unwrap();
        presence.set_typing(elsewhere, Snowflake::new(4), Some("other"), true, NOW).await.unwrap();

        let names = presence
            .list_active_typists(channel, Snowflake::new(99), NOW, WINDOW)
            .await
            .unwrap();
        assert_eq!(names, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_records() {
        let h = TestHarness::new();
        let presence = PresenceService::new(&h.ctx);
        let channel = Snowflake::new(1);

        presence.set_typing(channel, Snowflake::new(2), Some("old"), true, NOW - RETENTION - 1).await.unwrap();
        presence.set_typing(channel, Snowflake::new(3), Some("edge"), true, NOW - RETENTION).await.unwrap();
        presence.set_typing(channel, Snowflake::new(4), Some("new"), true, NOW).await.unwrap();

        let removed = presence.sweep_expired(NOW, RETENTION).await.unwrap();
        assert_eq!(removed, 1);

        assert!(h.typing.find(channel, Snowflake::new(2)).await.unwrap().is_none());
        assert!(h.typing.find(channel, Snowflake::new(3)).await.unwrap().is_some());
        assert!(h.typing.find(channel, Snowflake::new(4)).await.unwrap().is_some());

        assert_eq!(presence.sweep_expired(NOW, RETENTION).await.unwrap(), 0);
    }
}
