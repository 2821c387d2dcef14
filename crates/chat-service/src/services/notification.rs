//! Notification service
//!
//! Unread markers for channel activity. Fan-out keeps at most one unread
//! notification per (recipient, channel); later messages do not advance it.

use std::collections::HashSet;

use chat_core::{Notification, Snowflake};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};

use crate::dto::NotificationResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Upper bound on in-flight `has_unread` lookups during one fan-out
const MAX_CONCURRENT_UNREAD_CHECKS: usize = 8;

/// What a fan-out did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanOutReport {
    /// Distinct recipients other than the author
    pub recipients: usize,
    /// Notifications actually inserted
    pub created: u64,
}

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Notify every member of the channel about a new message.
    ///
    /// If the member list cannot be resolved nothing is inserted and the
    /// error is [`ServiceError::DependencyUnavailable`].
    #[instrument(skip(self))]
    pub async fn fan_out_to_members(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        author_id: Snowflake,
    ) -> ServiceResult<FanOutReport> {
        let members = self
            .ctx
            .membership()
            .list_channel_members(channel_id)
            .await
            .map_err(|e| ServiceError::dependency_unavailable(format!("channel members: {e}")))?;

        self.fan_out_on_send(channel_id, message_id, author_id, &members)
            .await
    }

    /// Create an unread notification for each recipient that has none in
    /// this channel yet. The author is never notified and duplicates in
    /// `recipients` are ignored.
    ///
    /// All new rows are written in one store call, so either every
    /// recipient is notified or none is.
    #[instrument(skip(self, recipients), fields(candidates = recipients.len()))]
    pub async fn fan_out_on_send(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        author_id: Snowflake,
        recipients: &[Snowflake],
    ) -> ServiceResult<FanOutReport> {
        if !self.ctx.channel_repo().exists(channel_id).await? {
            return Err(ServiceError::not_found("Channel", channel_id));
        }

        let mut seen = HashSet::with_capacity(recipients.len());
        let targets: Vec<Snowflake> = recipients
            .iter()
            .copied()
            .filter(|id| *id != author_id && seen.insert(*id))
            .collect();

        let store = self.ctx.notification_repo();
        let existing: Vec<bool> = stream::iter(targets.iter().copied())
            .map(|recipient| store.has_unread(recipient, channel_id))
            .buffered(MAX_CONCURRENT_UNREAD_CHECKS)
            .try_collect()
            .await?;

        let batch: Vec<Notification> = targets
            .iter()
            .zip(existing)
            .filter(|(_, has_unread)| !has_unread)
            .map(|(recipient, _)| {
                Notification::new_message(
                    self.ctx.generate_id(),
                    *recipient,
                    channel_id,
                    message_id,
                    author_id,
                )
            })
            .collect();

        let created = if batch.is_empty() {
            0
        } else {
            store.insert_unread_batch(&batch).await?
        };

        let report = FanOutReport {
            recipients: targets.len(),
            created,
        };
        if created > 0 {
            info!(recipients = report.recipients, created, "Notifications created");
        } else {
            debug!(recipients = report.recipients, "All recipients already notified");
        }
        Ok(report)
    }

    /// Every unread notification for a user
    #[instrument(skip(self))]
    pub async fn list_unread(&self, user_id: Snowflake) -> ServiceResult<Vec<NotificationResponse>> {
        let unread = self.ctx.notification_repo().find_unread(user_id).await?;
        Ok(unread.into_iter().map(NotificationResponse::from).collect())
    }

    /// Unread notifications for a user in one channel
    #[instrument(skip(self))]
    pub async fn list_unread_for_channel(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<Vec<NotificationResponse>> {
        let unread = self
            .ctx
            .notification_repo()
            .find_unread_in_channel(user_id, channel_id)
            .await?;
        Ok(unread.into_iter().map(NotificationResponse::from).collect())
    }

    /// Mark the user's unread notifications in a channel as read.
    ///
    /// Only notifications that exist when the update runs are affected.
    #[instrument(skip(self))]
    pub async fn mark_channel_read(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<u64> {
        let marked = self
            .ctx
            .notification_repo()
            .mark_channel_read(user_id, channel_id)
            .await?;
        debug!(marked, "Channel notifications marked read");
        Ok(marked)
    }

    /// Mark all of the user's unread notifications as read
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Snowflake) -> ServiceResult<u64> {
        let marked = self.ctx.notification_repo().mark_all_read(user_id).await?;
        debug!(marked, "All notifications marked read");
        Ok(marked)
    }
}
