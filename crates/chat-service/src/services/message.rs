//! Message service
//!
//! The send path (persist, then fan out notifications) and channel history.

use std::collections::HashMap;

use chat_core::{DomainError, Message, Snowflake, MAX_MESSAGE_LENGTH};
use tracing::{info, instrument, warn};

use crate::dto::{
    CreateMessageRequest, FanOutStatus, MessageResponse, MessageWithAuthor, SentMessageResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store a message and notify the channel's other members.
    ///
    /// Once the message is stored the send succeeds. A failed fan-out is
    /// reported in the response's `notifications` field instead of as an
    /// error.
    #[instrument(skip(self, request))]
    pub async fn send_message(
        &self,
        channel_id: Snowflake,
        author_id: Snowflake,
        request: CreateMessageRequest,
    ) -> ServiceResult<SentMessageResponse> {
        if Message::is_blank(&request.content) {
            return Err(DomainError::EmptyContent.into());
        }
        if Message::is_too_long(&request.content) {
            return Err(DomainError::ContentTooLong {
                max: MAX_MESSAGE_LENGTH,
            }
            .into());
        }

        if !self.ctx.channel_repo().exists(channel_id).await? {
            return Err(ServiceError::not_found("Channel", channel_id));
        }

        let message = Message::new(self.ctx.generate_id(), channel_id, author_id, request.content);
        self.ctx.message_repo().create(&message).await?;

        info!(message_id = %message.id, "Message created");

        let notifications = match NotificationService::new(self.ctx)
            .fan_out_to_members(channel_id, message.id, author_id)
            .await
        {
            Ok(report) => FanOutStatus::Delivered {
                recipients: report.recipients,
                created: report.created,
            },
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Notification fan-out failed after send");
                FanOutStatus::Failed {
                    retryable: e.is_retryable(),
                }
            }
        };

        Ok(SentMessageResponse::new(message, notifications))
    }

    /// The latest `limit` messages of a channel, oldest first, with author names
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        channel_id: Snowflake,
        limit: i64,
    ) -> ServiceResult<Vec<MessageResponse>> {
        if !self.ctx.channel_repo().exists(channel_id).await? {
            return Err(ServiceError::not_found("Channel", channel_id));
        }

        let messages = self
            .ctx
            .message_repo()
            .find_by_channel(channel_id, limit)
            .await?;

        let mut author_ids: Vec<Snowflake> = messages.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Snowflake, _> = self
            .ctx
            .user_repo()
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(messages
            .into_iter()
            .map(|message| {
                let author = authors.get(&message.author_id).cloned();
                MessageResponse::from(MessageWithAuthor { message, author })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;

    fn request(content: &str) -> CreateMessageRequest {
        CreateMessageRequest {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let h = TestHarness::new();
        let channel = h.seed_channel("general").await;

        let err = MessageService::new(&h.ctx)
            .send_message(channel, Snowflake::new(1), request("   \n"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "EMPTY_CONTENT");
        assert_eq!(h.messages.count(), 0);
    }

    #[tokio::test]
    async fn test_overlong_message_is_rejected() {
        let h = TestHarness::new();
        let channel = h.seed_channel("general").await;

        let err = MessageService::new(&h.ctx)
            .send_message(channel, Snowflake::new(1), request(&"x".repeat(MAX_MESSAGE_LENGTH + 1)))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "CONTENT_TOO_LONG");
    }

    #[tokio::test]
    async fn test_send_to_unknown_channel() {
        let h = TestHarness::new();

        let err = MessageService::new(&h.ctx)
            .send_message(Snowflake::new(404), Snowflake::new(1), request("hi"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert_eq!(h.messages.count(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_failure_keeps_message() {
        let h = TestHarness::new();
        let channel = h.seed_channel("general").await;
        let author = h.seed_user(Snowflake::new(1), Some("alice")).await;
        h.seed_user(Snowflake::new(2), Some("bob")).await;
        h.membership.set_unavailable(true);

        let sent = MessageService::new(&h.ctx)
            .send_message(channel, author, request("hello"))
            .await
            .unwrap();

        assert_eq!(sent.notifications, FanOutStatus::Failed { retryable: true });
        assert_eq!(h.messages.count(), 1);
        assert_eq!(h.notifications.count(), 0);
    }

    #[tokio::test]
    async fn test_send_read_send_scenario() {
        let h = TestHarness::new();
        let channel = h.seed_channel("general").await;
        let u1 = h.seed_user(Snowflake::new(1), Some("alice")).await;
        let u2 = h.seed_user(Snowflake::new(2), Some("bob")).await;
        let messages = MessageService::new(&h.ctx);
        let notifications = NotificationService::new(&h.ctx);

        let m1 = messages.send_message(channel, u1, request("first")).await.unwrap();
        assert_eq!(
            m1.notifications,
            FanOutStatus::Delivered { recipients: 1, created: 1 }
        );

        let unread = notifications.list_unread(u2).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].channel_id, channel.to_string());
        assert_eq!(unread[0].message_id, m1.id);
        assert!(!unread[0].is_read);
        assert!(notifications.list_unread(u1).await.unwrap().is_empty());

        notifications.mark_channel_read(u2, channel).await.unwrap();
        assert!(notifications.list_unread(u2).await.unwrap().is_empty());

        let m2 = messages.send_message(channel, u1, request("second")).await.unwrap();
        let unread = notifications.list_unread(u2).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message_id, m2.id);
    }

    #[tokio::test]
    async fn test_list_messages_resolves_authors() {
        let h = TestHarness::new();
        let channel = h.seed_channel("general").await;
        let alice = h.seed_user(Snowflake::new(1), Some("alice")).await;
        let service = MessageService::new(&h.ctx);

        service.send_message(channel, alice, request("one")).await.unwrap();
        service.send_message(channel, Snowflake::new(77), request("two")).await.unwrap();

        let listed = service.list_messages(channel, 50).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "one");
        assert_eq!(listed[0].author.name, "alice");
        assert_eq!(listed[1].author.name, "Unknown User");
    }
}
