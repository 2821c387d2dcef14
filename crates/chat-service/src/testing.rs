//! In-memory adapters for the repository ports, for tests in this and
//! dependent crates (feature `testing`)

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chat_core::{
    Channel, ChannelMembership, ChannelRepository, DomainError, Message, MessageRepository,
    Notification, NotificationRepository, RepoResult, Snowflake, SnowflakeGenerator,
    TypingRecord, TypingRepository, User, UserRepository,
};
use parking_lot::RwLock;

use crate::services::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
pub struct InMemoryTypingStore {
    records: RwLock<HashMap<(Snowflake, Snowflake), TypingRecord>>,
}

impl InMemoryTypingStore {
    pub fn count(&self) -> usize {
        self.records.read().len()
    }
}

#[async_trait]
impl TypingRepository for InMemoryTypingStore {
    async fn upsert(&self, record: &TypingRecord) -> RepoResult<()> {
        self.records
            .write()
            .insert((record.channel_id, record.user_id), record.clone());
        Ok(())
    }

    async fn find(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<TypingRecord>> {
        Ok(self.records.read().get(&(channel_id, user_id)).cloned())
    }

    async fn remove(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.records.write().remove(&(channel_id, user_id)).is_some())
    }

    async fn find_active(&self, channel_id: Snowflake, since_ms: i64) -> RepoResult<Vec<TypingRecord>> {
        let mut active: Vec<TypingRecord> = self
            .records
            .read()
            .values()
            .filter(|r| r.channel_id == channel_id && r.last_typed_at >= since_ms)
            .cloned()
            .collect();
        active.sort_by_key(|r| (r.last_typed_at, r.user_id));
        Ok(active)
    }

    async fn remove_older_than(&self, cutoff_ms: i64) -> RepoResult<u64> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, r| r.last_typed_at >= cutoff_ms);
        Ok((before - records.len()) as u64)
    }
}

/// Enforces one unread row per (recipient, channel) like the partial unique index
#[derive(Default)]
pub struct InMemoryNotificationStore {
    rows: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn count(&self) -> usize {
        self.rows.read().len()
    }

    pub fn unread_for(&self, recipient_id: Snowflake) -> Vec<Notification> {
        self.rows
            .read()
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationStore {
    async fn has_unread(&self, recipient_id: Snowflake, channel_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .rows
            .read()
            .iter()
            .any(|n| n.recipient_id == recipient_id && n.channel_id == channel_id && !n.is_read))
    }

    async fn insert_unread_batch(&self, notifications: &[Notification]) -> RepoResult<u64> {
        let mut rows = self.rows.write();
        let mut inserted = 0;
        for candidate in notifications {
            let conflict = rows.iter().any(|n| {
                n.recipient_id == candidate.recipient_id
                    && n.channel_id == candidate.channel_id
                    && !n.is_read
            });
            if !conflict {
                rows.push(candidate.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn find_unread(&self, recipient_id: Snowflake) -> RepoResult<Vec<Notification>> {
        Ok(self.unread_for(recipient_id))
    }

    async fn find_unread_in_channel(
        &self,
        recipient_id: Snowflake,
        channel_id: Snowflake,
    ) -> RepoResult<Vec<Notification>> {
        Ok(self
            .unread_for(recipient_id)
            .into_iter()
            .filter(|n| n.channel_id == channel_id)
            .collect())
    }

    async fn mark_channel_read(&self, recipient_id: Snowflake, channel_id: Snowflake) -> RepoResult<u64> {
        let mut rows = self.rows.write();
        let marked = rows
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && n.channel_id == channel_id)
            .map(Notification::mark_read)
            .filter(|changed| *changed)
            .count();
        Ok(marked as u64)
    }

    async fn mark_all_read(&self, recipient_id: Snowflake) -> RepoResult<u64> {
        let mut rows = self.rows.write();
        let marked = rows
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id)
            .map(Notification::mark_read)
            .filter(|changed| *changed)
            .count();
        Ok(marked as u64)
    }
}

#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageStore {
    pub fn count(&self) -> usize {
        self.messages.read().len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageStore {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages.write().push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.messages.read().iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_channel(&self, channel_id: Snowflake, limit: i64) -> RepoResult<Vec<Message>> {
        let mut in_channel: Vec<Message> = self
            .messages
            .read()
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .cloned()
            .collect();
        in_channel.sort_by_key(|m| m.id);
        let skip = in_channel.len().saturating_sub(limit.clamp(1, 100) as usize);
        Ok(in_channel.split_off(skip))
    }
}

#[derive(Default)]
pub struct InMemoryChannelStore {
    channels: RwLock<HashMap<Snowflake, Channel>>,
}

#[async_trait]
impl ChannelRepository for InMemoryChannelStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        Ok(self.channels.read().get(&id).cloned())
    }

    async fn exists(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self.channels.read().contains_key(&id))
    }

    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        self.channels.write().insert(channel.id, channel.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Snowflake, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        let users = self.users.read();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        self.users.write().insert(user.id, user.clone());
        Ok(())
    }
}

/// Every known user is a member of every channel
pub struct InMemoryMembership {
    users: Arc<InMemoryUserStore>,
    unavailable: AtomicBool,
}

impl InMemoryMembership {
    pub fn new(users: Arc<InMemoryUserStore>) -> Self {
        Self {
            users,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every lookup fail until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChannelMembership for InMemoryMembership {
    async fn list_channel_members(&self, _channel_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::DependencyUnavailable("membership offline".to_string()));
        }
        let mut ids: Vec<Snowflake> = self.users.users.read().keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

/// A service context over fresh in-memory stores, with handles to inspect them
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub typing: Arc<InMemoryTypingStore>,
    pub notifications: Arc<InMemoryNotificationStore>,
    pub messages: Arc<InMemoryMessageStore>,
    pub channels: Arc<InMemoryChannelStore>,
    pub users: Arc<InMemoryUserStore>,
    pub membership: Arc<InMemoryMembership>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        let typing = Arc::new(InMemoryTypingStore::default());
        let notifications = Arc::new(InMemoryNotificationStore::default());
        let messages = Arc::new(InMemoryMessageStore::default());
        let channels = Arc::new(InMemoryChannelStore::default());
        let users = Arc::new(InMemoryUserStore::default());
        let membership = Arc::new(InMemoryMembership::new(Arc::clone(&users)));

        let ctx = ServiceContextBuilder::new()
            .typing_repo(typing.clone())
            .notification_repo(notifications.clone())
            .message_repo(messages.clone())
            .channel_repo(channels.clone())
            .user_repo(users.clone())
            .membership(membership.clone())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .expect("all repositories provided");

        Self {
            ctx,
            typing,
            notifications,
            messages,
            channels,
            users,
            membership,
        }
    }

    pub async fn seed_channel(&self, name: &str) -> Snowflake {
        let channel = Channel::new(self.ctx.generate_id(), name);
        self.channels.create(&channel).await.unwrap();
        channel.id
    }

    pub async fn seed_user(&self, id: Snowflake, name: Option<&str>) -> Snowflake {
        self.users
            .create(&User::new(id, name.map(str::to_string)))
            .await
            .unwrap();
        id
    }
}
