//! Cache Root Module
//!
//! The process-wide aggregate: one facade per entity type plus the
//! immutability flag. Built once at startup and passed around explicitly.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::cache::item::Mode;
use crate::cache::{CacheStats, EntityCache};
use crate::config::CacheConfig;
use crate::entity::{Channel, Entity, Guild, Message, Snowflake, User};
use crate::error::Result;

// == Cache ==
/// Local mirror of server-pushed entities.
///
/// Stores are independent; no operation holds two store locks at once.
#[derive(Debug)]
pub struct Cache {
    immutable: bool,
    channels: EntityCache<Channel>,
    users: EntityCache<User>,
    guilds: EntityCache<Guild>,
    messages: EntityCache<Message>,
}

impl Cache {
    // == Constructor ==
    /// Builds every enabled store from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let mode = Mode::from_immutable(config.immutable);
        let cache = Self {
            immutable: config.immutable,
            channels: EntityCache::new(&config.channels, mode),
            users: EntityCache::new(&config.users, mode),
            guilds: EntityCache::new(&config.guilds, mode),
            messages: EntityCache::new(&config.messages, mode),
        };
        info!(
            "Entity cache initialized: immutable={}, enabled=[{}]",
            cache.immutable,
            cache.enabled_kinds().join(", ")
        );
        cache
    }

    /// Whether values are deep-copied across the cache boundary.
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    // == Channels ==
    /// Adds a new channel or updates an existing one.
    pub fn set_channel(&self, channel: impl Into<Arc<Channel>>) {
        self.channels.set(channel.into());
    }

    /// Records a channel's last pin timestamp, creating a placeholder if the channel is unknown.
    pub fn update_channel_pin(&self, id: Snowflake, timestamp: DateTime<Utc>) {
        self.channels
            .patch(id, |channel| channel.last_pin_timestamp = Some(timestamp));
    }

    /// Records a channel's last message id, creating a placeholder if the channel is unknown.
    pub fn update_channel_last_message_id(&self, channel_id: Snowflake, message_id: Snowflake) {
        if message_id.is_empty() {
            return;
        }
        self.channels
            .patch(channel_id, |channel| channel.last_message_id = Some(message_id));
    }

    /// Returns a channel with direct-message recipients resolved from the user cache.
    ///
    /// The channel store lock is released before any user lookup.
    pub fn get_channel(&self, id: Snowflake) -> Result<Arc<Channel>> {
        let checkout = self.channels.checkout(id)?;
        Ok(checkout.expand(|user_id| self.users.get(user_id)))
    }

    pub fn delete_channel(&self, id: Snowflake) {
        self.channels.delete(id);
    }

    // == Users ==
    pub fn set_user(&self, user: impl Into<Arc<User>>) {
        self.users.set(user.into());
    }

    pub fn get_user(&self, id: Snowflake) -> Result<Arc<User>> {
        self.users.get(id)
    }

    pub fn delete_user(&self, id: Snowflake) {
        self.users.delete(id);
    }

    // == Guilds ==
    pub fn set_guild(&self, guild: impl Into<Arc<Guild>>) {
        self.guilds.set(guild.into());
    }

    pub fn get_guild(&self, id: Snowflake) -> Result<Arc<Guild>> {
        self.guilds.get(id)
    }

    pub fn delete_guild(&self, id: Snowflake) {
        self.guilds.delete(id);
    }

    // == Messages ==
    pub fn set_message(&self, message: impl Into<Arc<Message>>) {
        self.messages.set(message.into());
    }

    pub fn get_message(&self, id: Snowflake) -> Result<Arc<Message>> {
        self.messages.get(id)
    }

    pub fn delete_message(&self, id: Snowflake) {
        self.messages.delete(id);
    }

    // == Maintenance ==
    /// Removes expired entries from every enabled store.
    pub fn purge_expired(&self) -> usize {
        self.channels.purge_expired()
            + self.users.purge_expired()
            + self.guilds.purge_expired()
            + self.messages.purge_expired()
    }

    /// Statistics of every enabled store, keyed by entity kind.
    pub fn stats(&self) -> BTreeMap<&'static str, CacheStats> {
        [
            (Channel::KIND, self.channels.stats()),
            (User::KIND, self.users.stats()),
            (Guild::KIND, self.guilds.stats()),
            (Message::KIND, self.messages.stats()),
        ]
        .into_iter()
        .filter_map(|(kind, stats)| stats.map(|stats| (kind, stats)))
        .collect()
    }

    fn enabled_kinds(&self) -> Vec<&'static str> {
        self.stats().into_keys().collect()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
