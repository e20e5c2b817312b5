//! Channel entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{overlay_field, Entity, Snowflake, User};

// == Channel Type ==
/// Channel variants as numbered on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChannelType {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
}

impl ChannelType {
    /// Direct-message variants are the only channels that list recipients.
    pub fn has_recipients(&self) -> bool {
        matches!(self, ChannelType::Dm | ChannelType::GroupDm)
    }
}

impl TryFrom<u8> for ChannelType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChannelType::GuildText),
            1 => Ok(ChannelType::Dm),
            2 => Ok(ChannelType::GuildVoice),
            3 => Ok(ChannelType::GroupDm),
            4 => Ok(ChannelType::GuildCategory),
            other => Err(format!("unknown channel type: {}", other)),
        }
    }
}

impl From<ChannelType> for u8 {
    fn from(kind: ChannelType) -> Self {
        match kind {
            ChannelType::GuildText => 0,
            ChannelType::Dm => 1,
            ChannelType::GuildVoice => 2,
            ChannelType::GroupDm => 3,
            ChannelType::GuildCategory => 4,
        }
    }
}

// == Channel ==
/// A guild or direct-message channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: Option<ChannelType>,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub topic: Option<String>,
    pub position: Option<i32>,
    pub nsfw: Option<bool>,
    pub last_message_id: Option<Snowflake>,
    pub last_pin_timestamp: Option<DateTime<Utc>>,
    /// Users in a direct-message channel. Empty for guild channels.
    pub recipients: Vec<User>,
}

impl Channel {
    /// Creates a channel of the given type.
    pub fn new(id: impl Into<Snowflake>, kind: ChannelType) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Whether this channel's variant lists recipients.
    pub fn is_direct(&self) -> bool {
        self.kind.is_some_and(|kind| kind.has_recipients())
    }
}

impl Entity for Channel {
    const KIND: &'static str = "channels";
    const WEIGHT_MIB: f64 = 0.005;

    fn id(&self) -> Snowflake {
        self.id
    }

    fn placeholder(id: Snowflake) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    // Recipients are owned by the wrapper's reference list, not overlaid here.
    fn overlay(&mut self, fresh: &Self) {
        overlay_field(&mut self.kind, &fresh.kind);
        overlay_field(&mut self.guild_id, &fresh.guild_id);
        overlay_field(&mut self.name, &fresh.name);
        overlay_field(&mut self.topic, &fresh.topic);
        overlay_field(&mut self.position, &fresh.position);
        overlay_field(&mut self.nsfw, &fresh.nsfw);
        overlay_field(&mut self.last_message_id, &fresh.last_message_id);
        overlay_field(&mut self.last_pin_timestamp, &fresh.last_pin_timestamp);
    }

    fn nested_ids(&self) -> Vec<Snowflake> {
        self.recipients.iter().map(|user| user.id).collect()
    }

    fn has_nested(&self) -> bool {
        !self.recipients.is_empty()
    }

    fn clear_nested(&mut self) {
        self.recipients.clear();
    }
}
