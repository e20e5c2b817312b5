//! Message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{overlay_field, Entity, Snowflake};

/// A message posted to a channel.
///
/// The author is kept as an identifier; message caching does not expand it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Option<Snowflake>,
    pub guild_id: Option<Snowflake>,
    pub author_id: Option<Snowflake>,
    pub content: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub edited_timestamp: Option<DateTime<Utc>>,
    pub pinned: Option<bool>,
}

impl Entity for Message {
    const KIND: &'static str = "messages";
    const WEIGHT_MIB: f64 = 0.002;

    fn id(&self) -> Snowflake {
        self.id
    }

    fn placeholder(id: Snowflake) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn overlay(&mut self, fresh: &Self) {
        overlay_field(&mut self.channel_id, &fresh.channel_id);
        overlay_field(&mut self.guild_id, &fresh.guild_id);
        overlay_field(&mut self.author_id, &fresh.author_id);
        overlay_field(&mut self.content, &fresh.content);
        overlay_field(&mut self.timestamp, &fresh.timestamp);
        overlay_field(&mut self.edited_timestamp, &fresh.edited_timestamp);
        overlay_field(&mut self.pinned, &fresh.pinned);
    }
}
