//! Guild entity.

use serde::{Deserialize, Serialize};

use super::{overlay_field, Entity, Snowflake};

/// A guild (server) that groups channels and members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Guild {
    pub id: Snowflake,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub owner_id: Option<Snowflake>,
    pub member_count: Option<u64>,
    pub unavailable: Option<bool>,
}

impl Entity for Guild {
    const KIND: &'static str = "guilds";
    const WEIGHT_MIB: f64 = 0.01;

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
        overlay_field(&mut self.name, &fresh.name);
        overlay_field(&mut self.icon, &fresh.icon);
        overlay_field(&mut self.owner_id, &fresh.owner_id);
        overlay_field(&mut self.member_count, &fresh.member_count);
        overlay_field(&mut self.unavailable, &fresh.unavailable);
    }
}
