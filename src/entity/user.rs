//! User entity.

use serde::{Deserialize, Serialize};

use super::{overlay_field, Entity, Snowflake};

/// A protocol user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Snowflake,
    pub username: Option<String>,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    pub bot: Option<bool>,
}

impl User {
    /// Creates a user with the given id and username.
    pub fn new(id: impl Into<Snowflake>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: Some(username.into()),
            ..Default::default()
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "users";
    const WEIGHT_MIB: f64 = 0.001;

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
        overlay_field(&mut self.username, &fresh.username);
        overlay_field(&mut self.discriminator, &fresh.discriminator);
        overlay_field(&mut self.avatar, &fresh.avatar);
        overlay_field(&mut self.bot, &fresh.bot);
    }
}
