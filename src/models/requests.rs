//! Request DTOs for the cache HTTP API
//!
//! Defines the structure of incoming partial-update bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::entity::Snowflake;

/// Request body for PATCH /channels/:id/pin
#[derive(Debug, Clone, Deserialize)]
pub struct PinRequest {
    /// When the most recent pin happened
    pub timestamp: DateTime<Utc>,
}

/// Request body for PATCH /channels/:id/last-message
#[derive(Debug, Clone, Deserialize)]
pub struct LastMessageRequest {
    /// The newest message posted in the channel
    pub message_id: Snowflake,
}

impl LastMessageRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.message_id.is_empty() {
            return Some("message_id cannot be empty".to_string());
        }
        None
    }
}
