//! Entity Cache - a local mirror of chat-protocol entities
//!
//! Keeps channels, users, guilds and messages pushed by the server in
//! per-type bounded stores with pluggable eviction, an immutability
//! contract and resolution of cross-entity references.

pub mod api;
pub mod cache;
pub mod config;
pub mod entity;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::Cache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
