//! Cache Module
//!
//! The entity caching engine: one locked, capacity-bounded store per entity
//! type, a pluggable eviction strategy, a configurable immutability contract
//! and cross-entity reference resolution.

mod entry;
pub mod eviction;
mod facade;
mod item;
mod root;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::StoreEntry;
pub use eviction::{Algorithm, EvictionStrategy};
pub use facade::EntityCache;
pub use item::{CacheItem, Checkout, Mode};
pub use root::Cache;
pub use stats::{CacheStats, StatsCounters};
pub use store::{EntityStore, Upsert};
