//! Store Entry Module
//!
//! Bookkeeping metadata wrapped around every stored item. Eviction decisions
//! are made from this metadata alone, never from the item itself.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Store Entry ==
/// A stored item plus the metadata consumed by eviction.
///
/// Access bookkeeping is atomic so that reads under a shared lock can record it.
#[derive(Debug)]
pub struct StoreEntry<T> {
    /// The stored item
    pub item: T,
    /// Logical clock value at insertion
    pub inserted: u64,
    /// Last write timestamp (Unix milliseconds), drives lifetime expiry
    pub updated_at: u64,
    /// Logical clock value of the most recent access
    last_access: AtomicU64,
    /// Number of recorded accesses
    hits: AtomicU64,
    /// Ordering key this entry is currently filed under in the eviction index
    pub(crate) rank: (u64, u64),
}

impl<T> StoreEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time and access tick.
    pub fn new(item: T, tick: u64) -> Self {
        Self {
            item,
            inserted: tick,
            updated_at: current_timestamp_ms(),
            last_access: AtomicU64::new(tick),
            hits: AtomicU64::new(0),
            rank: (0, 0),
        }
    }

    // == Record Access ==
    /// Marks the entry as read at `tick`.
    pub fn record_access(&self, tick: u64) {
        self.last_access.store(tick, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Refresh ==
    /// Marks the entry as rewritten at `tick`, restarting its lifetime.
    pub fn refresh(&mut self, tick: u64) {
        self.updated_at = current_timestamp_ms();
        self.record_access(tick);
    }

    /// Logical time of the most recent access.
    pub fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }

    /// Number of accesses recorded so far.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    // == Is Expired ==
    /// Checks whether the entry outlived `lifetime` since its last write.
    ///
    /// An entry is expired once the elapsed time is greater than or equal to
    /// the lifetime. `None` means entries never expire.
    pub fn is_expired(&self, lifetime: Option<Duration>) -> bool {
        match lifetime {
            Some(lifetime) => {
                let lifetime_ms = u64::try_from(lifetime.as_millis()).unwrap_or(u64::MAX);
                let expires = self.updated_at.saturating_add(lifetime_ms);
                current_timestamp_ms() >= expires
            }
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = StoreEntry::new("value", 7);

        assert_eq!(entry.item, "value");
        assert!(entry.updated_at > 0);
        assert_eq!(entry.inserted, 7);
        assert_eq!(entry.last_access(), 7);
        assert_eq!(entry.hits(), 0);
    }

    #[test]
    fn test_record_access() {
        let entry = StoreEntry::new("value", 1);

        entry.record_access(5);
        entry.record_access(9);

        assert_eq!(entry.last_access(), 9);
        assert_eq!(entry.hits(), 2);
    }

    #[test]
    fn test_no_lifetime_never_expires() {
        let entry = StoreEntry::new("value", 0);
        assert!(!entry.is_expired(None));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoreEntry::new("value", 0);

        assert!(!entry.is_expired(Some(Duration::from_secs(60))));

        sleep(Duration::from_millis(60));

        assert!(entry.is_expired(Some(Duration::from_millis(50))));
    }

    #[test]
    fn test_refresh_restarts_lifetime() {
        let mut entry = StoreEntry::new("value", 0);
        sleep(Duration::from_millis(60));
        assert!(entry.is_expired(Some(Duration::from_millis(50))));

        entry.refresh(1);

        assert!(!entry.is_expired(Some(Duration::from_millis(50))));
        assert_eq!(entry.last_access(), 1);
    }

    #[test]
    fn test_huge_lifetime_does_not_wrap() {
        let entry = StoreEntry::new("value", 0);
        let centuries = Duration::from_secs(18_446_744_073_709_552);

        sleep(Duration::from_millis(450));

        assert!(!entry.is_expired(Some(centuries)));
        assert!(!entry.is_expired(Some(Duration::MAX)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut entry = StoreEntry::new("value", 0);
        entry.updated_at = current_timestamp_ms();

        assert!(entry.is_expired(Some(Duration::ZERO)), "Entry should be expired at boundary");
    }
}
