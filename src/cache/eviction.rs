//! Eviction Strategy Module
//!
//! The pluggable policy deciding which entries survive capacity and lifetime
//! pressure. Strategies run under the owning store's lock and are not
//! internally synchronized beyond the atomic access bookkeeping on entries.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::StoreEntry;
use crate::entity::Snowflake;

// == Algorithm ==
/// Selects which entry is reclaimed when a store is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used
    Lfu,
    /// Oldest insertion first
    Ttl,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Lru => write!(f, "lru"),
            Algorithm::Lfu => write!(f, "lfu"),
            Algorithm::Ttl => write!(f, "ttl"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(Algorithm::Lru),
            "lfu" => Ok(Algorithm::Lfu),
            "ttl" => Ok(Algorithm::Ttl),
            other => Err(format!("unknown eviction algorithm: {}", other)),
        }
    }
}

// == Set Outcome ==
/// Entries reclaimed as a side effect of a `set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOutcome {
    /// Keys removed to respect capacity
    pub evicted: Vec<Snowflake>,
    /// Number of entries removed because their lifetime ran out
    pub expired: usize,
}

// == Strategy Contract ==
/// Keyed storage with an eviction policy.
///
/// Every method is called with the owning store's lock held: `get` under the
/// shared lock, everything taking `&mut self` under the exclusive lock.
pub trait EvictionStrategy<T>: Send + Sync {
    /// The configured algorithm.
    fn algorithm(&self) -> Algorithm;

    /// Maximum number of live entries, `None` when unbounded.
    fn capacity(&self) -> Option<usize>;

    /// Looks up a live entry and records the access.
    fn get(&self, id: Snowflake) -> Option<&StoreEntry<T>>;

    /// Looks up a live entry for in-place mutation without recording an access.
    fn get_mut(&mut self, id: Snowflake) -> Option<&mut StoreEntry<T>>;

    /// Inserts or replaces an entry, evicting others as needed.
    fn set(&mut self, id: Snowflake, item: T) -> SetOutcome;

    /// Removes an entry. Returns true if it was present.
    fn delete(&mut self, id: Snowflake) -> bool;

    /// Records that an entry was rewritten in place.
    fn touch(&mut self, id: Snowflake);

    /// Removes every entry whose lifetime ran out. Returns the count removed.
    fn purge_expired(&mut self) -> usize;

    /// Number of stored entries, including not yet purged expired ones.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Factory ==
/// Constructs a strategy bound to the given capacity and lifetime.
pub fn construct<T>(
    algorithm: Algorithm,
    capacity: Option<usize>,
    lifetime: Option<Duration>,
) -> Box<dyn EvictionStrategy<T>>
where
    T: Send + Sync + 'static,
{
    Box::new(BoundedStrategy::new(algorithm, capacity, lifetime))
}

/// Converts a memory budget into an item count using a per-item weight.
///
/// A non-positive budget means unbounded. A positive budget always allows at
/// least one item.
pub fn item_capacity(limit_mib: f64, weight_mib: f64) -> Option<usize> {
    if limit_mib.is_nan() || limit_mib <= 0.0 || weight_mib.is_nan() || weight_mib <= 0.0 {
        return None;
    }
    Some(((limit_mib / weight_mib).floor() as usize).max(1))
}

// == Bounded Strategy ==
/// Metadata-driven implementation backing every [`Algorithm`].
///
/// Victims come from an ordered index keyed by each entry's rank. Reads bump
/// ranks through atomics without touching the index, so a filed rank may lag
/// behind the live one. Ranks only grow between writes, which lets victim
/// selection re-file stale keys lazily instead of scanning every entry.
#[derive(Debug)]
pub struct BoundedStrategy<T> {
    entries: HashMap<Snowflake, StoreEntry<T>>,
    /// Entries ordered by their filed rank, lowest first
    order: BTreeSet<((u64, u64), Snowflake)>,
    algorithm: Algorithm,
    capacity: Option<usize>,
    lifetime: Option<Duration>,
    /// Logical clock ordering accesses
    clock: AtomicU64,
}

impl<T> BoundedStrategy<T> {
    pub fn new(algorithm: Algorithm, capacity: Option<usize>, lifetime: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeSet::new(),
            algorithm,
            capacity,
            lifetime,
            clock: AtomicU64::new(0),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Live ordering key of an entry under the configured algorithm.
    fn rank(algorithm: Algorithm, entry: &StoreEntry<T>) -> (u64, u64) {
        match algorithm {
            Algorithm::Lru => (entry.last_access(), 0),
            Algorithm::Lfu => (entry.hits(), entry.last_access()),
            Algorithm::Ttl => (entry.inserted, 0),
        }
    }

    /// Stores an entry and files it in the index.
    fn file(&mut self, id: Snowflake, mut entry: StoreEntry<T>) {
        self.unfile(id);
        entry.rank = Self::rank(self.algorithm, &entry);
        self.order.insert((entry.rank, id));
        self.entries.insert(id, entry);
    }

    fn unfile(&mut self, id: Snowflake) -> Option<StoreEntry<T>> {
        let entry = self.entries.remove(&id)?;
        self.order.remove(&(entry.rank, id));
        Some(entry)
    }

    /// Removes and returns the entry with the lowest live rank.
    fn evict_victim(&mut self) -> Option<Snowflake> {
        while let Some((filed, id)) = self.order.pop_first() {
            let Some(entry) = self.entries.get_mut(&id) else {
                continue;
            };
            let live = Self::rank(self.algorithm, entry);
            if live == filed {
                self.entries.remove(&id);
                return Some(id);
            }
            entry.rank = live;
            self.order.insert((live, id));
        }
        None
    }
}

impl<T> EvictionStrategy<T> for BoundedStrategy<T>
where
    T: Send + Sync,
{
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn get(&self, id: Snowflake) -> Option<&StoreEntry<T>> {
        let entry = self.entries.get(&id)?;
        if entry.is_expired(self.lifetime) {
            return None;
        }
        entry.record_access(self.tick());
        Some(entry)
    }

    fn get_mut(&mut self, id: Snowflake) -> Option<&mut StoreEntry<T>> {
        let lifetime = self.lifetime;
        self.entries
            .get_mut(&id)
            .filter(|entry| !entry.is_expired(lifetime))
    }

    fn set(&mut self, id: Snowflake, item: T) -> SetOutcome {
        let tick = self.tick();
        let mut outcome = SetOutcome::default();

        if self.entries.contains_key(&id) {
            self.file(id, StoreEntry::new(item, tick));
            return outcome;
        }

        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity {
                outcome.expired = self.purge_expired();
            }
            while self.entries.len() >= capacity {
                match self.evict_victim() {
                    Some(victim) => outcome.evicted.push(victim),
                    None => break,
                }
            }
        }

        self.file(id, StoreEntry::new(item, tick));
        outcome
    }

    fn delete(&mut self, id: Snowflake) -> bool {
        self.unfile(id).is_some()
    }

    fn touch(&mut self, id: Snowflake) {
        let tick = self.tick();
        let algorithm = self.algorithm;
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.refresh(tick);
            let live = Self::rank(algorithm, entry);
            if live != entry.rank {
                self.order.remove(&(entry.rank, id));
                entry.rank = live;
                self.order.insert((live, id));
            }
        }
    }

    fn purge_expired(&mut self) -> usize {
        let Some(lifetime) = self.lifetime else {
            return 0;
        };
        let expired: Vec<Snowflake> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(Some(lifetime)))
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            self.unfile(*id);
        }
        expired.len()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
