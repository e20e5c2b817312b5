//! Entity Cache Module
//!
//! The per-entity-type operation set (get, set, patch, delete) shared by every
//! entity kind. Writers never fail: on a disabled store, or for an entity with
//! no identity, they are silent no-ops. Readers report `Deactivated` and
//! `NotFound` explicitly.

use std::sync::Arc;

use tracing::debug;

use crate::cache::item::{CacheItem, Checkout, Mode};
use crate::cache::store::{EntityStore, Upsert};
use crate::cache::{eviction, CacheStats};
use crate::config::StoreConfig;
use crate::entity::{Entity, Snowflake};
use crate::error::{CacheError, Result};

// == Entity Cache ==
/// Facade over one entity type's store.
#[derive(Debug)]
pub struct EntityCache<T: Entity> {
    /// `None` when disabled by configuration
    store: Option<EntityStore<CacheItem<T>>>,
    mode: Mode,
}

impl<T: Entity> EntityCache<T> {
    // == Constructor ==
    /// Builds the facade, constructing a store only if enabled.
    pub fn new(config: &StoreConfig, mode: Mode) -> Self {
        let store = if config.disabled {
            debug!("{} cache disabled", T::KIND);
            None
        } else {
            let capacity = eviction::item_capacity(config.limit_mib, T::WEIGHT_MIB);
            Some(EntityStore::new(T::KIND, config.algorithm, capacity, config.lifetime))
        };
        Self { store, mode }
    }

    // == Set ==
    /// Stores a full entity, merging into an existing entry if present.
    pub fn set(&self, entity: Arc<T>) {
        let Some(store) = &self.store else {
            return;
        };
        let id = entity.id();
        if id.is_empty() {
            return;
        }

        let mode = self.mode;
        store.upsert(
            id,
            |item| item.merge(Arc::clone(&entity), mode),
            || CacheItem::normalize(Arc::clone(&entity), mode),
        );
    }

    // == Patch ==
    /// Updates a single field of an entity.
    ///
    /// When the entity is not cached yet, a placeholder carrying only `id` and
    /// the patched field is inserted so the update is not lost.
    pub fn patch(&self, id: Snowflake, apply: impl Fn(&mut T)) {
        let Some(store) = &self.store else {
            return;
        };
        if id.is_empty() {
            return;
        }

        let mode = self.mode;
        let outcome = store.upsert(
            id,
            |item| item.patch(&apply),
            || {
                let mut placeholder = T::placeholder(id);
                apply(&mut placeholder);
                CacheItem::normalize(Arc::new(placeholder), mode)
            },
        );
        if outcome == Upsert::Inserted {
            debug!("Created placeholder in {} for {}", T::KIND, id);
        }
    }

    // == Checkout ==
    /// Takes a read out of the store. The store lock is released on return.
    pub fn checkout(&self, id: Snowflake) -> Result<Checkout<T>> {
        let store = self.store.as_ref().ok_or(CacheError::Deactivated(T::KIND))?;
        store
            .view(id, |item| item.checkout(self.mode))
            .ok_or(CacheError::NotFound(id))
    }

    // == Get ==
    /// Returns the cached entity.
    ///
    /// Only valid for kinds without nested references; kinds with references
    /// finish the [`Checkout`] with their own expansion.
    pub fn get(&self, id: Snowflake) -> Result<Arc<T>> {
        self.checkout(id).map(Checkout::into_entity)
    }

    // == Delete ==
    /// Removes an entity. Absent ids and disabled stores are no-ops.
    pub fn delete(&self, id: Snowflake) {
        if let Some(store) = &self.store {
            store.delete(id);
        }
    }

    // == Purge Expired ==
    /// Removes entries whose lifetime ran out. Returns the count removed.
    pub fn purge_expired(&self) -> usize {
        self.store.as_ref().map_or(0, EntityStore::purge_expired)
    }

    /// Store statistics, `None` when disabled.
    pub fn stats(&self) -> Option<CacheStats> {
        self.store.as_ref().map(EntityStore::stats)
    }
}
