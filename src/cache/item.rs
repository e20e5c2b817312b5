//! Cache Item Module
//!
//! Adapts one entity into its stored form. Nested entities are replaced by a
//! list of identifiers on the way in and re-expanded from sibling caches on
//! the way out, so the stored graph never owns a copy of another entity.

use std::sync::Arc;

use crate::entity::{Channel, Entity, Snowflake, User};
use crate::error::Result;

// == Mode ==
/// How values cross the cache boundary. Fixed when the cache is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Callers and the cache share the same allocation. Cheap, caller-disciplined.
    Mutable,
    /// Every value is deep-copied on the way in and on the way out.
    Immutable,
}

impl Mode {
    pub fn from_immutable(immutable: bool) -> Self {
        if immutable {
            Mode::Immutable
        } else {
            Mode::Mutable
        }
    }
}

// == Cache Item ==
/// One stored entity plus the identifiers of the entities it nests.
#[derive(Debug)]
pub struct CacheItem<T> {
    entity: Arc<T>,
    refs: Vec<Snowflake>,
}

impl<T: Entity> CacheItem<T> {
    // == Normalize ==
    /// Builds the stored form of a freshly received entity.
    ///
    /// In immutable mode the stored copy has its nested list cleared; in
    /// mutable mode the caller's allocation is stored as is. Either way the
    /// reference list comes from the nested list of the input.
    pub fn normalize(entity: Arc<T>, mode: Mode) -> Self {
        let refs = entity.nested_ids();
        let entity = match mode {
            Mode::Mutable => entity,
            Mode::Immutable => {
                let mut copy = T::clone(&entity);
                copy.clear_nested();
                Arc::new(copy)
            }
        };
        Self { entity, refs }
    }

    // == Merge ==
    /// Applies a full-object update to an existing item.
    ///
    /// Mutable mode replaces the entity outright. Immutable mode overlays the
    /// populated fields of `fresh`, keeping cached fields it does not carry.
    pub fn merge(&mut self, fresh: Arc<T>, mode: Mode) {
        match mode {
            Mode::Mutable => {
                self.refs = fresh.nested_ids();
                self.entity = fresh;
            }
            Mode::Immutable => {
                if fresh.has_nested() {
                    self.refs = fresh.nested_ids();
                }
                Arc::make_mut(&mut self.entity).overlay(&fresh);
            }
        }
    }

    // == Patch ==
    /// Mutates a single field of the stored entity.
    ///
    /// Copy-on-write if a caller still holds the shared allocation.
    pub fn patch(&mut self, f: impl FnOnce(&mut T)) {
        f(Arc::make_mut(&mut self.entity));
    }

    // == Checkout ==
    /// Extracts what a read needs so the store lock can be released before
    /// nested references are resolved.
    pub fn checkout(&self, mode: Mode) -> Checkout<T> {
        let entity = match mode {
            Mode::Mutable => Arc::clone(&self.entity),
            Mode::Immutable => Arc::new(T::clone(&self.entity)),
        };
        Checkout {
            entity,
            refs: self.refs.clone(),
        }
    }
}

// == Checkout ==
/// A read taken out of the store, not yet materialized.
#[derive(Debug)]
pub struct Checkout<T> {
    entity: Arc<T>,
    refs: Vec<Snowflake>,
}

impl<T> Checkout<T> {
    /// Finishes a read for entity kinds that nest nothing.
    pub fn into_entity(self) -> Arc<T> {
        self.entity
    }
}

// == Channel Specialization ==
impl Checkout<Channel> {
    /// Materializes a channel, expanding recipients through `lookup`.
    ///
    /// Only direct-message channels are expanded. A recipient that cannot be
    /// resolved becomes a stub carrying only its identifier.
    pub fn expand(self, lookup: impl Fn(Snowflake) -> Result<Arc<User>>) -> Arc<Channel> {
        if !self.entity.is_direct() {
            return self.entity;
        }

        let recipients = self
            .refs
            .iter()
            .map(|&id| match lookup(id) {
                Ok(user) => Arc::unwrap_or_clone(user),
                Err(_) => User::placeholder(id),
            })
            .collect();

        let mut channel = Arc::unwrap_or_clone(self.entity);
        channel.recipients = recipients;
        Arc::new(channel)
    }
}
