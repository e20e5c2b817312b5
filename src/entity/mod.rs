//! Entity Module
//!
//! Domain objects mirrored by the cache, all keyed by [`Snowflake`].

mod channel;
mod guild;
mod message;
mod snowflake;
mod user;

use std::fmt::Debug;

pub use channel::{Channel, ChannelType};
pub use guild::Guild;
pub use message::Message;
pub use snowflake::Snowflake;
pub use user::User;

// == Entity Trait ==
/// A cacheable domain object.
///
/// The cache engine is generic over this trait; the only per-kind behavior it
/// needs is identity, a weight estimate for capacity planning, field overlay
/// for partial updates, and extraction of nested entity references.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Lowercase plural name used in logs, errors and configuration.
    const KIND: &'static str;

    /// Estimated size of one cached item, in MiB.
    const WEIGHT_MIB: f64;

    /// The entity identifier.
    fn id(&self) -> Snowflake;

    /// A minimal entity carrying only `id`.
    fn placeholder(id: Snowflake) -> Self;

    /// Copies every populated field of `fresh` onto `self`, leaving the rest untouched.
    fn overlay(&mut self, fresh: &Self);

    /// Identifiers of nested entities carried inline, in input order.
    fn nested_ids(&self) -> Vec<Snowflake> {
        Vec::new()
    }

    /// Whether the entity carries inline nested entities at all.
    fn has_nested(&self) -> bool {
        false
    }

    /// Drops inline nested entities.
    fn clear_nested(&mut self) {}
}

/// Overwrites `dst` only when `src` is populated.
pub(crate) fn overlay_field<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if src.is_some() {
        dst.clone_from(src);
    }
}
