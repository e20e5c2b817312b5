//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's observable contract over random inputs.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::cache::{Algorithm, Cache};
use crate::config::{CacheConfig, StoreConfig};
use crate::entity::{Channel, ChannelType, Entity, Message, Snowflake, User};
use crate::error::CacheError;

// == Strategies ==
/// Generates non-empty snowflakes
fn snowflake_strategy() -> impl Strategy<Value = Snowflake> {
    (1u64..u64::MAX).prop_map(Snowflake::new)
}

/// Generates users with a random subset of populated fields
fn user_strategy() -> impl Strategy<Value = User> {
    (
        snowflake_strategy(),
        proptest::option::of("[a-zA-Z0-9_]{1,32}"),
        proptest::option::of("[0-9]{4}"),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(id, username, discriminator, bot)| User {
            id,
            username,
            discriminator,
            bot,
            ..Default::default()
        })
}

fn cache(immutable: bool) -> Cache {
    Cache::new(&CacheConfig {
        immutable,
        users: StoreConfig::with_limit(0.0),
        ..CacheConfig::default()
    })
}

/// A cache whose message store holds exactly `capacity` items
fn message_cache(capacity: usize, algorithm: Algorithm) -> Cache {
    Cache::new(&CacheConfig {
        messages: StoreConfig {
            limit_mib: (capacity as f64 + 0.5) * Message::WEIGHT_MIB,
            algorithm,
            ..StoreConfig::with_limit(0.0)
        },
        ..CacheConfig::default()
    })
}

fn message(id: u64) -> Message {
    Message {
        id: Snowflake::new(id),
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing an entity and reading it back returns an equal entity with the
    // same identifier, in both ownership modes.
    #[test]
    fn prop_roundtrip_storage(user in user_strategy(), immutable in any::<bool>()) {
        let cache = cache(immutable);

        cache.set_user(user.clone());

        let stored = cache.get_user(user.id).unwrap();
        prop_assert_eq!(stored.id, user.id);
        prop_assert_eq!(&*stored, &user);
    }

    // Setting the same unchanged entity twice leaves reads unchanged.
    #[test]
    fn prop_set_is_idempotent(user in user_strategy(), immutable in any::<bool>()) {
        let cache = cache(immutable);

        cache.set_user(user.clone());
        let first = cache.get_user(user.id).unwrap();
        cache.set_user(user.clone());
        let second = cache.get_user(user.id).unwrap();

        prop_assert_eq!(first, second);
    }

    // In immutable mode, mutating a returned entity never leaks into the cache.
    #[test]
    fn prop_immutable_reads_are_isolated(
        user in user_strategy(),
        vandal in "[a-z]{1,16}"
    ) {
        let cache = cache(true);
        cache.set_user(user.clone());

        let mut returned = cache.get_user(user.id).unwrap();
        Arc::make_mut(&mut returned).username = Some(vandal);

        let fresh = cache.get_user(user.id).unwrap();
        prop_assert_eq!(&*fresh, &user);
    }

    // A field patched before its channel exists yields a placeholder exposing
    // only the identifier and that field.
    #[test]
    fn prop_partial_update_before_entity(id in snowflake_strategy(), secs in 0i64..4_000_000_000) {
        let cache = cache(true);
        let timestamp = Utc.timestamp_opt(secs, 0).unwrap();

        cache.update_channel_pin(id, timestamp);

        let channel = cache.get_channel(id).unwrap();
        let expected = Channel {
            id,
            last_pin_timestamp: Some(timestamp),
            ..Default::default()
        };
        prop_assert_eq!(&*channel, &expected);
    }

    // Direct-message recipients come back in reference order, resolved when the
    // user is cached and stubbed otherwise.
    #[test]
    fn prop_recipient_resolution(
        recipients in prop::collection::vec((snowflake_strategy(), any::<bool>()), 0..8),
        immutable in any::<bool>()
    ) {
        let cache = cache(immutable);
        let mut channel = Channel::new(1u64, ChannelType::GroupDm);
        for (id, cached) in &recipients {
            let user = User::new(*id, "inline");
            if *cached {
                cache.set_user(User::new(*id, "cached"));
            }
            channel.recipients.push(user);
        }

        cache.set_channel(channel);
        let resolved = cache.get_channel(Snowflake::new(1)).unwrap();

        prop_assert_eq!(resolved.recipients.len(), recipients.len());
        let cached: HashSet<Snowflake> = recipients
            .iter()
            .filter(|(_, cached)| *cached)
            .map(|(id, _)| *id)
            .collect();
        for (user, (id, _)) in resolved.recipients.iter().zip(&recipients) {
            prop_assert_eq!(user.id, *id);
            if cached.contains(id) {
                prop_assert_eq!(user.username.as_deref(), Some("cached"));
            } else {
                prop_assert_eq!(user, &User::placeholder(*id));
            }
        }
    }

    // Inserting N+1 distinct entities into a store of capacity N makes exactly
    // one of them unreachable.
    #[test]
    fn prop_capacity_evicts_exactly_one(
        capacity in 1usize..40,
        algorithm in prop_oneof![Just(Algorithm::Lru), Just(Algorithm::Lfu), Just(Algorithm::Ttl)]
    ) {
        let cache = message_cache(capacity, algorithm);

        for raw in 1..=(capacity as u64 + 1) {
            cache.set_message(message(raw));
        }

        let missing = (1..=(capacity as u64 + 1))
            .filter(|&raw| matches!(
                cache.get_message(Snowflake::new(raw)),
                Err(CacheError::NotFound(_))
            ))
            .count();
        prop_assert_eq!(missing, 1);
    }

    // The number of stored entities never exceeds capacity.
    #[test]
    fn prop_capacity_enforcement(ids in prop::collection::vec(1u64..500, 1..200)) {
        let capacity = 25;
        let cache = message_cache(capacity, Algorithm::Lru);

        for raw in ids {
            cache.set_message(message(raw));
            let entries = cache.stats()[Message::KIND].total_entries;
            prop_assert!(entries <= capacity, "Cache size {} exceeds max {}", entries, capacity);
        }
    }

    // Deleting an id that was never stored is a silent no-op.
    #[test]
    fn prop_delete_absent_is_noop(stored in user_strategy(), absent in snowflake_strategy()) {
        prop_assume!(stored.id != absent);
        let cache = cache(true);
        cache.set_user(stored.clone());

        cache.delete_user(absent);

        prop_assert!(cache.get_user(stored.id).is_ok());
        prop_assert_eq!(cache.get_user(absent).unwrap_err(), CacheError::NotFound(absent));
    }

    // With LRU, the entity read least recently is the one evicted.
    #[test]
    fn prop_lru_eviction_order(capacity in 2usize..20, read_first in any::<bool>()) {
        let cache = message_cache(capacity, Algorithm::Lru);
        for raw in 0..capacity as u64 {
            cache.set_message(message(raw + 1));
        }

        // Read everything except the first entity, then optionally the first.
        for raw in 1..capacity as u64 {
            cache.get_message(Snowflake::new(raw + 1)).unwrap();
        }
        let oldest = if read_first {
            cache.get_message(Snowflake::new(1)).unwrap();
            2
        } else {
            1
        };

        cache.set_message(message(capacity as u64 + 1));

        prop_assert!(cache.get_message(Snowflake::new(oldest)).is_err(), "LRU entity should be evicted");
        prop_assert!(cache.get_message(Snowflake::new(capacity as u64 + 1)).is_ok());
    }
}
