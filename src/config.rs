//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::Algorithm;

/// Configuration of one entity-type store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Skips building the store; reads then fail with `Deactivated`
    pub disabled: bool,
    /// Memory budget in MiB, converted to an item count per entity weight. 0 = unbounded
    pub limit_mib: f64,
    /// Eviction algorithm
    pub algorithm: Algorithm,
    /// Maximum age since last write, `None` = never expires
    pub lifetime: Option<Duration>,
}

impl StoreConfig {
    /// An enabled store with the given budget, LRU eviction and no lifetime.
    pub fn with_limit(limit_mib: f64) -> Self {
        Self {
            disabled: false,
            limit_mib,
            algorithm: Algorithm::default(),
            lifetime: None,
        }
    }

    /// A store that is never built.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::with_limit(0.0)
        }
    }

    /// Loads `<PREFIX>_CACHE_*` variables, falling back to `default`.
    ///
    /// # Environment Variables
    /// - `<PREFIX>_CACHE_DISABLED` - Disable the store (true/false)
    /// - `<PREFIX>_CACHE_LIMIT_MIB` - Memory budget in MiB
    /// - `<PREFIX>_CACHE_ALGORITHM` - `lru`, `lfu` or `ttl`
    /// - `<PREFIX>_CACHE_LIFETIME_SECS` - Entry lifetime in seconds, 0 disables
    pub fn from_env(prefix: &str, default: StoreConfig) -> Self {
        let lifetime_secs = env_or(
            &format!("{}_CACHE_LIFETIME_SECS", prefix),
            default.lifetime.map_or(0, |lifetime| lifetime.as_secs()),
        );
        Self {
            disabled: env_flag(&format!("{}_CACHE_DISABLED", prefix), default.disabled),
            limit_mib: env_or(&format!("{}_CACHE_LIMIT_MIB", prefix), default.limit_mib),
            algorithm: env_or(&format!("{}_CACHE_ALGORITHM", prefix), default.algorithm),
            lifetime: (lifetime_secs > 0).then(|| Duration::from_secs(lifetime_secs)),
        }
    }
}

/// Cache-wide configuration: the immutability flag plus one entry per entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Deep-copy every value crossing the cache boundary
    pub immutable: bool,
    pub channels: StoreConfig,
    pub users: StoreConfig,
    pub guilds: StoreConfig,
    pub messages: StoreConfig,
}

impl CacheConfig {
    /// Loads cache configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_IMMUTABLE` - Copy-in/copy-out mode (default: true)
    /// - `CHANNEL_`, `USER_`, `GUILD_`, `MESSAGE_` prefixed store variables, see [`StoreConfig::from_env`]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            immutable: env_flag("CACHE_IMMUTABLE", defaults.immutable),
            channels: StoreConfig::from_env("CHANNEL", defaults.channels),
            users: StoreConfig::from_env("USER", defaults.users),
            guilds: StoreConfig::from_env("GUILD", defaults.guilds),
            messages: StoreConfig::from_env("MESSAGE", defaults.messages),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            immutable: true,
            channels: StoreConfig::with_limit(10.0),
            users: StoreConfig::with_limit(10.0),
            guilds: StoreConfig::with_limit(5.0),
            messages: StoreConfig::with_limit(20.0),
        }
    }
}

/// Process configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Entity cache settings
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Background lifetime sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 5)
    /// - cache variables, see [`CacheConfig::from_env`]
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig::from_env(),
            server_port: env_or("SERVER_PORT", 3000),
            cleanup_interval: env_or("CLEANUP_INTERVAL", 5),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 3000,
            cleanup_interval: 5,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
