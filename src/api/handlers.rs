//! API Handlers
//!
//! HTTP request handlers feeding entity events into the cache and reading
//! entities back out. One generic handler set serves every entity kind.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::entity::{Channel, Entity, Guild, Message, Snowflake, User};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, HealthResponse, LastMessageRequest, PinRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes internally, so the state only shares ownership.
#[derive(Clone)]
pub struct AppState {
    /// The entity cache
    pub cache: Arc<Cache>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: Cache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Cache::new(config))
    }
}

// == Resource ==
/// Binds an entity kind to its cache entry points.
pub trait Resource: Entity + Serialize + DeserializeOwned {
    fn store(cache: &Cache, entity: Self);
    fn load(cache: &Cache, id: Snowflake) -> Result<Arc<Self>>;
    fn remove(cache: &Cache, id: Snowflake);
}

impl Resource for Channel {
    fn store(cache: &Cache, entity: Self) {
        cache.set_channel(entity);
    }

    fn load(cache: &Cache, id: Snowflake) -> Result<Arc<Self>> {
        cache.get_channel(id)
    }

    fn remove(cache: &Cache, id: Snowflake) {
        cache.delete_channel(id);
    }
}

impl Resource for User {
    fn store(cache: &Cache, entity: Self) {
        cache.set_user(entity);
    }

    fn load(cache: &Cache, id: Snowflake) -> Result<Arc<Self>> {
        cache.get_user(id)
    }

    fn remove(cache: &Cache, id: Snowflake) {
        cache.delete_user(id);
    }
}

impl Resource for Guild {
    fn store(cache: &Cache, entity: Self) {
        cache.set_guild(entity);
    }

    fn load(cache: &Cache, id: Snowflake) -> Result<Arc<Self>> {
        cache.get_guild(id)
    }

    fn remove(cache: &Cache, id: Snowflake) {
        cache.delete_guild(id);
    }
}

impl Resource for Message {
    fn store(cache: &Cache, entity: Self) {
        cache.set_message(entity);
    }

    fn load(cache: &Cache, id: Snowflake) -> Result<Arc<Self>> {
        cache.get_message(id)
    }

    fn remove(cache: &Cache, id: Snowflake) {
        cache.delete_message(id);
    }
}

/// Handler for PUT /<kind>
///
/// Stores a full entity, merging into the cached one if present.
pub async fn set_handler<T: Resource>(
    State(state): State<AppState>,
    Json(entity): Json<T>,
) -> Result<Json<SetResponse>> {
    let id = entity.id();
    if id.is_empty() {
        return Err(CacheError::InvalidRequest("id cannot be empty".to_string()));
    }

    T::store(&state.cache, entity);
    debug!("Stored {} {}", T::KIND, id);

    Ok(Json(SetResponse::new(T::KIND, id)))
}

/// Handler for GET /<kind>/:id
pub async fn get_handler<T: Resource>(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<T>> {
    let entity = T::load(&state.cache, Snowflake::new(id))?;
    Ok(Json(Arc::unwrap_or_clone(entity)))
}

/// Handler for DELETE /<kind>/:id
///
/// Succeeds whether or not the entity was cached.
pub async fn delete_handler<T: Resource>(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<DeleteResponse> {
    let id = Snowflake::new(id);
    T::remove(&state.cache, id);
    Json(DeleteResponse::new(T::KIND, id))
}

/// Handler for PATCH /channels/:id/pin
pub async fn channel_pin_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<PinRequest>,
) -> Result<Json<Channel>> {
    let id = Snowflake::new(id);
    if id.is_empty() {
        return Err(CacheError::InvalidRequest("id cannot be empty".to_string()));
    }

    state.cache.update_channel_pin(id, req.timestamp);

    Ok(Json(Arc::unwrap_or_clone(state.cache.get_channel(id)?)))
}

/// Handler for PATCH /channels/:id/last-message
pub async fn channel_last_message_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<LastMessageRequest>,
) -> Result<Json<Channel>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }
    let id = Snowflake::new(id);
    if id.is_empty() {
        return Err(CacheError::InvalidRequest("id cannot be empty".to_string()));
    }

    state.cache.update_channel_last_message_id(id, req.message_id);

    Ok(Json(Arc::unwrap_or_clone(state.cache.get_channel(id)?)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.is_immutable(),
        state.cache.stats(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
