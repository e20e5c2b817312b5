//! Response DTOs for the cache HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::entity::Snowflake;

/// Response body for PUT /<kind>
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The id that was written
    pub id: Snowflake,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(kind: &str, id: Snowflake) -> Self {
        Self {
            message: format!("Stored {} '{}'", kind, id),
            id,
        }
    }
}

/// Response body for DELETE /<kind>/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The id that was deleted
    pub id: Snowflake,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(kind: &str, id: Snowflake) -> Self {
        Self {
            message: format!("Deleted {} '{}'", kind, id),
            id,
        }
    }
}

/// Per-store counters with the derived hit rate
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Whether values are copied across the cache boundary
    pub immutable: bool,
    /// Enabled stores keyed by entity kind
    pub stores: BTreeMap<String, StoreStatsResponse>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from per-store statistics
    pub fn new(immutable: bool, stats: BTreeMap<&'static str, CacheStats>) -> Self {
        let stores = stats
            .into_iter()
            .map(|(kind, stats)| {
                let hit_rate = stats.hit_rate();
                (kind.to_string(), StoreStatsResponse { stats, hit_rate })
            })
            .collect();
        Self { immutable, stores }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("channels", Snowflake::new(42));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], "42");
        assert!(json["message"].as_str().unwrap().contains("channels"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("users", Snowflake::new(7));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Deleted users"));
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let mut stats = BTreeMap::new();
        stats.insert(
            "users",
            CacheStats {
                hits: 8,
                misses: 2,
                total_entries: 3,
                ..Default::default()
            },
        );

        let json = serde_json::to_value(StatsResponse::new(true, stats)).unwrap();

        assert_eq!(json["immutable"], true);
        assert_eq!(json["stores"]["users"]["hits"], 8);
        assert_eq!(json["stores"]["users"]["total_entries"], 3);
        assert!((json["stores"]["users"]["hit_rate"].as_f64().unwrap() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
