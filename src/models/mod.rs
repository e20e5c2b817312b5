//! Request and Response models for the cache HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.
//! Entities themselves are sent and returned as their own JSON form.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{LastMessageRequest, PinRequest};
pub use responses::{DeleteResponse, ErrorResponse, HealthResponse, SetResponse, StatsResponse};
