//! API Module
//!
//! HTTP handlers and routing that feed server events into the entity cache
//! and read entities back out.
//!
//! # Endpoints
//! - `PUT /<kind>` - Store or merge an entity
//! - `GET /<kind>/:id` - Read an entity
//! - `DELETE /<kind>/:id` - Drop an entity
//! - `PATCH /channels/:id/pin` and `/channels/:id/last-message` - Partial channel updates
//! - `GET /stats` - Per-store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
