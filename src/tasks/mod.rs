//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Lifetime sweep: Drops expired entries from every store at the configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
