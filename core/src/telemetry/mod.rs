//! telemetry/mod.rs
//! Per-backend counters and immutable snapshots.
//!
//! - Counters live next to each backend slot in the registry.
//! - Snapshots are plain data, serializable for logs or reporting.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
