//! headers/mod.rs
//! Frame header carried by every payload the facade produces.
//!
//! - Fixed-size header (20 bytes) enables cheap validation before any decoding.
//! - The backend id is the marker decompression checks against resolution.
//! - Flags declare presence of the CRC32 trailer.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
