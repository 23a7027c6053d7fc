//! codec-core
//!
//! One compress/decompress API over built-in and optional compression backends.
//! Optional backends (zstd, lz4, brotli) are linked through Cargo features and
//! probed once at runtime; built-ins (store, deflate, gzip) are always present
//! and one of them serves as the fallback for auto resolution.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod utils;
pub mod config;

pub mod backend;
pub mod compression;
pub mod headers;
pub mod telemetry;

// Public API
pub mod facade;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::backend::{BackendDescriptor, BackendId, LinkedProbe, Probe, ProbeResult, StaticProbe};
    pub use crate::compression::{
        global, BackendSelector, Codec, CodecHandle, CodecRegistry, CompressionError,
    };
    pub use crate::config::{CodecLevels, RegistryConfig};
    pub use crate::facade::{CodecFacade, CompressionRequest};
}
