//! src/telemetry/snapshot.rs
//!
//! Immutable per-backend statistics.

use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

use crate::backend::BackendId;
use crate::telemetry::counters::BackendCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecStats {
    pub backend: BackendId,
    pub compress_calls: u64,
    pub decompress_calls: u64,
    pub errors: u64,
    pub bytes_plaintext: u64,
    pub bytes_compressed: u64,
    /// `bytes_compressed / bytes_plaintext`, 0.0 when nothing was processed.
    pub compression_ratio: f64,
}

impl CodecStats {
    pub fn from_counters(backend: BackendId, counters: &BackendCounters) -> Self {
        let bytes_plaintext = counters.bytes_plaintext.load(Ordering::Relaxed);
        let bytes_compressed = counters.bytes_compressed.load(Ordering::Relaxed);

        let compression_ratio = if bytes_plaintext > 0 {
            bytes_compressed as f64 / bytes_plaintext as f64
        } else {
            0.0
        };

        Self {
            backend,
            compress_calls: counters.compress_calls.load(Ordering::Relaxed),
            decompress_calls: counters.decompress_calls.load(Ordering::Relaxed),
            errors: counters.errors.load(Ordering::Relaxed),
            bytes_plaintext,
            bytes_compressed,
            compression_ratio,
        }
    }

    pub fn total_calls(&self) -> u64 {
        self.compress_calls + self.decompress_calls
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
