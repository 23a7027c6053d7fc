//! telemetry/counters.rs
//! Per-backend counters updated by the facade.
//!
//! Summary: call counts and byte counts per backend, converted into an
//! immutable `CodecStats` snapshot on demand. Relaxed atomics: counters are
//! independent and only read for reporting.
use std::sync::atomic::{AtomicU64, Ordering};

use crate::compression::Operation;

#[derive(Default, Debug)]
pub struct BackendCounters {
    pub compress_calls: AtomicU64,
    pub decompress_calls: AtomicU64,
    pub errors: AtomicU64,
    pub bytes_plaintext: AtomicU64,
    pub bytes_compressed: AtomicU64,
}

impl BackendCounters {
    /// Record one successful operation.
    ///
    /// - `pt_len`: plaintext length (input of compress, output of decompress)
    /// - `comp_len`: compressed length including frame overhead
    pub fn record(&self, op: Operation, pt_len: u64, comp_len: u64) {
        match op {
            Operation::Compress => self.compress_calls.fetch_add(1, Ordering::Relaxed),
            Operation::Decompress => self.decompress_calls.fetch_add(1, Ordering::Relaxed),
        };
        self.bytes_plaintext.fetch_add(pt_len, Ordering::Relaxed);
        self.bytes_compressed.fetch_add(comp_len, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.compress_calls.store(0, Ordering::Relaxed);
        self.decompress_calls.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
        self.bytes_plaintext.store(0, Ordering::Relaxed);
        self.bytes_compressed.store(0, Ordering::Relaxed);
    }
}
