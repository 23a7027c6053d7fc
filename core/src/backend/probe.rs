//! backend/probe.rs
//! One-shot availability detection for optional backends.
//!
//! Design notes:
//! - A probe only reports availability. `Err` from `detect` and panics inside
//!   it both become `available = false`; nothing is raised to the caller.
//! - Caching is the registry's job: it calls `probe` once per backend until reset.
//! - `LinkedProbe` checks that the library is compiled in, then runs a small
//!   round trip through it, which also performs any one-time library setup.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::backend::descriptor::{BackendDescriptor, BackendId};
use crate::compression::codecs;
use crate::config::CodecLevels;
use crate::constants::PROBE_SAMPLE;

/// Outcome of probing one backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub id: BackendId,
    pub available: bool,
    pub probed_at: DateTime<Utc>,
    /// Why the backend is unavailable; `None` when available.
    pub detail: Option<String>,
}

pub trait Probe: Send + Sync {
    /// Resolve the backend's library. `Err` carries a human-readable reason.
    fn detect(&self, descriptor: &BackendDescriptor) -> Result<(), String>;
}

/// Run `probe` against `descriptor`, absorbing failures and panics.
pub fn probe(probe: &dyn Probe, descriptor: &BackendDescriptor) -> ProbeResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| probe.detect(descriptor)))
        .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));

    let detail = outcome.err();
    match &detail {
        None => debug!("probe: backend {} available ({})", descriptor.id, descriptor.marker),
        Some(reason) => debug!("probe: backend {} unavailable: {}", descriptor.id, reason),
    }

    ProbeResult {
        id: descriptor.id,
        available: detail.is_none(),
        probed_at: Utc::now(),
        detail,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("probe panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("probe panicked: {}", s)
    } else {
        "probe panicked".to_string()
    }
}

/// Probe backed by what this build actually links.
#[derive(Debug, Clone, Default)]
pub struct LinkedProbe {
    levels: CodecLevels,
}

impl LinkedProbe {
    pub fn new(levels: CodecLevels) -> Self {
        Self { levels }
    }
}

impl Probe for LinkedProbe {
    fn detect(&self, descriptor: &BackendDescriptor) -> Result<(), String> {
        let id = descriptor.id;
        if !id.is_linked() {
            return Err(format!(
                "requires the '{}' library (cargo feature `{}`)",
                id.library(),
                id.feature().unwrap_or(id.name()),
            ));
        }
        codecs::self_test(id, &self.levels, PROBE_SAMPLE).map_err(|e| e.to_string())
    }
}

/// Probe reporting a fixed set of backends as available.
/// Simulates deployment environments without relinking.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    available: BTreeSet<BackendId>,
}

impl StaticProbe {
    pub fn new(available: impl IntoIterator<Item = BackendId>) -> Self {
        Self { available: available.into_iter().collect() }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

impl Probe for StaticProbe {
    fn detect(&self, descriptor: &BackendDescriptor) -> Result<(), String> {
        if self.available.contains(&descriptor.id) {
            Ok(())
        } else {
            Err(format!("{} not present in this environment", descriptor.marker))
        }
    }
}

impl<F> Probe for F
where
    F: Fn(&BackendDescriptor) -> Result<(), String> + Send + Sync,
{
    fn detect(&self, descriptor: &BackendDescriptor) -> Result<(), String> {
        self(descriptor)
    }
}
