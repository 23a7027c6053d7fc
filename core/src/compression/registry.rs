//! compression/registry.rs
//! Codec registry: cached backend probes and lazily constructed handles.
//!
//! Design notes:
//! - One slot per backend, guarded by its own mutex. Probing and construction
//!   happen inside that critical section, so each runs at most once per backend.
//! - Handles are stateless `Arc<dyn Codec>`; callers clone the `Arc` and run
//!   compress/decompress outside any lock.
//! - Probe results live until `reset`, which needs `&mut self`. The shared
//!   `&'static` global registry therefore can never be reset.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use chrono::Utc;
use log::{debug, info, warn};

use crate::backend::{list_backends, probe, sort_by_priority, BackendDescriptor, BackendId, LinkedProbe, Probe, ProbeResult};
use crate::compression::codecs;
use crate::compression::types::{CodecHandle, CompressionError};
use crate::config::{CodecLevels, RegistryConfig};
use crate::telemetry::{BackendCounters, CodecStats};

/// Builds the codec for one backend from the configured levels.
pub type CodecFactory = Arc<dyn Fn(&CodecLevels) -> Result<CodecHandle, CompressionError> + Send + Sync>;

/// Which backend a caller asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum BackendSelector {
    /// Highest-priority available optional backend, else the fallback.
    #[default]
    Auto,
    Exact(BackendId),
}

impl From<BackendId> for BackendSelector {
    fn from(id: BackendId) -> Self {
        BackendSelector::Exact(id)
    }
}

impl fmt::Display for BackendSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendSelector::Auto => f.write_str("auto"),
            BackendSelector::Exact(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Default)]
struct Slot {
    probe: Option<ProbeResult>,
    handle: Option<CodecHandle>,
}

struct Entry {
    id: BackendId,
    /// `None` for built-ins, which need no probing.
    descriptor: Option<BackendDescriptor>,
    factory: CodecFactory,
    slot: Mutex<Slot>,
    counters: BackendCounters,
}

impl Entry {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct CodecRegistry {
    config: RegistryConfig,
    descriptors: Vec<BackendDescriptor>,
    probe: Arc<dyn Probe>,
    /// Optional backends in descending priority, then built-ins.
    entries: Vec<Entry>,
    fallback_warned: AtomicBool,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let config = RegistryConfig::default();
        let probe: Arc<dyn Probe> = Arc::new(LinkedProbe::new(config.levels.clone()));
        Self::assemble(config, list_backends(), probe, HashMap::new())
    }
}

impl CodecRegistry {
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::default()
    }

    /// Registry with default descriptors and `LinkedProbe`, using `config`.
    pub fn new(config: RegistryConfig) -> Result<Self, CompressionError> {
        Self::builder().config(config).build()
    }

    fn assemble(
        config: RegistryConfig,
        mut descriptors: Vec<BackendDescriptor>,
        probe: Arc<dyn Probe>,
        mut factories: HashMap<BackendId, CodecFactory>,
    ) -> Self {
        sort_by_priority(&mut descriptors);

        let mut factory_for = |id: BackendId| -> CodecFactory {
            factories
                .remove(&id)
                .unwrap_or_else(|| default_factory(id))
        };

        let mut entries: Vec<Entry> = descriptors
            .iter()
            .map(|d| Entry {
                id: d.id,
                descriptor: Some(*d),
                factory: factory_for(d.id),
                slot: Mutex::new(Slot::default()),
                counters: BackendCounters::default(),
            })
            .collect();

        for id in BackendId::BUILTIN {
            entries.push(Entry {
                id,
                descriptor: None,
                factory: factory_for(id),
                slot: Mutex::new(Slot::default()),
                counters: BackendCounters::default(),
            });
        }

        Self { config, descriptors, probe, entries, fallback_warned: AtomicBool::new(false) }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Declared optional backends, ordered by descending priority.
    pub fn list_backends(&self) -> &[BackendDescriptor] {
        &self.descriptors
    }

    /// Whether `id` is a built-in or a declared optional backend.
    pub fn is_declared(&self, id: BackendId) -> bool {
        self.entry(id).is_some()
    }

    fn entry(&self, id: BackendId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn optional_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.descriptor.is_some())
    }

    /// Probe result for `entry`, computing it on first use.
    fn ensure_probed<'s>(&self, entry: &Entry, slot: &'s mut Slot) -> &'s ProbeResult {
        slot.probe.get_or_insert_with(|| match &entry.descriptor {
            Some(descriptor) => probe(self.probe.as_ref(), descriptor),
            None => ProbeResult { id: entry.id, available: true, probed_at: Utc::now(), detail: None },
        })
    }

    fn entry_available(&self, entry: &Entry) -> bool {
        let mut slot = entry.lock();
        self.ensure_probed(entry, &mut slot).available
    }

    /// Probe (if needed) and construct (if needed) under the slot lock.
    fn resolve_entry(&self, entry: &Entry) -> Result<CodecHandle, CompressionError> {
        let mut slot = entry.lock();
        if !self.ensure_probed(entry, &mut slot).available {
            return Err(CompressionError::BackendUnavailable { id: entry.id });
        }
        if let Some(handle) = &slot.handle {
            return Ok(Arc::clone(handle));
        }

        let handle = (entry.factory)(&self.config.levels)?;
        if handle.id() != entry.id {
            return Err(CompressionError::CodecInitFailed {
                backend: entry.id,
                msg: format!("factory produced a {} codec", handle.id()),
            });
        }
        info!("registry: constructed {} codec", entry.id);
        slot.handle = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Availability without constructing a codec.
    /// Built-ins are always available; undeclared optional backends never are.
    pub fn is_available(&self, id: BackendId) -> bool {
        self.entry(id).is_some_and(|e| self.entry_available(e))
    }

    /// Cached (or freshly computed) probe result. `None` when `id` is undeclared.
    pub fn probe_result(&self, id: BackendId) -> Option<ProbeResult> {
        let entry = self.entry(id)?;
        let mut slot = entry.lock();
        Some(self.ensure_probed(entry, &mut slot).clone())
    }

    /// Whether a handle for `id` has been constructed.
    pub fn is_constructed(&self, id: BackendId) -> bool {
        self.entry(id).is_some_and(|e| e.lock().handle.is_some())
    }

    /// Resolve `selector` to a backend id without constructing its codec.
    ///
    /// # Errors
    /// - `BackendUnavailable(id)` when an exact backend failed probing or is undeclared.
    /// - `NoBackendAvailable` when auto finds nothing and the fallback is disabled.
    pub fn select(&self, selector: BackendSelector) -> Result<BackendId, CompressionError> {
        match selector {
            BackendSelector::Exact(id) => match self.entry(id) {
                Some(entry) if self.entry_available(entry) => Ok(id),
                _ => Err(CompressionError::BackendUnavailable { id }),
            },
            BackendSelector::Auto => {
                if let Some(entry) = self.optional_entries().find(|e| self.entry_available(e)) {
                    debug!("registry: auto resolved to {}", entry.id);
                    return Ok(entry.id);
                }
                match self.config.fallback {
                    Some(id) => {
                        if !self.fallback_warned.swap(true, Ordering::Relaxed) {
                            warn!("registry: no optional backend available, falling back to {}", id);
                        }
                        Ok(id)
                    }
                    None => Err(CompressionError::NoBackendAvailable),
                }
            }
        }
    }

    /// Resolve `selector` to a shared codec handle, constructing it on first use.
    pub fn resolve(&self, selector: BackendSelector) -> Result<CodecHandle, CompressionError> {
        let id = self.select(selector)?;
        let entry = self.entry(id).ok_or(CompressionError::BackendUnavailable { id })?;
        self.resolve_entry(entry)
    }

    pub(crate) fn counters(&self, id: BackendId) -> Option<&BackendCounters> {
        self.entry(id).map(|e| &e.counters)
    }

    pub fn stats(&self, id: BackendId) -> Option<CodecStats> {
        self.entry(id).map(|e| CodecStats::from_counters(e.id, &e.counters))
    }

    /// Stats for every backend that processed at least one call.
    pub fn stats_all(&self) -> Vec<CodecStats> {
        self.entries
            .iter()
            .map(|e| CodecStats::from_counters(e.id, &e.counters))
            .filter(|s| s.total_calls() > 0 || s.errors > 0)
            .collect()
    }

    /// Test-only: forget probe results, handles and counters.
    #[doc(hidden)]
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            let slot = entry.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
            *slot = Slot::default();
            entry.counters.reset();
        }
        self.fallback_warned = AtomicBool::new(false);
        debug!("registry: reset");
    }
}

/// Builder for registries with custom descriptors, probes or factories.
#[derive(Default)]
pub struct CodecRegistryBuilder {
    config: RegistryConfig,
    descriptors: Option<Vec<BackendDescriptor>>,
    probe: Option<Arc<dyn Probe>>,
    factories: HashMap<BackendId, CodecFactory>,
}

impl CodecRegistryBuilder {
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default optional backends.
    pub fn descriptors(mut self, descriptors: impl IntoIterator<Item = BackendDescriptor>) -> Self {
        self.descriptors = Some(descriptors.into_iter().collect());
        self
    }

    /// Declare one more optional backend.
    pub fn backend(mut self, descriptor: BackendDescriptor) -> Self {
        self.descriptors.get_or_insert_with(Vec::new).push(descriptor);
        self
    }

    pub fn probe(mut self, probe: impl Probe + 'static) -> Self {
        let probe: Arc<dyn Probe> = Arc::new(probe);
        self.probe = Some(probe);
        self
    }

    pub fn factory<F>(mut self, id: BackendId, factory: F) -> Self
    where
        F: Fn(&CodecLevels) -> Result<CodecHandle, CompressionError> + Send + Sync + 'static,
    {
        self.factories.insert(id, Arc::new(factory));
        self
    }

    /// # Errors
    /// - `InvalidRegistry` for an invalid config, a built-in declared as optional,
    ///   or duplicate ids/priorities.
    pub fn build(self) -> Result<CodecRegistry, CompressionError> {
        self.config
            .validate()
            .map_err(|e| CompressionError::InvalidRegistry(e.to_string()))?;

        let descriptors = self.descriptors.unwrap_or_else(list_backends);
        validate_descriptors(&descriptors)?;

        let probe = match self.probe {
            Some(probe) => probe,
            None => Arc::new(LinkedProbe::new(self.config.levels.clone())),
        };

        Ok(CodecRegistry::assemble(self.config, descriptors, probe, self.factories))
    }
}

fn default_factory(id: BackendId) -> CodecFactory {
    Arc::new(move |levels: &CodecLevels| codecs::build(id, levels))
}

fn validate_descriptors(descriptors: &[BackendDescriptor]) -> Result<(), CompressionError> {
    for (i, d) in descriptors.iter().enumerate() {
        if d.id.is_builtin() {
            return Err(CompressionError::InvalidRegistry(format!(
                "{} is built-in and cannot be declared as an optional backend",
                d.id
            )));
        }
        for other in &descriptors[..i] {
            if other.id == d.id {
                return Err(CompressionError::InvalidRegistry(format!("{} declared twice", d.id)));
            }
            if other.priority == d.priority {
                return Err(CompressionError::InvalidRegistry(format!(
                    "{} and {} share priority {}",
                    other.id, d.id, d.priority
                )));
            }
        }
    }
    Ok(())
}

static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();

/// Process-wide registry, created with defaults on first use.
pub fn global() -> &'static CodecRegistry {
    GLOBAL.get_or_init(CodecRegistry::default)
}

/// Configure the process-wide registry before its first use.
///
/// # Errors
/// - `InvalidRegistry` when the config is invalid or the registry already exists.
pub fn configure_global(config: RegistryConfig) -> Result<&'static CodecRegistry, CompressionError> {
    let registry = CodecRegistry::new(config)?;
    GLOBAL
        .set(registry)
        .map_err(|_| CompressionError::InvalidRegistry("global registry already initialized".into()))?;
    Ok(global())
}
