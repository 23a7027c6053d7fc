// Registry behavior: priority resolution, probe caching, lazy construction,
// fallback policy and concurrent first use.

mod common;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use codec_core::backend::BackendDescriptor;
    use codec_core::prelude::*;

    use crate::common::{counting_factory, fast_web_descriptors, fast_web_registry, init_logger, FakeCodec};

    // ## Priority resolution

    #[test]
    fn auto_picks_highest_priority_available() {
        init_logger();
        let registry = fast_web_registry(&[BackendId::Zstd, BackendId::Brotli]);

        assert_eq!(registry.select(BackendSelector::Auto).unwrap(), BackendId::Zstd);
        assert_eq!(registry.resolve(BackendSelector::Auto).unwrap().id(), BackendId::Zstd);
    }

    #[test]
    fn auto_skips_unavailable_fast_backend() {
        init_logger();
        let registry = fast_web_registry(&[BackendId::Brotli]);

        assert!(!registry.is_available(BackendId::Zstd));
        assert!(registry.is_available(BackendId::Brotli));
        assert_eq!(registry.resolve(BackendSelector::Auto).unwrap().id(), BackendId::Brotli);
    }

    #[test]
    fn exact_unavailable_backend_is_reported_by_id() {
        let registry = fast_web_registry(&[BackendId::Brotli]);

        let err = registry.resolve(BackendId::Zstd.into()).err().unwrap();
        assert!(matches!(err, CompressionError::BackendUnavailable { id: BackendId::Zstd }));
        assert!(err.to_string().contains("zstd"));
        assert_eq!(err.backend(), Some(BackendId::Zstd));
    }

    #[test]
    fn undeclared_optional_backend_is_unavailable() {
        let registry = fast_web_registry(&[BackendId::Zstd, BackendId::Brotli]);

        assert!(!registry.is_declared(BackendId::Lz4));
        assert!(!registry.is_available(BackendId::Lz4));
        assert!(registry.probe_result(BackendId::Lz4).is_none());
        assert!(matches!(
            registry.resolve(BackendId::Lz4.into()),
            Err(CompressionError::BackendUnavailable { id: BackendId::Lz4 })
        ));
    }

    #[test]
    fn list_backends_is_ordered_by_descending_priority() {
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors().into_iter().rev())
            .probe(StaticProbe::none())
            .build()
            .unwrap();

        let ids: Vec<BackendId> = registry.list_backends().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![BackendId::Zstd, BackendId::Brotli]);
    }

    // ## Built-ins and fallback

    #[test]
    fn builtins_are_always_available() {
        let registry = fast_web_registry(&[]);
        for id in BackendId::BUILTIN {
            assert!(registry.is_available(id), "{id} should be available");
            let handle = registry.resolve(id.into()).unwrap();
            assert_eq!(handle.id(), id);
        }
    }

    #[test]
    fn auto_falls_back_to_deflate_by_default() {
        init_logger();
        let registry = fast_web_registry(&[]);

        assert_eq!(registry.select(BackendSelector::Auto).unwrap(), BackendId::Deflate);
        // Repeated fallback resolution stays stable.
        assert_eq!(registry.select(BackendSelector::Auto).unwrap(), BackendId::Deflate);
    }

    #[test]
    fn auto_honors_configured_fallback() {
        let registry = CodecRegistry::builder()
            .config(RegistryConfig::default().with_fallback(BackendId::Gzip))
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::none())
            .build()
            .unwrap();

        assert_eq!(registry.resolve(BackendSelector::Auto).unwrap().id(), BackendId::Gzip);
    }

    #[test]
    fn auto_without_fallback_reports_no_backend() {
        let registry = CodecRegistry::builder()
            .config(RegistryConfig::default().without_fallback())
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::none())
            .build()
            .unwrap();

        assert!(matches!(
            registry.resolve(BackendSelector::Auto),
            Err(CompressionError::NoBackendAvailable)
        ));
        // Built-ins remain reachable explicitly.
        assert!(registry.resolve(BackendId::Store.into()).is_ok());
    }

    // ## Probe caching

    #[test]
    fn probe_runs_once_per_backend_until_reset() {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe_calls = Arc::clone(&calls);
        let mut registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(move |d: &BackendDescriptor| {
                probe_calls.fetch_add(1, Ordering::SeqCst);
                if d.id == BackendId::Brotli { Ok(()) } else { Err("missing".to_string()) }
            })
            .build()
            .unwrap();

        for _ in 0..5 {
            assert!(!registry.is_available(BackendId::Zstd));
            assert!(registry.is_available(BackendId::Brotli));
            let _ = registry.select(BackendSelector::Auto);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        registry.reset();
        assert!(registry.is_available(BackendId::Brotli));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn probe_result_carries_reason() {
        let registry = fast_web_registry(&[BackendId::Brotli]);

        let missing = registry.probe_result(BackendId::Zstd).unwrap();
        assert!(!missing.available);
        assert!(missing.detail.as_deref().unwrap().contains("fast.codec.Marker"));

        let present = registry.probe_result(BackendId::Brotli).unwrap();
        assert!(present.available);
        assert!(present.detail.is_none());

        // Cached: the timestamp does not move.
        assert_eq!(registry.probe_result(BackendId::Brotli).unwrap().probed_at, present.probed_at);
    }

    #[test]
    fn panicking_probe_reads_as_unavailable() {
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(|d: &BackendDescriptor| -> Result<(), String> {
                if d.id == BackendId::Zstd {
                    panic!("linker exploded");
                }
                Ok(())
            })
            .factory(BackendId::Brotli, counting_factory(BackendId::Brotli, Arc::new(AtomicUsize::new(0))))
            .build()
            .unwrap();

        assert!(!registry.is_available(BackendId::Zstd));
        assert_eq!(registry.resolve(BackendSelector::Auto).unwrap().id(), BackendId::Brotli);
        let detail = registry.probe_result(BackendId::Zstd).unwrap().detail.unwrap();
        assert!(detail.contains("linker exploded"));
    }

    // ## Lazy construction

    #[test]
    fn availability_check_does_not_construct() {
        let counter = Arc::new(AtomicUsize::new(0));
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::new([BackendId::Brotli]))
            .factory(BackendId::Brotli, counting_factory(BackendId::Brotli, Arc::clone(&counter)))
            .build()
            .unwrap();

        assert!(registry.is_available(BackendId::Brotli));
        assert_eq!(registry.select(BackendSelector::Auto).unwrap(), BackendId::Brotli);
        assert!(!registry.is_constructed(BackendId::Brotli));
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        registry.resolve(BackendSelector::Auto).unwrap();
        assert!(registry.is_constructed(BackendId::Brotli));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unavailable_backend_is_never_constructed() {
        let counter = Arc::new(AtomicUsize::new(0));
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::none())
            .factory(BackendId::Zstd, counting_factory(BackendId::Zstd, Arc::clone(&counter)))
            .build()
            .unwrap();

        assert!(registry.resolve(BackendId::Zstd.into()).is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handle_is_reused_across_calls() {
        let counter = Arc::new(AtomicUsize::new(0));
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::new([BackendId::Zstd]))
            .factory(BackendId::Zstd, counting_factory(BackendId::Zstd, Arc::clone(&counter)))
            .build()
            .unwrap();

        let a = registry.resolve(BackendSelector::Auto).unwrap();
        let b = registry.resolve(BackendId::Zstd.into()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_use_constructs_once() {
        const THREADS: usize = 16;

        let counter = Arc::new(AtomicUsize::new(0));
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::new([BackendId::Zstd, BackendId::Brotli]))
            .factory(BackendId::Zstd, counting_factory(BackendId::Zstd, Arc::clone(&counter)))
            .build()
            .unwrap();

        let barrier = Barrier::new(THREADS);
        let handles: Vec<CodecHandle> = thread::scope(|s| {
            let workers: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        registry.resolve(BackendSelector::Auto).unwrap()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[test]
    fn failed_construction_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::new([BackendId::Brotli]))
            .factory(BackendId::Brotli, move |_levels: &CodecLevels| {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(CompressionError::CodecInitFailed {
                        backend: BackendId::Brotli,
                        msg: "transient".into(),
                    });
                }
                let handle: CodecHandle = Arc::new(FakeCodec { id: BackendId::Brotli });
                Ok(handle)
            })
            .build()
            .unwrap();

        assert!(matches!(
            registry.resolve(BackendSelector::Auto),
            Err(CompressionError::CodecInitFailed { backend: BackendId::Brotli, .. })
        ));
        assert!(!registry.is_constructed(BackendId::Brotli));
        assert!(registry.resolve(BackendSelector::Auto).is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn factory_with_wrong_id_is_rejected() {
        let registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::new([BackendId::Zstd]))
            .factory(BackendId::Zstd, counting_factory(BackendId::Lz4, Arc::new(AtomicUsize::new(0))))
            .build()
            .unwrap();

        assert!(matches!(
            registry.resolve(BackendId::Zstd.into()),
            Err(CompressionError::CodecInitFailed { backend: BackendId::Zstd, .. })
        ));
    }

    #[test]
    fn reset_drops_handles() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = CodecRegistry::builder()
            .descriptors(fast_web_descriptors())
            .probe(StaticProbe::new([BackendId::Zstd]))
            .factory(BackendId::Zstd, counting_factory(BackendId::Zstd, Arc::clone(&counter)))
            .build()
            .unwrap();

        let before = registry.resolve(BackendSelector::Auto).unwrap();
        registry.reset();
        assert!(!registry.is_constructed(BackendId::Zstd));

        let after = registry.resolve(BackendSelector::Auto).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    // ## Builder validation

    #[test]
    fn builder_rejects_duplicate_priority() {
        let err = CodecRegistry::builder()
            .descriptors([
                BackendDescriptor::new(BackendId::Zstd, "a", 7),
                BackendDescriptor::new(BackendId::Lz4, "b", 7),
            ])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, CompressionError::InvalidRegistry(ref m) if m.contains("priority 7")));
    }

    #[test]
    fn builder_rejects_duplicate_id() {
        let err = CodecRegistry::builder()
            .backend(BackendDescriptor::new(BackendId::Zstd, "a", 7))
            .backend(BackendDescriptor::new(BackendId::Zstd, "b", 8))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, CompressionError::InvalidRegistry(ref m) if m.contains("twice")));
    }

    #[test]
    fn builder_rejects_builtin_descriptor() {
        let result = CodecRegistry::builder()
            .backend(BackendDescriptor::new(BackendId::Gzip, "flate2::GzEncoder", 99))
            .build();
        assert!(matches!(result, Err(CompressionError::InvalidRegistry(_))));
    }

    #[test]
    fn builder_rejects_optional_fallback() {
        let result = CodecRegistry::new(RegistryConfig::default().with_fallback(BackendId::Zstd));
        assert!(matches!(result, Err(CompressionError::InvalidRegistry(ref m)) if m.contains("not built-in")));
    }

    // ## Linked environment

    #[test]
    fn default_registry_matches_linked_features() {
        init_logger();
        let registry = CodecRegistry::default();

        for descriptor in registry.list_backends() {
            assert_eq!(
                registry.is_available(descriptor.id),
                descriptor.id.is_linked(),
                "{} availability should follow the build",
                descriptor.id
            );
        }

        let expected = registry
            .list_backends()
            .iter()
            .find(|d| d.id.is_linked())
            .map(|d| d.id)
            .unwrap_or(BackendId::Deflate);
        assert_eq!(registry.select(BackendSelector::Auto).unwrap(), expected);
    }

    #[test]
    fn global_registry_is_shared() {
        let a = codec_core::compression::global();
        let b = codec_core::compression::global();
        assert!(std::ptr::eq(a, b));
        assert!(a.is_available(BackendId::Deflate));
    }
}
