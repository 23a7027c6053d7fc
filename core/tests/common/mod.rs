//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use codec_core::compression::stream::{copy_stream, map_compress_err, map_decompress_err};
use codec_core::prelude::*;

/// Pass-through codec that reports an arbitrary backend id.
pub struct FakeCodec {
    pub id: BackendId,
}

impl Codec for FakeCodec {
    fn id(&self) -> BackendId {
        self.id
    }

    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        copy_stream(input, output).map_err(|e| map_compress_err(self.id, e))?;
        Ok(())
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        copy_stream(input, output).map_err(|e| map_decompress_err(self.id, e))?;
        Ok(())
    }
}

/// Factory building `FakeCodec { id }` and counting constructions.
pub fn counting_factory(
    id: BackendId,
    counter: Arc<AtomicUsize>,
) -> impl Fn(&CodecLevels) -> Result<CodecHandle, CompressionError> + Send + Sync + 'static {
    move |_levels: &CodecLevels| {
        counter.fetch_add(1, Ordering::SeqCst);
        let handle: CodecHandle = Arc::new(FakeCodec { id });
        Ok(handle)
    }
}

/// The two-backend environment: FAST = zstd (priority 10), WEB = brotli (priority 5).
pub fn fast_web_descriptors() -> Vec<BackendDescriptor> {
    vec![
        BackendDescriptor::new(BackendId::Zstd, "fast.codec.Marker", 10),
        BackendDescriptor::new(BackendId::Brotli, "web.codec.Marker", 5),
    ]
}

/// Registry over FAST/WEB with fake codecs and the given availability.
pub fn fast_web_registry(available: &[BackendId]) -> CodecRegistry {
    CodecRegistry::builder()
        .descriptors(fast_web_descriptors())
        .probe(StaticProbe::new(available.iter().copied()))
        .factory(BackendId::Zstd, counting_factory(BackendId::Zstd, Arc::new(AtomicUsize::new(0))))
        .factory(BackendId::Brotli, counting_factory(BackendId::Brotli, Arc::new(AtomicUsize::new(0))))
        .build()
        .expect("valid registry")
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sample_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 ^ ((i / 7) as u8)).collect()
}
