//! compression/codecs/mod.rs
//! Concrete stream codecs and the default factory.
//!
//! Built-ins (store, deflate, gzip) are always compiled; the optional
//! backends only exist when their Cargo feature links the library.

pub mod store;
pub mod deflate;
pub mod gzip;
#[cfg(feature = "zstd")]
pub mod zstd;
#[cfg(feature = "lz4")]
pub mod lz4;
#[cfg(feature = "brotli")]
pub mod brotli;

use std::sync::Arc;

pub use store::StoreCodec;
pub use deflate::DeflateCodec;
pub use gzip::GzipCodec;
#[cfg(feature = "zstd")]
pub use self::zstd::ZstdCodec;
#[cfg(feature = "lz4")]
pub use self::lz4::Lz4Codec;
#[cfg(feature = "brotli")]
pub use self::brotli::BrotliCodec;

use crate::backend::BackendId;
use crate::compression::types::{CodecHandle, CompressionError};
use crate::config::CodecLevels;

/// Construct the codec for `id` with the configured levels.
///
/// # Errors
/// - `BackendUnavailable` when the backend's library is not compiled in.
pub fn build(id: BackendId, levels: &CodecLevels) -> Result<CodecHandle, CompressionError> {
    match id {
        BackendId::Store => Ok(Arc::new(StoreCodec)),
        BackendId::Deflate => Ok(Arc::new(DeflateCodec::new(levels.deflate))),
        BackendId::Gzip => Ok(Arc::new(GzipCodec::new(levels.gzip))),
        #[cfg(feature = "zstd")]
        BackendId::Zstd => Ok(Arc::new(ZstdCodec::new(levels.zstd))),
        #[cfg(feature = "lz4")]
        BackendId::Lz4 => Ok(Arc::new(Lz4Codec)),
        #[cfg(feature = "brotli")]
        BackendId::Brotli => Ok(Arc::new(BrotliCodec::new(levels.brotli_quality, levels.brotli_lgwin))),
        #[allow(unreachable_patterns)]
        other => Err(CompressionError::BackendUnavailable { id: other }),
    }
}

/// Round-trip a small sample through the real library.
pub fn self_test(id: BackendId, levels: &CodecLevels, sample: &[u8]) -> Result<(), CompressionError> {
    let codec = build(id, levels)?;
    let packed = codec.compress(sample)?;
    let unpacked = codec.decompress(&packed, sample.len())?;
    if unpacked != sample {
        return Err(CompressionError::CorruptPayload {
            backend: id,
            msg: "self-test round trip mismatch".into(),
        });
    }
    Ok(())
}
