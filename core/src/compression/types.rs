//! compression/types.rs
//! Codec trait, shared handle type and the compression error taxonomy.
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::backend::BackendId;
use crate::headers::HeaderError;

/// Which half of a codec failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Compress => "compress",
            Operation::Decompress => "decompress",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    /// An explicitly requested backend failed probing or was never declared.
    #[error("backend {id} is unavailable (requires the '{}' library)", id.library())]
    BackendUnavailable { id: BackendId },

    /// Auto resolution found no optional backend and the fallback is disabled.
    #[error("no compression backend available")]
    NoBackendAvailable,

    /// The payload's backend marker disagrees with the resolved backend.
    #[error("format mismatch: payload was produced by {found}, resolved backend is {expected}")]
    FormatMismatch { expected: BackendId, found: BackendId },

    /// The backend rejected its input as malformed, or the frame trailer disagrees.
    #[error("corrupt {backend} payload: {msg}")]
    CorruptPayload { backend: BackendId, msg: String },

    #[error("codec {backend} init failed: {msg}")]
    CodecInitFailed { backend: BackendId, msg: String },

    #[error("codec {backend} {op} failed: {msg}")]
    CodecProcessFailed { backend: BackendId, op: Operation, msg: String },

    #[error("frame header error: {0}")]
    Header(#[from] HeaderError),

    #[error("invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CompressionError {
    /// Backend the error is attributed to, if any.
    pub fn backend(&self) -> Option<BackendId> {
        use CompressionError::*;
        match self {
            BackendUnavailable { id } => Some(*id),
            FormatMismatch { expected, .. } => Some(*expected),
            CorruptPayload { backend, .. }
            | CodecInitFailed { backend, .. }
            | CodecProcessFailed { backend, .. } => Some(*backend),
            NoBackendAvailable | Header(_) | InvalidRegistry(_) | Io(_) => None,
        }
    }
}

/// A stateless stream codec.
///
/// Implementations create a fresh encoder/decoder per call, so one instance is
/// shared by every thread through a [`CodecHandle`].
pub trait Codec: Send + Sync {
    fn id(&self) -> BackendId;

    /// Encode everything read from `input` into `output` as a raw backend stream.
    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError>;

    /// Decode a raw backend stream from `input` into `output`.
    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError>;

    /// Decode one complete backend stream held in memory.
    ///
    /// Returns how many bytes of `input` the stream occupied; the caller
    /// treats anything left over as corruption. The default relies on the
    /// decoder reading from `input` no further than its end marker.
    fn decompress_body(&self, input: &[u8], output: &mut dyn Write) -> Result<usize, CompressionError> {
        let mut reader = input;
        self.decompress_stream(&mut reader, output)?;
        Ok(input.len() - reader.len())
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut out = Vec::new();
        let mut reader = input;
        self.compress_stream(&mut reader, &mut out)?;
        Ok(out)
    }

    /// Decode a whole buffer. `size_hint` pre-sizes the output.
    fn decompress(&self, input: &[u8], size_hint: usize) -> Result<Vec<u8>, CompressionError> {
        let mut out = Vec::with_capacity(size_hint);
        let mut reader = input;
        self.decompress_stream(&mut reader, &mut out)?;
        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        self.id().file_extension()
    }
}

/// Shared, reusable codec instance owned by the registry.
pub type CodecHandle = Arc<dyn Codec>;
