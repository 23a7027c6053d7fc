//! facade.rs
//! Unified compress/decompress API over the codec registry.
//!
//! Framed payload layout:
//! ```text
//! [ FrameHeader (20 bytes) ][ backend body ][ CRC32 of plaintext (4 bytes, if HAS_CRC32) ]
//! ```
//! The header's backend id is the marker `decompress` checks against resolution.
//! The stream helpers at the bottom write raw, unframed backend streams.

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::backend::BackendId;
use crate::compression::stream::{CountingReader, CountingWriter, LimitedWriter};
use crate::compression::{global, BackendSelector, Codec, CodecRegistry, CompressionError, Operation};
use crate::headers::{decode_header_le, encode_header_le, FrameHeader};
use crate::utils::compute_checksum;

/// One compression call. Borrowed from the caller and never mutated.
#[derive(Copy, Clone, Debug)]
pub struct CompressionRequest<'a> {
    pub payload: &'a [u8],
    pub backend: BackendSelector,
}

impl<'a> CompressionRequest<'a> {
    pub fn new(payload: &'a [u8], backend: impl Into<BackendSelector>) -> Self {
        Self { payload, backend: backend.into() }
    }

    pub fn auto(payload: &'a [u8]) -> Self {
        Self { payload, backend: BackendSelector::Auto }
    }
}

/// Facade over a borrowed registry.
#[derive(Copy, Clone)]
pub struct CodecFacade<'r> {
    registry: &'r CodecRegistry,
}

impl CodecFacade<'static> {
    /// Facade over the process-wide registry.
    pub fn global() -> Self {
        Self { registry: global() }
    }
}

impl<'r> CodecFacade<'r> {
    pub fn new(registry: &'r CodecRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r CodecRegistry {
        self.registry
    }

    /// Availability only; never constructs a codec.
    pub fn is_available(&self, id: BackendId) -> bool {
        self.registry.is_available(id)
    }

    /// Extension of the backend `selector` resolves to.
    pub fn file_extension(&self, selector: impl Into<BackendSelector>) -> Result<&'static str, CompressionError> {
        Ok(self.registry.select(selector.into())?.file_extension())
    }

    /// Compress into a framed payload.
    pub fn compress(&self, request: CompressionRequest<'_>) -> Result<Vec<u8>, CompressionError> {
        let codec = self.registry.resolve(request.backend)?;
        let id = codec.id();
        let payload = request.payload;

        let mut header = FrameHeader::new(id, payload.len() as u64);
        if self.registry.config().checksum {
            header = header.with_crc32();
        }

        let mut out = Vec::with_capacity(FrameHeader::LEN + payload.len() / 2 + header.trailer_len());
        out.extend_from_slice(&encode_header_le(&header));

        let mut reader = payload;
        let result = codec.compress_stream(&mut reader, &mut out);
        if result.is_ok() && header.has_crc32() {
            out.extend_from_slice(&compute_checksum(payload).to_le_bytes());
        }
        self.track(id, Operation::Compress, &result, payload.len(), out.len());
        result?;

        debug!("facade: compressed {} -> {} bytes with {}", payload.len(), out.len(), id);
        Ok(out)
    }

    /// Decompress a framed payload with the backend `selector` resolves to.
    ///
    /// # Errors
    /// - `Header` when the payload is not a frame this library produced.
    /// - `FormatMismatch` when the frame names a different backend.
    /// - `CorruptPayload` when the body, length or checksum is wrong.
    pub fn decompress(&self, payload: &[u8], selector: impl Into<BackendSelector>) -> Result<Vec<u8>, CompressionError> {
        let header = decode_header_le(payload)?;
        let found = header.backend_id()?;

        let codec = self.registry.resolve(selector.into())?;
        let expected = codec.id();
        if found != expected {
            return Err(CompressionError::FormatMismatch { expected, found });
        }

        let result = decode_body(codec.as_ref(), &header, payload);
        let plain_len = result.as_ref().map(Vec::len).unwrap_or(0);
        self.track(found, Operation::Decompress, &result, plain_len, payload.len());
        result
    }

    /// Decompress with whichever backend the frame's own marker names.
    pub fn decompress_detect(&self, payload: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let found = decode_header_le(payload)?.backend_id()?;
        self.decompress(payload, found)
    }

    /// Backend a framed payload was produced by, without decoding it.
    pub fn detect_backend(&self, payload: &[u8]) -> Result<BackendId, CompressionError> {
        Ok(decode_header_le(payload)?.backend_id()?)
    }

    /// Compress `input` into `output` as a raw (unframed) backend stream.
    /// Returns the backend used.
    pub fn compress_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        selector: impl Into<BackendSelector>,
    ) -> Result<BackendId, CompressionError> {
        let codec = self.registry.resolve(selector.into())?;
        let id = codec.id();
        let mut reader = CountingReader::new(input);
        let mut writer = CountingWriter::new(output);
        let result = codec.compress_stream(&mut reader, &mut writer);
        self.track(id, Operation::Compress, &result, reader.count as usize, writer.count as usize);
        result.map(|_| id)
    }

    /// Decode a raw backend stream from `input` into `output`.
    /// Returns the backend used.
    pub fn decompress_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        selector: impl Into<BackendSelector>,
    ) -> Result<BackendId, CompressionError> {
        let codec = self.registry.resolve(selector.into())?;
        let id = codec.id();
        let mut reader = CountingReader::new(input);
        let mut writer = CountingWriter::new(output);
        let result = codec.decompress_stream(&mut reader, &mut writer);
        self.track(id, Operation::Decompress, &result, writer.count as usize, reader.count as usize);
        result.map(|_| id)
    }

    fn track<T>(&self, id: BackendId, op: Operation, result: &Result<T, CompressionError>, pt_len: usize, comp_len: usize) {
        if let Some(counters) = self.registry.counters(id) {
            match result {
                Ok(_) => counters.record(op, pt_len as u64, comp_len as u64),
                Err(_) => counters.record_error(),
            }
        }
    }
}

/// Strip the frame, decode the body and check it against the header.
fn decode_body(codec: &dyn Codec, header: &FrameHeader, payload: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let backend = codec.id();
    let trailer = header.trailer_len();
    if payload.len() < FrameHeader::LEN + trailer {
        return Err(CompressionError::CorruptPayload {
            backend,
            msg: format!("frame of {} bytes has no room for its trailer", payload.len()),
        });
    }
    let body = &payload[FrameHeader::LEN..payload.len() - trailer];

    // The header is untrusted: cap the preallocation, and stop decoding
    // as soon as the output outgrows the declared length.
    let size_hint = usize::try_from(header.plaintext_len)
        .unwrap_or(0)
        .min(body.len().saturating_mul(64));
    let mut plain = Vec::with_capacity(size_hint);
    let mut sink = LimitedWriter::new(&mut plain, header.plaintext_len);
    let result = codec.decompress_body(body, &mut sink);
    if sink.exceeded {
        return Err(CompressionError::CorruptPayload {
            backend,
            msg: format!("decoded data exceeds header length {}", header.plaintext_len),
        });
    }
    let consumed = result?;
    if consumed != body.len() {
        return Err(CompressionError::CorruptPayload {
            backend,
            msg: format!("trailing bytes after stream: {} of {} unused", body.len() - consumed, body.len()),
        });
    }

    if plain.len() as u64 != header.plaintext_len {
        return Err(CompressionError::CorruptPayload {
            backend,
            msg: format!("decoded size {} != header {}", plain.len(), header.plaintext_len),
        });
    }
    if header.has_crc32() {
        let expected_crc = LittleEndian::read_u32(&payload[payload.len() - trailer..]);
        let actual_crc = compute_checksum(&plain);
        if expected_crc != actual_crc {
            return Err(CompressionError::CorruptPayload {
                backend,
                msg: format!("checksum mismatch: expected {:08x}, got {:08x}", expected_crc, actual_crc),
            });
        }
    }
    Ok(plain)
}

/// Compress with the process-wide registry.
pub fn compress(request: CompressionRequest<'_>) -> Result<Vec<u8>, CompressionError> {
    CodecFacade::global().compress(request)
}

/// Decompress with the process-wide registry.
pub fn decompress(payload: &[u8], selector: impl Into<BackendSelector>) -> Result<Vec<u8>, CompressionError> {
    CodecFacade::global().decompress(payload, selector)
}

/// Availability in the process-wide registry.
pub fn is_available(id: BackendId) -> bool {
    CodecFacade::global().is_available(id)
}
