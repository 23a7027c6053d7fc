//! headers/types.rs
//! Frame header struct and its error type.
//!
//! Notes:
//! - Little-endian for every multi-byte field.
//! - Reserved bytes allow future fields without changing size; always zero them.
//! - The header is 20 bytes, fixed length.

use crate::backend::BackendId;
use crate::constants::{flags, FRAME_V1, MAGIC_TUC1};
use crate::utils::enum_name_or_hex;

/// Fixed header size in bytes.
pub const HEADER_LEN_V1: usize = 20;

/// Trailer size when `HAS_CRC32` is set.
pub const TRAILER_LEN_CRC32: usize = 4;

/// Header prepended to every framed payload.
#[repr(C)]
#[derive(Debug, Clone, PartialEq)]
pub struct FrameHeader {
    pub magic: [u8; 4],       // "TUC1" magic marker
    pub version: u16,         // frame version
    pub backend: u16,         // backend enum (backend_ids)
    pub flags: u16,           // presence bits
    pub reserved: u16,        // must be zero
    pub plaintext_len: u64,   // original payload length
}

impl FrameHeader {
    pub const LEN: usize = HEADER_LEN_V1;

    pub fn new(backend: BackendId, plaintext_len: u64) -> Self {
        Self {
            magic: MAGIC_TUC1,
            version: FRAME_V1,
            backend: backend as u16,
            flags: 0,
            reserved: 0,
            plaintext_len,
        }
    }

    pub fn with_crc32(mut self) -> Self {
        self.flags |= flags::HAS_CRC32;
        self
    }

    pub fn has_crc32(&self) -> bool {
        self.flags & flags::HAS_CRC32 != 0
    }

    pub fn trailer_len(&self) -> usize {
        if self.has_crc32() { TRAILER_LEN_CRC32 } else { 0 }
    }

    /// Backend marker as a typed id.
    pub fn backend_id(&self) -> Result<BackendId, HeaderError> {
        BackendId::try_from(self.backend).map_err(|_| HeaderError::UnknownBackend { raw: self.backend })
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.magic != MAGIC_TUC1 {
            return Err(HeaderError::InvalidMagic { have: self.magic, need: MAGIC_TUC1 });
        }
        if self.version != FRAME_V1 {
            return Err(HeaderError::UnsupportedVersion { have: self.version });
        }
        self.backend_id()?;
        if self.flags & !flags::KNOWN != 0 {
            return Err(HeaderError::UnknownFlags { flags: self.flags });
        }
        if self.reserved != 0 {
            return Err(HeaderError::ReservedNonZero { reserved: self.reserved });
        }
        Ok(())
    }
}

pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeaderError {
    #[error("header buffer too short: {have} < {need}")]
    BufferTooShort { have: usize, need: usize },

    #[error("invalid magic: expected {}, got {}", fmt_bytes(need), fmt_bytes(have))]
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    #[error("unsupported frame version: {have}")]
    UnsupportedVersion { have: u16 },

    #[error("unknown backend: {}", enum_name_or_hex::<BackendId>(*raw))]
    UnknownBackend { raw: u16 },

    #[error("unknown flags: 0x{flags:04x}")]
    UnknownFlags { flags: u16 },

    #[error("reserved field must be zero: 0x{reserved:04x}")]
    ReservedNonZero { reserved: u16 },
}
