//! src/headers/encode.rs
//!
//! Header encoding utilities.
//!
//! Design notes:
//! - Serializes `FrameHeader` into a fixed 20-byte buffer in little-endian order.
//! - Field order must match `decode.rs` exactly.

use byteorder::{ByteOrder, LittleEndian};

use crate::headers::types::{FrameHeader, HEADER_LEN_V1};

/// Serialize a `FrameHeader` into a 20-byte buffer in little-endian order.
#[inline]
pub fn encode_header_le(h: &FrameHeader) -> [u8; HEADER_LEN_V1] {
    let mut out = [0u8; HEADER_LEN_V1];

    out[0..4].copy_from_slice(&h.magic);                         // 0..4   magic number
    LittleEndian::write_u16(&mut out[4..6], h.version);          // 4..6   version
    LittleEndian::write_u16(&mut out[6..8], h.backend);          // 6..8   backend id
    LittleEndian::write_u16(&mut out[8..10], h.flags);           // 8..10  flags bitmask
    LittleEndian::write_u16(&mut out[10..12], h.reserved);       // 10..12 reserved
    LittleEndian::write_u64(&mut out[12..20], h.plaintext_len);  // 12..20 plaintext length

    out
}
