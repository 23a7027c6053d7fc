//! src/headers/decode.rs
//!
//! Header decoding utilities.
//!
//! Design notes:
//! - Deserializes the leading 20 bytes of a framed payload into a `FrameHeader`.
//! - Field order must match `encode.rs` exactly.
//! - Validation runs after decoding to reject foreign or incompatible payloads.

use byteorder::{ByteOrder, LittleEndian};

use crate::headers::types::{FrameHeader, HeaderError};

/// Deserialize a little-endian header from the start of `buf`.
///
/// # Returns
/// - `Ok(FrameHeader)` if decoding and validation succeed.
/// - `Err(HeaderError)` if the buffer is short or validation fails.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<FrameHeader, HeaderError> {
    if buf.len() < FrameHeader::LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: FrameHeader::LEN });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);                            // 0..4   magic number

    let h = FrameHeader {
        magic,
        version: LittleEndian::read_u16(&buf[4..6]),              // 4..6   version
        backend: LittleEndian::read_u16(&buf[6..8]),              // 6..8   backend id
        flags: LittleEndian::read_u16(&buf[8..10]),               // 8..10  flags bitmask
        reserved: LittleEndian::read_u16(&buf[10..12]),           // 10..12 reserved
        plaintext_len: LittleEndian::read_u64(&buf[12..20]),      // 12..20 plaintext length
    };

    h.validate()?;
    Ok(h)
}
