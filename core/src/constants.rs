/// Magic number for framed payloads.
/// "TUC1" = Tiny Utils Codec frame v1
pub const MAGIC_TUC1: [u8; 4] = *b"TUC1";
pub const FRAME_V1: u16 = 1;

/// Copy buffer used by the stream helpers.
pub const BUFFER_SIZE: usize = 8 * 1024;

/// Payload used by the linked probe self-test.
pub const PROBE_SAMPLE: &[u8] = b"codec-core probe sample: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Stable backend IDs (u16) for frame headers and wire format.
pub mod backend_ids {
    pub const STORE: u16   = 0x0000;
    pub const ZSTD: u16    = 0x0001;
    pub const LZ4: u16     = 0x0002;
    pub const DEFLATE: u16 = 0x0003;
    pub const GZIP: u16    = 0x0004;
    pub const BROTLI: u16  = 0x0005;
}

/// Default priorities for optional backends. Higher wins under auto resolution.
pub mod priorities {
    pub const ZSTD: u16   = 30;
    pub const LZ4: u16    = 20;
    pub const BROTLI: u16 = 10;
}

/// Default compression levels (balanced).
pub const DEFAULT_LEVEL_ZSTD: i32 = 6;
pub const DEFAULT_LEVEL_DEFLATE: u32 = 6;
pub const DEFAULT_QUALITY_BROTLI: u32 = 6;
pub const DEFAULT_LGWIN_BROTLI: u32 = 22;

/// Flag bitmask for frame headers.
pub mod flags {
    pub const HAS_CRC32: u16 = 0x0001;

    pub const KNOWN: u16 = HAS_CRC32;
}
