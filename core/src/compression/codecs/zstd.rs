//! src/compression/codecs/zstd.rs
//!
//! Zstd streaming codec (optional, `zstd` feature).
//!
//! Design notes:
//! - Wraps the zstd streaming encoder/decoder behind the `Codec` trait.
//! - A fresh encoder/decoder is built per call; the codec itself holds only the level.
//! - Errors are mapped into `CompressionError` variants with backend context.

use std::io::{Read, Write};

use crate::backend::BackendId;
use crate::compression::stream::{copy_stream, init_failed, map_compress_err, map_decompress_err, process_failed};
use crate::compression::types::{Codec, CompressionError, Operation};

pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Codec for ZstdCodec {
    fn id(&self) -> BackendId {
        BackendId::Zstd
    }

    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut enc = zstd::stream::write::Encoder::new(output, self.level)
            .map_err(|e| init_failed(BackendId::Zstd, e))?;
        copy_stream(input, &mut enc).map_err(|e| map_compress_err(BackendId::Zstd, e))?;
        enc.finish()
            .map_err(|e| process_failed(BackendId::Zstd, Operation::Compress, e))?;
        Ok(())
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut dec = zstd::stream::read::Decoder::new(input)
            .map_err(|e| init_failed(BackendId::Zstd, e))?;
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Zstd, e))?;
        Ok(())
    }

    fn decompress_body(&self, input: &[u8], output: &mut dyn Write) -> Result<usize, CompressionError> {
        let mut dec = zstd::stream::read::Decoder::with_buffer(input)
            .map_err(|e| init_failed(BackendId::Zstd, e))?
            .single_frame();
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Zstd, e))?;
        Ok(input.len() - dec.finish().len())
    }
}
