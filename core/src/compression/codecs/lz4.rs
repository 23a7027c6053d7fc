//! codecs/lz4.rs
//! LZ4 frame codec via lz4_flex (optional, `lz4` feature).
//! The frame format is self-delimiting, so no length prefix is needed.
use std::io::{Read, Write};
use lz4_flex::frame::{FrameDecoder, FrameEncoder};

use crate::backend::BackendId;
use crate::compression::stream::{copy_stream, map_compress_err, map_decompress_err, process_failed};
use crate::compression::types::{Codec, CompressionError, Operation};

/// lz4_flex exposes no level; the codec is a unit struct.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn id(&self) -> BackendId {
        BackendId::Lz4
    }

    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut enc = FrameEncoder::new(output);
        copy_stream(input, &mut enc).map_err(|e| map_compress_err(BackendId::Lz4, e))?;
        enc.finish()
            .map_err(|e| process_failed(BackendId::Lz4, Operation::Compress, e))?;
        Ok(())
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut dec = FrameDecoder::new(input);
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Lz4, e))?;
        Ok(())
    }
}
