//! Deflate (zlib wrapper) via flate2 with streaming enc/dec.

use std::io::{Read, Write};
use flate2::{Compression, write::ZlibEncoder, read::ZlibDecoder};
use flate2::bufread::ZlibDecoder as ZlibBodyDecoder;

use crate::backend::BackendId;
use crate::compression::stream::{copy_stream, map_compress_err, map_decompress_err, process_failed};
use crate::compression::types::{Codec, CompressionError, Operation};

pub struct DeflateCodec {
    level: Compression,
}

impl DeflateCodec {
    pub fn new(level: u32) -> Self {
        let lvl = match level {
            0..=9 => Compression::new(level),
            _ => Compression::default(),
        };
        Self { level: lvl }
    }
}

impl Codec for DeflateCodec {
    fn id(&self) -> BackendId {
        BackendId::Deflate
    }

    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut enc = ZlibEncoder::new(output, self.level);
        copy_stream(input, &mut enc).map_err(|e| map_compress_err(BackendId::Deflate, e))?;
        enc.finish()
            .map_err(|e| process_failed(BackendId::Deflate, Operation::Compress, e))?;
        Ok(())
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut dec = ZlibDecoder::new(input);
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Deflate, e))?;
        Ok(())
    }

    fn decompress_body(&self, input: &[u8], output: &mut dyn Write) -> Result<usize, CompressionError> {
        // The bufread decoder only consumes what the zlib stream needs.
        let mut dec = ZlibBodyDecoder::new(input);
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Deflate, e))?;
        Ok(input.len() - dec.into_inner().len())
    }
}
