//! Gzip via flate2.

use std::io::{Read, Write};
use flate2::{Compression, write::GzEncoder, read::GzDecoder};
use flate2::bufread::GzDecoder as GzBodyDecoder;

use crate::backend::BackendId;
use crate::compression::stream::{copy_stream, map_compress_err, map_decompress_err, process_failed};
use crate::compression::types::{Codec, CompressionError, Operation};

pub struct GzipCodec {
    level: Compression,
}

impl GzipCodec {
    pub fn new(level: u32) -> Self {
        let lvl = match level {
            0..=9 => Compression::new(level),
            _ => Compression::default(),
        };
        Self { level: lvl }
    }
}

impl Codec for GzipCodec {
    fn id(&self) -> BackendId {
        BackendId::Gzip
    }

    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut enc = GzEncoder::new(output, self.level);
        copy_stream(input, &mut enc).map_err(|e| map_compress_err(BackendId::Gzip, e))?;
        enc.finish()
            .map_err(|e| process_failed(BackendId::Gzip, Operation::Compress, e))?;
        Ok(())
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut dec = GzDecoder::new(input);
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Gzip, e))?;
        Ok(())
    }

    /// Single member only; a second member counts as trailing bytes.
    fn decompress_body(&self, input: &[u8], output: &mut dyn Write) -> Result<usize, CompressionError> {
        let mut dec = GzBodyDecoder::new(input);
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Gzip, e))?;
        Ok(input.len() - dec.into_inner().len())
    }
}
