//! codecs/brotli.rs
//! Brotli codec (optional, `brotli` feature).
use std::io::{Read, Write};
use brotli::enc::BrotliEncoderParams;

use crate::backend::BackendId;
use crate::compression::stream::{copy_stream, map_decompress_err, process_failed};
use crate::compression::types::{Codec, CompressionError, Operation};
use crate::constants::BUFFER_SIZE;

pub struct BrotliCodec {
    quality: u32,
    lgwin: u32,
}

impl BrotliCodec {
    pub fn new(quality: u32, lgwin: u32) -> Self {
        Self { quality, lgwin }
    }

    fn params(&self) -> BrotliEncoderParams {
        BrotliEncoderParams {
            quality: self.quality as i32,
            lgwin: self.lgwin as i32,
            ..Default::default()
        }
    }
}

impl Codec for BrotliCodec {
    fn id(&self) -> BackendId {
        BackendId::Brotli
    }

    fn compress_stream(&self, mut input: &mut dyn Read, mut output: &mut dyn Write) -> Result<(), CompressionError> {
        brotli::BrotliCompress(&mut input, &mut output, &self.params())
            .map_err(|e| process_failed(BackendId::Brotli, Operation::Compress, e))?;
        Ok(())
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        let mut dec = brotli::Decompressor::new(input, BUFFER_SIZE);
        copy_stream(&mut dec, output).map_err(|e| map_decompress_err(BackendId::Brotli, e))?;
        Ok(())
    }

    /// The read-side decoder buffers ahead, so feed the body through the
    /// writer-side decoder, which reports how much input the stream used.
    fn decompress_body(&self, input: &[u8], output: &mut dyn Write) -> Result<usize, CompressionError> {
        let corrupt = |e: std::io::Error| CompressionError::CorruptPayload { backend: BackendId::Brotli, msg: e.to_string() };

        let mut dec = brotli::DecompressorWriter::new(output, BUFFER_SIZE);
        let mut consumed = 0;
        while consumed < input.len() {
            match dec.write(&input[consumed..]).map_err(corrupt)? {
                0 => break,
                n => consumed += n,
            }
        }
        // Fails when the stream ended early.
        dec.close().map_err(corrupt)?;
        Ok(consumed)
    }
}
