//! codecs/store.rs
//! Pass-through codec.

use std::io::{Read, Write};

use crate::backend::BackendId;
use crate::compression::stream::{copy_stream, map_compress_err, map_decompress_err};
use crate::compression::types::{Codec, CompressionError};

#[derive(Debug, Default, Clone, Copy)]
pub struct StoreCodec;

impl Codec for StoreCodec {
    fn id(&self) -> BackendId {
        BackendId::Store
    }

    fn compress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        copy_stream(input, output).map_err(|e| map_compress_err(BackendId::Store, e))?;
        Ok(())
    }

    fn decompress_stream(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<(), CompressionError> {
        copy_stream(input, output).map_err(|e| map_decompress_err(BackendId::Store, e))?;
        Ok(())
    }
}
