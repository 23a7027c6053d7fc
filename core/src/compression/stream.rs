//! compression/stream.rs
//! Buffered copy helpers shared by the codecs.
//!
//! The copy loop reports which side failed so codecs can tell malformed input
//! (decoder read side) apart from a failing sink (writer side).
use std::io::{self, Read, Write};

use crate::backend::BackendId;
use crate::compression::types::{CompressionError, Operation};
use crate::constants::BUFFER_SIZE;

#[derive(Debug)]
pub enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

/// Copy `r` into `w` in `BUFFER_SIZE` blocks. Returns the number of bytes copied.
pub fn copy_stream<R, W>(r: &mut R, w: &mut W) -> Result<u64, CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match r.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        w.write_all(&buf[..n]).map_err(CopyError::Write)?;
        total += n as u64;
    }
}

/// Compression: the plain reader failing is an I/O error, the encoder failing is a codec error.
pub fn map_compress_err(backend: BackendId, e: CopyError) -> CompressionError {
    match e {
        CopyError::Read(e) => CompressionError::Io(e),
        CopyError::Write(e) => process_failed(backend, Operation::Compress, e),
    }
}

/// Decompression: the decoder failing means malformed input, the sink failing is an I/O error.
pub fn map_decompress_err(backend: BackendId, e: CopyError) -> CompressionError {
    match e {
        CopyError::Read(e) => CompressionError::CorruptPayload { backend, msg: e.to_string() },
        CopyError::Write(e) => CompressionError::Io(e),
    }
}

pub fn process_failed(backend: BackendId, op: Operation, e: impl std::fmt::Display) -> CompressionError {
    CompressionError::CodecProcessFailed { backend, op, msg: e.to_string() }
}

pub fn init_failed(backend: BackendId, e: impl std::fmt::Display) -> CompressionError {
    CompressionError::CodecInitFailed { backend, msg: e.to_string() }
}

/// Writer adapter counting the bytes that pass through.
pub struct CountingWriter<'a> {
    inner: &'a mut dyn Write,
    pub count: u64,
}

impl<'a> CountingWriter<'a> {
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, count: 0 }
    }
}

impl Write for CountingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Reader adapter counting the bytes that pass through.
pub struct CountingReader<'a> {
    inner: &'a mut dyn Read,
    pub count: u64,
}

impl<'a> CountingReader<'a> {
    pub fn new(inner: &'a mut dyn Read) -> Self {
        Self { inner, count: 0 }
    }
}

impl Read for CountingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Writer adapter that refuses to pass more than `limit` bytes.
/// A refused write sets `exceeded` and fails with `ErrorKind::OutOfMemory`.
pub struct LimitedWriter<'a> {
    inner: &'a mut dyn Write,
    limit: u64,
    pub count: u64,
    pub exceeded: bool,
}

impl<'a> LimitedWriter<'a> {
    pub fn new(inner: &'a mut dyn Write, limit: u64) -> Self {
        Self { inner, limit, count: 0, exceeded: false }
    }
}

impl Write for LimitedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() as u64 > self.limit - self.count {
            self.exceeded = true;
            return Err(io::Error::new(
                io::ErrorKind::OutOfMemory,
                format!("output exceeds limit of {} bytes", self.limit),
            ));
        }
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
