//! Append-only output sinks the encoder writes into.
//!
//! Every sink is little-endian; multi-byte helpers on [`BinaryWrite`] always
//! emit the least significant byte first.

use core::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// Errors reported by a sink. The encoder reclassifies these into
/// [`EncodingError`](crate::EncodingError) before they reach a caller.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("buffer full: {needed} bytes needed, {remaining} remaining")]
    OutOfSpace { needed: usize, remaining: usize },

    #[error("size limit {limit} exceeded by write up to {attempted} bytes")]
    LimitExceeded { attempted: usize, limit: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Byte destination with position tracking. No seeking or backpatching.
pub trait BinaryWrite {
    fn write(&mut self, data: &[u8]) -> Result<usize, SinkError>;

    /// Number of bytes written so far.
    fn position(&self) -> usize;

    fn order(&self) -> ByteOrder {
        ByteOrder::LittleEndian
    }

    fn put_byte(&mut self, byte: u8) -> Result<usize, SinkError> {
        self.write(&[byte])
    }

    fn put_short_le(&mut self, value: i16) -> Result<usize, SinkError> {
        self.write(&value.to_le_bytes())
    }

    fn put_int_le(&mut self, value: i32) -> Result<usize, SinkError> {
        self.write(&value.to_le_bytes())
    }

    fn put_long_le(&mut self, value: i64) -> Result<usize, SinkError> {
        self.write(&value.to_le_bytes())
    }

    fn put_float_le(&mut self, value: f32) -> Result<usize, SinkError> {
        self.write(&value.to_le_bytes())
    }

    fn put_double_le(&mut self, value: f64) -> Result<usize, SinkError> {
        self.write(&value.to_le_bytes())
    }

    fn put_bytes(&mut self, data: &[u8]) -> Result<usize, SinkError> {
        self.write(data)
    }
}

/// Sink over a caller-owned fixed slice.
pub struct OutputBuffer<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> OutputBuffer<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { offset: 0, buffer }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn is_full(&self) -> bool {
        self.offset == self.buffer.len()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.offset]
    }
}

impl BinaryWrite for OutputBuffer<'_> {
    fn write(&mut self, data: &[u8]) -> Result<usize, SinkError> {
        let data_size = data.len();

        // Nothing to write
        if data_size == 0 {
            return Ok(0);
        }

        if data_size > self.remaining() {
            return Err(SinkError::OutOfSpace { needed: data_size, remaining: self.remaining() });
        }

        self.buffer[self.offset..(self.offset + data_size)].copy_from_slice(data);
        self.offset += data_size;

        Ok(data_size)
    }

    fn position(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for OutputBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ 0x{} ]", hex::encode(self.as_slice()))
    }
}

/// Growable in-memory sink with an optional size cap.
///
/// Records are serialized into one of these before being copied, length
/// prefixed, into the real output.
#[derive(Debug, Default, Clone)]
pub struct LimitedBuffer {
    data: Vec<u8>,
    limit: Option<usize>,
}

impl LimitedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { data: Vec::new(), limit: Some(limit) }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl BinaryWrite for LimitedBuffer {
    fn write(&mut self, data: &[u8]) -> Result<usize, SinkError> {
        let attempted = self.data.len() + data.len();
        if let Some(limit) = self.limit {
            if attempted > limit {
                return Err(SinkError::LimitExceeded { attempted, limit });
            }
        }
        self.data.extend_from_slice(data);
        Ok(data.len())
    }

    fn position(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Display for LimitedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ 0x{} ]", hex::encode(&self.data))
    }
}

/// Adapter that forwards writes to any [`io::Write`], such as a socket.
pub struct StreamWriter<W> {
    inner: W,
    written: usize,
}

impl<W: io::Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> BinaryWrite for StreamWriter<W> {
    fn write(&mut self, data: &[u8]) -> Result<usize, SinkError> {
        self.inner.write_all(data)?;
        self.written += data.len();
        Ok(data.len())
    }

    fn position(&self) -> usize {
        self.written
    }
}
