//! The frame codec: Snappy-framed streams of big-endian scalars.
//!
//! Every column file is one Snappy frame-format stream. On top of the
//! compressed byte stream this module provides the fixed-width big-endian
//! primitive encodings and the length-prefixed string encoding the column
//! codecs are built from.
//!
//! # String encoding
//!
//! Strings are written as a 2-byte unsigned big-endian length followed by
//! that many bytes of modified UTF-8 (supplementary-plane characters as
//! surrogate pairs, NUL as the two-byte form). This matches the widely
//! deployed Java `DataOutput` encoding and is part of the wire contract.

use std::io::{self, Read, Write};

use snap::read::FrameDecoder;
use snap::write::FrameEncoder;

use crate::error::{SawError, SawResult};

/// Longest string encoding the 2-byte length prefix can describe.
const MAX_UTF_BYTES: usize = u16::MAX as usize;

/// Writes big-endian scalars into a Snappy-framed stream.
pub struct FrameWriter<W: Write> {
    inner: FrameEncoder<W>,
}

impl<W: Write> FrameWriter<W> {
    /// Wraps a raw byte sink.
    pub fn new(sink: W) -> Self {
        Self {
            inner: FrameEncoder::new(sink),
        }
    }

    /// Writes one signed byte.
    pub fn write_i8(&mut self, value: i8) -> SawResult<()> {
        self.inner.write_all(&[value as u8])?;
        Ok(())
    }

    /// Writes a 16-bit signed integer.
    pub fn write_i16(&mut self, value: i16) -> SawResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Writes a 32-bit signed integer.
    pub fn write_i32(&mut self, value: i32) -> SawResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Writes a 64-bit signed integer.
    pub fn write_i64(&mut self, value: i64) -> SawResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Writes a 32-bit float.
    pub fn write_f32(&mut self, value: f32) -> SawResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Writes a 64-bit float.
    pub fn write_f64(&mut self, value: f64) -> SawResult<()> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    /// Writes a length-prefixed modified-UTF-8 string.
    pub fn write_utf(&mut self, value: &str) -> SawResult<()> {
        let bytes = cesu8::to_java_cesu8(value);
        if bytes.len() > MAX_UTF_BYTES {
            return Err(SawError::invalid_argument(format!(
                "string encodes to {} bytes, above the {} byte limit of the length prefix",
                bytes.len(),
                MAX_UTF_BYTES
            )));
        }
        self.inner.write_all(&(bytes.len() as u16).to_be_bytes())?;
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Compresses and flushes everything buffered so far, closing the
    /// current compression block.
    pub fn flush(&mut self) -> SawResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes any buffered data and returns the underlying sink.
    pub fn into_inner(self) -> SawResult<W> {
        self.inner
            .into_inner()
            .map_err(|e| SawError::from(io::Error::new(e.error().kind(), e.error().to_string())))
    }
}

/// Reads big-endian scalars from a Snappy-framed stream.
pub struct FrameReader<R: Read> {
    inner: FrameDecoder<R>,
}

impl<R: Read> FrameReader<R> {
    /// Wraps a raw byte source.
    pub fn new(source: R) -> Self {
        Self {
            inner: FrameDecoder::new(source),
        }
    }

    fn read_array<const N: usize>(&mut self) -> SawResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(map_read_error)?;
        Ok(buf)
    }

    /// Reads one signed byte.
    pub fn read_i8(&mut self) -> SawResult<i8> {
        Ok(self.read_array::<1>()?[0] as i8)
    }

    /// Reads a 16-bit signed integer.
    pub fn read_i16(&mut self) -> SawResult<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Reads a 32-bit signed integer.
    pub fn read_i32(&mut self) -> SawResult<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Reads a 64-bit signed integer.
    pub fn read_i64(&mut self) -> SawResult<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    /// Reads a 32-bit float.
    pub fn read_f32(&mut self) -> SawResult<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    /// Reads a 64-bit float.
    pub fn read_f64(&mut self) -> SawResult<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Reads a length-prefixed modified-UTF-8 string.
    pub fn read_utf(&mut self) -> SawResult<String> {
        let len = u16::from_be_bytes(self.read_array()?) as usize;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf).map_err(map_read_error)?;
        let value = cesu8::from_java_cesu8(&buf)
            .map_err(|_| SawError::corrupt("invalid modified UTF-8 in string payload"))?;
        Ok(value.into_owned())
    }

    /// Requires that the decompressed stream is exhausted.
    pub fn expect_end(&mut self) -> SawResult<()> {
        let mut probe = [0u8; 1];
        match self.inner.read(&mut probe) {
            Ok(0) => Ok(()),
            Ok(_) => Err(SawError::corrupt(
                "trailing bytes after the end of the column payload",
            )),
            Err(e) => Err(map_read_error(e)),
        }
    }
}

/// A short read means the stream was truncated and a decode failure means
/// the compressed framing itself is damaged; both are corruption, not I/O.
fn map_read_error(error: io::Error) -> SawError {
    match error.kind() {
        io::ErrorKind::UnexpectedEof => SawError::corrupt("unexpected end of column stream"),
        io::ErrorKind::InvalidData => {
            SawError::corrupt(format!("undecodable compressed block: {error}"))
        }
        _ => SawError::from(error),
    }
}
