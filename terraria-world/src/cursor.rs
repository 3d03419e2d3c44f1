//! Positioned little-endian primitives over in-memory buffers.

use std::io::{self, Read};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::error::{CodecError, Result};

/// Read side of the byte cursor.
pub struct Reader<'a> {
    inner: io::Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            inner: io::Cursor::new(bytes),
        }
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn seek(&mut self, pos: u64) {
        self.inner.set_position(pos);
    }

    fn remaining(&self) -> usize {
        let len = self.inner.get_ref().len() as u64;
        len.saturating_sub(self.inner.position()) as usize
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.inner.read_i16::<LE>()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<LE>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.inner.read_i32::<LE>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.inner.read_i64::<LE>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.inner.read_f32::<LE>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.inner.read_f64::<LE>()?)
    }

    /// One byte, nonzero meaning true.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Length-prefixed string: 1-byte length, then that many bytes.
    pub fn read_pstring(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        if len > self.remaining() {
            return Err(CodecError::CorruptFormat(format!(
                "string length {} exceeds the {} bytes left in the buffer",
                len,
                self.remaining()
            )));
        }
        let mut buf = vec![0; len];
        self.inner.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|_| CodecError::InvalidUtf8)
    }
}

/// Write side of the byte cursor: append-only over an owned buffer.
///
/// The write methods mirror `byteorder`'s fallible signatures even
/// though appending to a `Vec` cannot fail, so read and write code
/// keep the same `?` shape.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        Ok(self.buf.write_u8(v)?)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        Ok(self.buf.write_i16::<LE>(v)?)
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        Ok(self.buf.write_u16::<LE>(v)?)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        Ok(self.buf.write_i32::<LE>(v)?)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        Ok(self.buf.write_i64::<LE>(v)?)
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        Ok(self.buf.write_f32::<LE>(v)?)
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        Ok(self.buf.write_f64::<LE>(v)?)
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(u8::from(v))
    }

    pub fn write_pstring(&mut self, s: &str) -> Result<()> {
        if s.len() > 255 {
            return Err(CodecError::InvalidArgument(format!(
                "string of {} bytes does not fit a 1-byte length prefix",
                s.len()
            )));
        }
        self.write_u8(s.len() as u8)?;
        self.extend(s.as_bytes());
        Ok(())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}
