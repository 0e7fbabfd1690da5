// Byte-cursor primitives for the wire format. Host-native byte order
// throughout: both ends of the pipe run on the same machine.

use std::io;

/// Appends fixed-width fields to a growable message buffer. One complete
/// message is encoded per buffer so it can cross the pipe in a single write.
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn put_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn put_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn put_f32_slice(&mut self, values: &[f32]) {
        self.buf.extend_from_slice(bytemuck::cast_slice(values));
    }

    pub fn put_u16_slice(&mut self, values: &[u16]) {
        self.buf.extend_from_slice(bytemuck::cast_slice(values));
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a byte buffer in field order; running past the end is an
/// `UnexpectedEof`, never a panic.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn take_u8(&mut self) -> io::Result<u8> {
        Ok(self.take_bytes(1)?[0])
    }

    pub fn take_u16(&mut self) -> io::Result<u16> {
        let bytes = self.take_bytes(2)?;
        Ok(u16::from_ne_bytes([bytes[0], bytes[1]]))
    }

    pub fn take_i16(&mut self) -> io::Result<i16> {
        let bytes = self.take_bytes(2)?;
        Ok(i16::from_ne_bytes([bytes[0], bytes[1]]))
    }

    pub fn take_i32(&mut self) -> io::Result<i32> {
        let bytes = self.take_bytes(4)?;
        Ok(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn take_f32(&mut self) -> io::Result<f32> {
        let bytes = self.take_bytes(4)?;
        Ok(f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn take_bytes(&mut self, len: usize) -> io::Result<&'a [u8]> {
        if self.pos + len > self.buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "message shorter than its implied layout",
            ));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
