//! Big-endian writer, the mirror of [`RBuffer`](crate::rbuffer::RBuffer).

use crate::rbuffer::BYTE_COUNT_MASK;

/// Growable big-endian output buffer.
#[derive(Debug, Default)]
pub struct WBuffer {
    data: Vec<u8>,
}

impl WBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume into the underlying bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, b: &[u8]) {
        self.data.extend_from_slice(b);
    }

    /// Append one byte.
    pub fn write_u8(&mut self, v: u8) {
        self.data.push(v);
    }

    /// Append a big-endian u16.
    pub fn write_u16(&mut self, v: u16) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Append a big-endian i16.
    pub fn write_i16(&mut self, v: i16) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Append a big-endian u32.
    pub fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Append a big-endian i32.
    pub fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Append a big-endian u64.
    pub fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Append a big-endian f32.
    pub fn write_f32(&mut self, v: f32) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Append a big-endian f64.
    pub fn write_f64(&mut self, v: f64) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Append a length-prefixed string (1 byte, or 255 + u32 for long strings).
    pub fn write_string(&mut self, s: &str) {
        let b = s.as_bytes();
        if b.len() < 255 {
            self.write_u8(b.len() as u8);
        } else {
            self.write_u8(255);
            self.write_u32(b.len() as u32);
        }
        self.write_bytes(b);
    }

    /// Append a counted f64 array.
    pub fn write_counted_f64(&mut self, values: &[f64]) {
        self.write_u32(values.len() as u32);
        for &v in values {
            self.write_f64(v);
        }
    }

    /// Write a versioned object: byte-count header, version, then `body`.
    pub fn write_versioned(&mut self, version: u16, body: impl FnOnce(&mut WBuffer)) {
        let start = self.data.len();
        self.write_u32(0);
        self.write_u16(version);
        body(self);
        let byte_count = (self.data.len() - start - 4) as u32;
        self.data[start..start + 4].copy_from_slice(&(byte_count | BYTE_COUNT_MASK).to_be_bytes());
    }

    /// Write a named header: version + name + title.
    pub fn write_tnamed(&mut self, name: &str, title: &str) {
        self.write_versioned(1, |w| {
            w.write_string(name);
            w.write_string(title);
        });
    }

    /// Overwrite bytes at `pos` (used to patch headers after the fact).
    pub fn patch(&mut self, pos: usize, b: &[u8]) {
        self.data[pos..pos + b.len()].copy_from_slice(b);
    }
}
