//! Key records: the header placed in front of every stored object.
//!
//! ```text
//! n_bytes   u32   key header + stored payload
//! version   u16
//! obj_len   u32   uncompressed payload length
//! key_len   u16   length of this header
//! cycle     u16
//! seek_key  u64   absolute position of this record
//! class, name, title   strings
//! ```

use crate::error::{Result, RootError};
use crate::rbuffer::RBuffer;
use crate::wbuffer::WBuffer;

/// Current key record version.
pub const KEY_VERSION: u16 = 1;

/// A parsed key record.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// Total number of bytes in the stored payload + key header.
    pub n_bytes: u32,
    /// Key record version.
    pub version: u16,
    /// Uncompressed object length.
    pub obj_len: u32,
    /// Length of the key header itself.
    pub key_len: u16,
    /// Cycle number.
    pub cycle: u16,
    /// Absolute position of this key in the file.
    pub seek_key: u64,
    /// Class name of the stored object.
    pub class_name: String,
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
}

/// Public info about a key (for `list_keys()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Object name.
    pub name: String,
    /// Object class name (e.g. "TH1D", "TDirectory").
    pub class_name: String,
    /// Object title.
    pub title: String,
    /// Cycle number.
    pub cycle: u16,
}

impl KeyInfo {
    /// Create from an internal Key.
    pub fn from_key(key: &Key) -> Self {
        Self {
            name: key.name.clone(),
            class_name: key.class_name.clone(),
            title: key.title.clone(),
            cycle: key.cycle,
        }
    }
}

impl Key {
    /// Header length for the given strings.
    pub fn header_len(class_name: &str, name: &str, title: &str) -> usize {
        let s = |v: &str| if v.len() < 255 { 1 + v.len() } else { 5 + v.len() };
        4 + 2 + 4 + 2 + 2 + 8 + s(class_name) + s(name) + s(title)
    }

    /// Read a key header from the buffer at the current position.
    pub fn read(r: &mut RBuffer) -> Result<Self> {
        let n_bytes = r.read_u32()?;
        let version = r.read_u16()?;
        if version != KEY_VERSION {
            return Err(RootError::Deserialization(format!("unsupported key version {version}")));
        }
        let obj_len = r.read_u32()?;
        let key_len = r.read_u16()?;
        let cycle = r.read_u16()?;
        let seek_key = r.read_u64()?;
        let class_name = r.read_string()?;
        let name = r.read_string()?;
        let title = r.read_string()?;

        if (key_len as u32) > n_bytes {
            return Err(RootError::Deserialization(format!(
                "key '{name}': header length {key_len} exceeds record length {n_bytes}"
            )));
        }

        Ok(Key { n_bytes, version, obj_len, key_len, cycle, seek_key, class_name, name, title })
    }

    /// Write this key header.
    pub fn write(&self, w: &mut WBuffer) {
        w.write_u32(self.n_bytes);
        w.write_u16(self.version);
        w.write_u32(self.obj_len);
        w.write_u16(self.key_len);
        w.write_u16(self.cycle);
        w.write_u64(self.seek_key);
        w.write_string(&self.class_name);
        w.write_string(&self.name);
        w.write_string(&self.title);
    }

    /// Whether the payload is stored without compression.
    pub fn is_raw(&self) -> bool {
        self.obj_len == self.n_bytes - self.key_len as u32
    }

    /// Whether this key points to a subdirectory.
    pub fn is_directory(&self) -> bool {
        self.class_name == crate::directory::DIRECTORY_CLASS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_len_matches_written_bytes() {
        let key = Key {
            n_bytes: 100,
            version: KEY_VERSION,
            obj_len: 60,
            key_len: Key::header_len("TH1D", "sig1", "Signal 1") as u16,
            cycle: 1,
            seek_key: 24,
            class_name: "TH1D".into(),
            name: "sig1".into(),
            title: "Signal 1".into(),
        };
        let mut w = WBuffer::new();
        key.write(&mut w);
        assert_eq!(w.len(), key.key_len as usize);

        let bytes = w.into_inner();
        let back = Key::read(&mut RBuffer::new(&bytes)).unwrap();
        assert_eq!(back, key);
        assert!(!back.is_raw());
    }

    #[test]
    fn rejects_unknown_version() {
        let mut w = WBuffer::new();
        w.write_u32(30);
        w.write_u16(99);
        w.write_bytes(&[0u8; 24]);
        let bytes = w.into_inner();
        assert!(matches!(Key::read(&mut RBuffer::new(&bytes)), Err(RootError::Deserialization(_))));
    }
}
