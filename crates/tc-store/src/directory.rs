//! Directory records and key-list navigation.
//!
//! A directory is stored like any other object: a key of class `TDirectory`
//! whose payload is `u32 nkeys` followed by `nkeys` key headers.

use crate::error::Result;
use crate::key::Key;
use crate::rbuffer::RBuffer;
use crate::wbuffer::WBuffer;

/// Class name used for directory keys.
pub const DIRECTORY_CLASS: &str = "TDirectory";

/// A parsed directory: an ordered list of keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    keys: Vec<Key>,
}

impl Directory {
    /// Build from keys in storage order.
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// Parse the (decompressed) payload of a directory key.
    pub fn read_payload(payload: &[u8]) -> Result<Self> {
        let mut r = RBuffer::new(payload);
        let nkeys = r.read_u32()? as usize;
        let mut keys = Vec::with_capacity(nkeys.min(payload.len()));
        for _ in 0..nkeys {
            keys.push(Key::read(&mut r)?);
        }
        Ok(Directory { keys })
    }

    /// Serialize the key list as a directory payload.
    pub fn write_payload(&self) -> Vec<u8> {
        let mut w = WBuffer::new();
        w.write_u32(self.keys.len() as u32);
        for k in &self.keys {
            k.write(&mut w);
        }
        w.into_inner()
    }

    /// Access the list of keys.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Find a key by name (highest cycle wins).
    pub fn find_key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().filter(|k| k.name == name).max_by_key(|k| k.cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KEY_VERSION;

    fn key(name: &str, cycle: u16, seek: u64) -> Key {
        Key {
            n_bytes: 64,
            version: KEY_VERSION,
            obj_len: 32,
            key_len: Key::header_len("TH1D", name, "") as u16,
            cycle,
            seek_key: seek,
            class_name: "TH1D".into(),
            name: name.into(),
            title: String::new(),
        }
    }

    #[test]
    fn payload_round_trip_and_lookup() {
        let dir = Directory::new(vec![key("a", 1, 24), key("b", 1, 88), key("a", 2, 152)]);
        let back = Directory::read_payload(&dir.write_payload()).unwrap();
        assert_eq!(back, dir);
        assert_eq!(back.find_key("a").unwrap().seek_key, 152);
        assert!(back.find_key("zzz").is_none());
    }

    #[test]
    fn empty_directory() {
        let dir = Directory::read_payload(&Directory::default().write_payload()).unwrap();
        assert!(dir.keys().is_empty());
    }
}
