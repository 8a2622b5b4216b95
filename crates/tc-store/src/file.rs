//! File header parsing and the read-side container interface.

use std::fs;
use std::path::{Path, PathBuf};

use tc_core::{Histogram, SavedCanvas};

use crate::compress::decompress;
use crate::directory::Directory;
use crate::error::{Result, RootError};
use crate::key::{Key, KeyInfo};
use crate::objects::StoreObject;
use crate::rbuffer::RBuffer;
use crate::writer::DirNode;

/// File magic.
pub const MAGIC: &[u8; 4] = b"tcst";
/// Current container format version.
pub const FORMAT_VERSION: u32 = 1;
/// Size of the fixed file header.
///
/// ```text
/// offset  size  field
///    0      4   magic "tcst"
///    4      4   format version
///    8      4   compression level (0 = none)
///   12      8   seek of the top directory key
///   20      4   n_bytes of the top directory key
/// ```
pub const HEADER_LEN: usize = 24;

/// A container opened for reading.
#[derive(Debug)]
pub struct StoreFile {
    data: Vec<u8>,
    path: PathBuf,
    compression: u32,
    top: Key,
}

impl StoreFile {
    /// Read and parse a container from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path).map_err(|e| RootError::at_path(&path, e))?;
        Self::from_bytes(data, path)
    }

    /// Parse a container held in memory; `path` is used for diagnostics only.
    pub fn from_bytes(data: Vec<u8>, path: PathBuf) -> Result<Self> {
        if data.len() < HEADER_LEN || &data[0..4] != MAGIC {
            return Err(RootError::BadMagic);
        }
        let mut r = RBuffer::new(&data);
        r.set_pos(4);
        let version = r.read_u32()?;
        if version != FORMAT_VERSION {
            return Err(RootError::UnsupportedVersion(version));
        }
        let compression = r.read_u32()?;
        let seek_dir = r.read_u64()?;
        let nbytes_dir = r.read_u32()?;

        let start = usize::try_from(seek_dir)
            .map_err(|_| RootError::Deserialization(format!("seek offset too large: {seek_dir}")))?;
        if start < HEADER_LEN || start >= data.len() {
            return Err(RootError::Deserialization(format!(
                "top directory seek {start} outside file of {} bytes",
                data.len()
            )));
        }
        r.set_pos(start);
        let top = Key::read(&mut r)?;
        if !top.is_directory() || top.n_bytes != nbytes_dir || top.seek_key != seek_dir {
            return Err(RootError::Deserialization(format!(
                "header points at '{}' ({}), not the top directory",
                top.name, top.class_name
            )));
        }
        if start + top.n_bytes as usize > data.len() {
            return Err(RootError::BufferUnderflow {
                offset: start,
                need: top.n_bytes as usize,
                have: data.len() - start,
            });
        }

        Ok(Self { data, path, compression, top })
    }

    /// Path this container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compression level recorded in the header.
    pub fn compression(&self) -> u32 {
        self.compression
    }

    /// List top-level keys.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>> {
        self.list_keys_in("")
    }

    /// List keys of the directory at `dir_path` (`""` for the top level).
    pub fn list_keys_in(&self, dir_path: &str) -> Result<Vec<KeyInfo>> {
        let dir = self.resolve_directory(dir_path)?;
        Ok(dir.keys().iter().map(KeyInfo::from_key).collect())
    }

    /// Get a histogram by its full path (e.g. `"cat1/sig1"`).
    pub fn get_histogram(&self, path: &str) -> Result<Histogram> {
        match self.get_object(path)? {
            StoreObject::Histogram(h) => Ok(h),
            StoreObject::Canvas(_) => {
                Err(RootError::Deserialization(format!("'{path}' is a canvas, not a histogram")))
            }
        }
    }

    /// Get a canvas by its full path.
    pub fn get_canvas(&self, path: &str) -> Result<SavedCanvas> {
        match self.get_object(path)? {
            StoreObject::Canvas(c) => Ok(c),
            StoreObject::Histogram(_) => {
                Err(RootError::Deserialization(format!("'{path}' is a histogram, not a canvas")))
            }
        }
    }

    /// Decode any non-directory object by path.
    pub fn get_object(&self, path: &str) -> Result<StoreObject> {
        let key = self.resolve_key(path)?;
        if key.is_directory() {
            return Err(RootError::Deserialization(format!("'{path}' is a directory")));
        }
        let payload = read_key_payload_from(&self.data, &key)?;
        StoreObject::from_payload(&key.class_name, &payload)
    }

    /// Full paths of every stored object, depth-first in storage order.
    pub fn object_paths(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        self.collect_paths(&self.read_directory(&self.top)?, "", &mut out)?;
        Ok(out)
    }

    fn collect_paths(&self, dir: &Directory, prefix: &str, out: &mut Vec<String>) -> Result<()> {
        for key in dir.keys() {
            let path = join(prefix, &key.name);
            if key.is_directory() {
                self.collect_paths(&self.read_directory(key)?, &path, out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }

    /// Decode the whole file into an in-memory tree (used by update mode).
    pub(crate) fn load_tree(&self) -> Result<DirNode> {
        self.load_dir(&self.top)
    }

    fn load_dir(&self, key: &Key) -> Result<DirNode> {
        let mut node = DirNode::new(&key.name, &key.title);
        for child in self.read_directory(key)?.keys() {
            if child.is_directory() {
                node.insert_dir(self.load_dir(child)?);
            } else {
                let payload = read_key_payload_from(&self.data, child)?;
                node.insert_object(StoreObject::from_payload(&child.class_name, &payload)?);
            }
        }
        Ok(node)
    }

    fn read_directory(&self, key: &Key) -> Result<Directory> {
        Directory::read_payload(&read_key_payload_from(&self.data, key)?)
    }

    fn resolve_directory(&self, dir_path: &str) -> Result<Directory> {
        let key = if split(dir_path).is_empty() { self.top.clone() } else { self.resolve_key(dir_path)? };
        if !key.is_directory() {
            return Err(RootError::Deserialization(format!(
                "'{dir_path}' is not a directory (class: {})",
                key.class_name
            )));
        }
        self.read_directory(&key)
    }

    fn resolve_key(&self, path: &str) -> Result<Key> {
        let parts = split(path);
        let Some((last, dirs)) = parts.split_last() else {
            return Err(RootError::KeyNotFound(path.to_string()));
        };

        let mut current = self.read_directory(&self.top)?;
        for &part in dirs {
            let key = current
                .find_key(part)
                .ok_or_else(|| RootError::KeyNotFound(format!("{part} (in path {path})")))?;
            if !key.is_directory() {
                return Err(RootError::Deserialization(format!(
                    "'{}' is not a directory (class: {})",
                    part, key.class_name
                )));
            }
            current = self.read_directory(key)?;
        }
        current.find_key(last).cloned().ok_or_else(|| RootError::KeyNotFound(path.to_string()))
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() { name.to_string() } else { format!("{prefix}/{name}") }
}

/// Payload bytes of `key`, decompressed if needed.
pub(crate) fn read_key_payload_from(data: &[u8], key: &Key) -> Result<Vec<u8>> {
    let seek = usize::try_from(key.seek_key)
        .map_err(|_| RootError::Deserialization(format!("seek offset too large: {}", key.seek_key)))?;
    let n_bytes = key.n_bytes as usize;
    if seek.saturating_add(n_bytes) > data.len() {
        return Err(RootError::BufferUnderflow {
            offset: seek,
            need: n_bytes,
            have: data.len().saturating_sub(seek),
        });
    }

    let stored = &data[seek + key.key_len as usize..seek + n_bytes];
    if key.is_raw() { Ok(stored.to_vec()) } else { decompress(stored, key.obj_len as usize) }
}
