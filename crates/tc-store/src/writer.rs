//! Write-side container interface.
//!
//! The writer keeps the whole directory tree in memory and serializes it in one
//! pass on [`StoreWriter::finish`]: children first, then their directory record,
//! then the file header pointing at the top directory. Objects are keyed by name
//! within a directory, so putting an object whose name already exists replaces it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::compress::compress;
use crate::directory::{DIRECTORY_CLASS, Directory};
use crate::error::{Result, RootError};
use crate::file::{FORMAT_VERSION, HEADER_LEN, MAGIC, StoreFile};
use crate::key::{KEY_VERSION, Key};
use crate::objects::StoreObject;
use crate::wbuffer::WBuffer;

/// Default zlib level.
pub const DEFAULT_COMPRESSION: u32 = 4;

/// How an existing destination file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Start from an empty container, discarding any existing file.
    #[default]
    Recreate,
    /// Load the existing container (if any) and merge into it.
    Update,
}

/// In-memory directory.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DirNode {
    name: String,
    title: String,
    objects: Vec<StoreObject>,
    dirs: Vec<DirNode>,
}

impl DirNode {
    pub(crate) fn new(name: &str, title: &str) -> Self {
        Self { name: name.to_string(), title: title.to_string(), objects: Vec::new(), dirs: Vec::new() }
    }

    pub(crate) fn insert_object(&mut self, obj: StoreObject) {
        match self.objects.iter_mut().find(|o| o.name() == obj.name()) {
            Some(slot) => *slot = obj,
            None => self.objects.push(obj),
        }
    }

    pub(crate) fn insert_dir(&mut self, dir: DirNode) {
        match self.dirs.iter_mut().find(|d| d.name == dir.name) {
            Some(slot) => *slot = dir,
            None => self.dirs.push(dir),
        }
    }

    /// Walk (creating as needed) to the subdirectory at `path`.
    fn subdir_mut(&mut self, path: &str) -> &mut DirNode {
        let mut node = self;
        for part in path.split('/').filter(|s| !s.is_empty()) {
            let idx = match node.dirs.iter().position(|d| d.name == part) {
                Some(i) => i,
                None => {
                    node.dirs.push(DirNode::new(part, part));
                    node.dirs.len() - 1
                }
            };
            node = &mut node.dirs[idx];
        }
        node
    }
}

/// Builds a container and writes it to disk.
#[derive(Debug)]
pub struct StoreWriter {
    path: PathBuf,
    compression: u32,
    root: DirNode,
}

impl StoreWriter {
    /// Prepare a writer for `path`.
    ///
    /// In [`WriteMode::Update`] an existing file is loaded so its contents survive;
    /// a missing file is treated as empty.
    pub fn create(path: impl AsRef<Path>, mode: WriteMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let top_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let root = match mode {
            WriteMode::Update if path.exists() => {
                log::debug!("updating existing container {}", path.display());
                StoreFile::open(&path)?.load_tree()?
            }
            _ => DirNode::new(&top_name, &top_name),
        };
        Ok(Self { path, compression: DEFAULT_COMPRESSION, root })
    }

    /// Override the zlib level (0 disables compression).
    pub fn with_compression(mut self, level: u32) -> Self {
        self.compression = level;
        self
    }

    /// Put `obj` into the directory at `dir` (`""` for the top level), replacing any
    /// same-name entry.
    pub fn put(&mut self, dir: &str, obj: impl Into<StoreObject>) {
        let obj = obj.into();
        log::debug!("  {}/{} ({})", dir, obj.name(), obj.class_name());
        self.root.subdir_mut(dir).insert_object(obj);
    }

    /// Serialize everything and write the file.
    pub fn finish(self) -> Result<PathBuf> {
        let mut w = WBuffer::new();
        w.write_bytes(&[0u8; HEADER_LEN]);
        let top = write_dir(&mut w, &self.root, self.compression)?;

        let mut header = WBuffer::new();
        header.write_bytes(MAGIC);
        header.write_u32(FORMAT_VERSION);
        header.write_u32(self.compression);
        header.write_u64(top.seek_key);
        header.write_u32(top.n_bytes);
        w.patch(0, &header.into_inner());

        fs::write(&self.path, w.into_inner()).map_err(|e| RootError::at_path(&self.path, e))?;
        Ok(self.path)
    }
}

fn write_dir(w: &mut WBuffer, dir: &DirNode, compression: u32) -> Result<Key> {
    let mut keys = Vec::with_capacity(dir.objects.len() + dir.dirs.len());
    for obj in &dir.objects {
        let payload = obj.to_payload();
        keys.push(write_record(w, obj.class_name(), obj.name(), obj.title(), &payload, compression)?);
    }
    for sub in &dir.dirs {
        keys.push(write_dir(w, sub, compression)?);
    }
    let payload = Directory::new(keys).write_payload();
    write_record(w, DIRECTORY_CLASS, &dir.name, &dir.title, &payload, compression)
}

fn write_record(
    w: &mut WBuffer,
    class_name: &str,
    name: &str,
    title: &str,
    payload: &[u8],
    compression: u32,
) -> Result<Key> {
    let packed = compress(payload, compression)?;
    let stored: &[u8] = packed.as_deref().unwrap_or(payload);

    let key_len = Key::header_len(class_name, name, title);
    let too_big = |what: &str| RootError::Deserialization(format!("{what} of '{name}' too large"));
    let key = Key {
        n_bytes: u32::try_from(key_len + stored.len()).map_err(|_| too_big("record"))?,
        version: KEY_VERSION,
        obj_len: u32::try_from(payload.len()).map_err(|_| too_big("payload"))?,
        key_len: u16::try_from(key_len).map_err(|_| too_big("key header"))?,
        cycle: 1,
        seek_key: w.len() as u64,
        class_name: class_name.to_string(),
        name: name.to_string(),
        title: title.to_string(),
    };
    key.write(w);
    w.write_bytes(stored);
    Ok(key)
}

/// Write `objects` under `subdir` of the container at `path`.
///
/// Missing parent directories are created. Returns the written path.
pub fn write_objects(
    objects: &[StoreObject],
    subdir: &str,
    path: impl AsRef<Path>,
    mode: WriteMode,
) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        log::debug!("creating directory {}", parent.display());
        fs::create_dir_all(parent).map_err(|e| RootError::at_path(parent, e))?;
    }

    log::info!("writing {} objects to {}:{}", objects.len(), path.display(), subdir);
    let mut writer = StoreWriter::create(path, mode)?;
    for obj in objects {
        writer.put(subdir, obj.clone());
    }
    writer.finish()
}
