//! # tc-store
//!
//! Keyed binary container for ToyCombine histograms and plots.
//!
//! The layout borrows ROOT's conventions (big-endian records, key headers,
//! `ZL` zlib blocks, nested directories) but is its own format with its own
//! magic; it is not readable by ROOT.
//!
//! ## Example
//!
//! ```no_run
//! use tc_store::{StoreFile, WriteMode, write_objects};
//! # fn demo(objs: &[tc_store::StoreObject]) -> tc_store::Result<()> {
//! let path = write_objects(objs, "cat1", "input/hists.root", WriteMode::Recreate)?;
//! let f = StoreFile::open(&path)?;
//! for key in f.list_keys_in("cat1")? {
//!     println!("{} ({})", key.name, key.class_name);
//! }
//! let h = f.get_histogram("cat1/sig1")?;
//! println!("bins: {}, entries: {}", h.n_bins(), h.entries());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compress;
pub mod directory;
pub mod error;
pub mod file;
pub mod key;
pub mod objects;
pub mod rbuffer;
pub mod wbuffer;
pub mod writer;

pub use error::{Result, RootError};
pub use file::StoreFile;
pub use key::KeyInfo;
pub use objects::StoreObject;
pub use writer::{DEFAULT_COMPRESSION, StoreWriter, WriteMode, write_objects};
