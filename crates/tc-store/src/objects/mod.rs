//! Object (de)serialization dispatch.

mod canvas;
mod th1;

use tc_core::{Histogram, SavedCanvas};

use crate::error::{Result, RootError};

pub use canvas::{CANVAS_CLASS, read_canvas, write_canvas};
pub use th1::{TH1D_CLASS, read_th1d, write_th1d};

/// Anything the container can hold besides directories.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreObject {
    /// A 1D histogram (`TH1D`).
    Histogram(Histogram),
    /// A rendered plot (`TCanvas`).
    Canvas(SavedCanvas),
}

impl StoreObject {
    /// Key name.
    pub fn name(&self) -> &str {
        match self {
            StoreObject::Histogram(h) => &h.name,
            StoreObject::Canvas(c) => &c.name,
        }
    }

    /// Key title.
    pub fn title(&self) -> &str {
        match self {
            StoreObject::Histogram(h) => &h.title,
            StoreObject::Canvas(c) => &c.title,
        }
    }

    /// Stored class name.
    pub fn class_name(&self) -> &'static str {
        match self {
            StoreObject::Histogram(_) => TH1D_CLASS,
            StoreObject::Canvas(_) => CANVAS_CLASS,
        }
    }

    /// Uncompressed payload bytes.
    pub fn to_payload(&self) -> Vec<u8> {
        match self {
            StoreObject::Histogram(h) => write_th1d(h),
            StoreObject::Canvas(c) => write_canvas(c),
        }
    }

    /// Decode a payload given its class name.
    pub fn from_payload(class_name: &str, payload: &[u8]) -> Result<Self> {
        match class_name {
            TH1D_CLASS => Ok(StoreObject::Histogram(read_th1d(payload)?)),
            CANVAS_CLASS => Ok(StoreObject::Canvas(read_canvas(payload)?)),
            other => Err(RootError::UnsupportedClass(other.to_string())),
        }
    }
}

impl From<Histogram> for StoreObject {
    fn from(h: Histogram) -> Self {
        StoreObject::Histogram(h)
    }
}

impl From<SavedCanvas> for StoreObject {
    fn from(c: SavedCanvas) -> Self {
        StoreObject::Canvas(c)
    }
}
