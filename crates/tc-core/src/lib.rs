//! # tc-core
//!
//! Core types for ToyCombine: the error taxonomy, the fixed-width histogram
//! shared by every stage, and the toy-generation configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod histogram;

pub use config::{BackgroundComponent, SignalComponent, ToyConfig, event_count};
pub use error::{Error, Result};
pub use histogram::{
    BinErrorOption, BinLocation, Binning, DrawStyle, Histogram, ONE_SIGMA_COVERAGE,
    poisson_interval,
};

/// Crate version, reported by `toycombine --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A rendered canvas kept alongside the histograms in the container.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCanvas {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Standalone SVG document.
    pub svg: String,
}
