//! SVG/PNG rendering of histogram overlays.
//!
//! Processes are drawn as coloured step lines and the observed histogram as
//! markers with asymmetric error bars. The SVG document is kept as the
//! canvas object stored next to the histograms; the PNG is written to disk.

pub mod canvas;
pub mod color;
pub mod config;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;

use std::path::Path;

use config::PlotConfig;
use tc_core::{Histogram, SavedCanvas};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for tc_core::Error {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io { path, source } => tc_core::Error::Path { path, source },
            other => tc_core::Error::Render(other.to_string()),
        }
    }
}

/// Render the overlay to an SVG string.
pub fn render_svg(observed: &Histogram, processes: &[Histogram], config: &PlotConfig) -> Result<String> {
    plots::hists::render(observed, processes, config)
}

/// Render the overlay, write it as PNG to `png_path`, and return the canvas
/// for storage alongside the histograms.
///
/// Missing parent directories of `png_path` are created.
pub fn plot_histograms(
    observed: &Histogram,
    processes: &[Histogram],
    png_path: &Path,
    config: &PlotConfig,
) -> Result<SavedCanvas> {
    let svg = render_svg(observed, processes, config)?;
    let png = output::png::svg_to_png(&svg, config.dpi)?;

    if let Some(parent) = png_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|source| RenderError::Io { path: parent.to_path_buf(), source })?;
    }
    std::fs::write(png_path, &png)
        .map_err(|source| RenderError::Io { path: png_path.to_path_buf(), source })?;
    log::info!("wrote plot {} ({} bytes)", png_path.display(), png.len());

    Ok(SavedCanvas {
        name: config.name.clone(),
        title: config.title.clone(),
        width: config.width,
        height: config.height,
        svg,
    })
}
