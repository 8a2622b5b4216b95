//! # tc-toys
//!
//! Toy Monte Carlo for ToyCombine: Gaussian signal peaks, an exponential
//! background and Poisson-fluctuated pseudo-data, all driven by one explicit
//! random generator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod observed;
pub mod sampler;
pub mod shapes;

use rand::Rng;
use tc_core::{Histogram, Result, ToyConfig};

pub use observed::{OBSERVED_NAME, observed_style, synthesize_observed};
pub use sampler::{BACKGROUND_NAME, fill_random, sample_background, sample_signals};
pub use shapes::{Shape, TruncatedExponential, TruncatedGaussian};

/// Everything generated for one toy.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyDataset {
    /// `sig1..sigN`, in configuration order.
    pub signals: Vec<Histogram>,
    /// Background histograms (one).
    pub backgrounds: Vec<Histogram>,
    /// Poisson-fluctuated sum of all processes.
    pub observed: Histogram,
}

impl ToyDataset {
    /// Signals followed by backgrounds.
    pub fn processes(&self) -> impl Iterator<Item = &Histogram> {
        self.signals.iter().chain(&self.backgrounds)
    }

    /// Processes followed by the observed histogram.
    pub fn all(&self) -> impl Iterator<Item = &Histogram> {
        self.processes().chain(std::iter::once(&self.observed))
    }
}

/// Validate `cfg`, sample every process and synthesize the observed data.
pub fn generate<R: Rng + ?Sized>(cfg: &ToyConfig, rng: &mut R) -> Result<ToyDataset> {
    cfg.validate()?;
    let n_sig = cfg.signal_events();
    let n_bkg = cfg.background_events();
    log::info!(
        "generating toy: {} events ({n_sig} signal, {n_bkg} background), {} bins over [{}, {}]",
        cfg.n_events,
        cfg.binning.n_bins,
        cfg.binning.x_min,
        cfg.binning.x_max
    );

    let signals = sample_signals(cfg.binning, n_sig, &cfg.signals, rng)?;
    let backgrounds =
        sample_background(cfg.binning, n_bkg, cfg.background.slope, signals.len(), rng)?;

    let processes: Vec<Histogram> = signals.iter().chain(&backgrounds).cloned().collect();
    let observed = synthesize_observed(&processes, rng)?;

    Ok(ToyDataset { signals, backgrounds, observed })
}
