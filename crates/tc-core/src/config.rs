//! Toy generation configuration.
//!
//! Defaults reproduce the reference toy: 5000 events over 50 bins in `[0, 100]`,
//! 40% signal split over three Gaussian peaks, 60% exponential background.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::histogram::Binning;

/// One Gaussian signal peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalComponent {
    /// Share of the signal total (not of the full event count).
    pub fraction: f64,
    /// Gaussian mean.
    pub mean: f64,
    /// Gaussian standard deviation.
    pub width: f64,
}

/// Exponential background `exp(slope * x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundComponent {
    /// Exponential slope (negative for a falling spectrum).
    pub slope: f64,
}

impl Default for BackgroundComponent {
    fn default() -> Self {
        Self { slope: -1.0 / 25.0 }
    }
}

/// Everything needed to generate one toy dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToyConfig {
    /// Seed of the single random generator.
    pub seed: u64,
    /// Total expected events (signal + background).
    pub n_events: u64,
    /// Share of `n_events` assigned to signal.
    pub signal_fraction: f64,
    /// Binning shared by all histograms.
    pub binning: Binning,
    /// Signal peaks, in output order.
    pub signals: Vec<SignalComponent>,
    /// Background shape.
    pub background: BackgroundComponent,
}

impl Default for ToyConfig {
    fn default() -> Self {
        Self {
            seed: 123_456_789,
            n_events: 5000,
            signal_fraction: 0.4,
            binning: Binning { n_bins: 50, x_min: 0.0, x_max: 100.0 },
            signals: vec![
                SignalComponent { fraction: 0.5, mean: 25.0, width: 3.0 },
                SignalComponent { fraction: 0.3, mean: 50.0, width: 7.0 },
                SignalComponent { fraction: 0.2, mean: 70.0, width: 10.0 },
            ],
            background: BackgroundComponent::default(),
        }
    }
}

impl ToyConfig {
    /// Signal total: `round(n_events * signal_fraction)`.
    pub fn signal_events(&self) -> u64 {
        event_count(self.signal_fraction, self.n_events)
    }

    /// Background total: whatever is left of `n_events`.
    pub fn background_events(&self) -> u64 {
        self.n_events.saturating_sub(self.signal_events())
    }

    /// Fail fast on anything that would make sampling meaningless.
    pub fn validate(&self) -> Result<()> {
        self.binning.validate()?;
        if !(0.0..=1.0).contains(&self.signal_fraction) {
            return Err(Error::Config(format!(
                "signal_fraction must lie in [0, 1], got {}",
                self.signal_fraction
            )));
        }
        for (i, s) in self.signals.iter().enumerate() {
            if !s.fraction.is_finite() || s.fraction < 0.0 {
                return Err(Error::Config(format!(
                    "signal {}: fraction must be finite and >= 0, got {}",
                    i + 1,
                    s.fraction
                )));
            }
            if !s.mean.is_finite() {
                return Err(Error::Config(format!("signal {}: mean must be finite", i + 1)));
            }
            if !s.width.is_finite() || s.width <= 0.0 {
                return Err(Error::Config(format!(
                    "signal {}: width must be > 0, got {}",
                    i + 1,
                    s.width
                )));
            }
        }
        if !self.background.slope.is_finite() {
            return Err(Error::Config("background slope must be finite".to_string()));
        }
        Ok(())
    }
}

/// `round(fraction * total)`, clamped at zero.
pub fn event_count(fraction: f64, total: u64) -> u64 {
    (fraction * total as f64).round().max(0.0) as u64
}
