//! Fixed-width 1D histogram shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::{Error, Result};

/// One-sigma central coverage used for Poisson (Garwood) intervals.
pub const ONE_SIGMA_COVERAGE: f64 = 0.682_689_492_137_086;

/// Equal-width binning over `[x_min, x_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Number of regular bins (excluding under/overflow).
    pub n_bins: usize,
    /// Lower edge of the first bin.
    pub x_min: f64,
    /// Upper edge of the last bin.
    pub x_max: f64,
}

/// Where a value lands relative to the binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinLocation {
    /// Below `x_min`.
    Underflow,
    /// Regular bin, 0-based.
    Bin(usize),
    /// At or above `x_max` (and NaN).
    Overflow,
}

impl Binning {
    /// Create a validated binning.
    pub fn new(n_bins: usize, x_min: f64, x_max: f64) -> Result<Self> {
        let b = Self { n_bins, x_min, x_max };
        b.validate()?;
        Ok(b)
    }

    /// Reject non-positive bin counts and empty or non-finite ranges.
    pub fn validate(&self) -> Result<()> {
        if self.n_bins == 0 {
            return Err(Error::Config("histogram needs at least one bin".to_string()));
        }
        if !self.x_min.is_finite() || !self.x_max.is_finite() {
            return Err(Error::Config(format!(
                "axis range must be finite, got [{}, {}]",
                self.x_min, self.x_max
            )));
        }
        if self.x_min >= self.x_max {
            return Err(Error::Config(format!(
                "axis range requires xmin < xmax, got [{}, {}]",
                self.x_min, self.x_max
            )));
        }
        Ok(())
    }

    /// Width of every bin.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        (self.x_max - self.x_min) / self.n_bins as f64
    }

    /// Locate `x`.
    pub fn locate(&self, x: f64) -> BinLocation {
        if x < self.x_min {
            return BinLocation::Underflow;
        }
        if x >= self.x_max || x.is_nan() {
            return BinLocation::Overflow;
        }
        let idx = ((x - self.x_min) / self.bin_width()) as usize;
        // Guard against rounding just below x_max.
        BinLocation::Bin(idx.min(self.n_bins - 1))
    }

    /// Lower edge of bin `i`.
    pub fn bin_low_edge(&self, i: usize) -> f64 {
        self.x_min + i as f64 * self.bin_width()
    }

    /// Centre of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.x_min + (i as f64 + 0.5) * self.bin_width()
    }

    /// All `n_bins + 1` edges.
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = (0..self.n_bins).map(|i| self.bin_low_edge(i)).collect();
        edges.push(self.x_max);
        edges
    }
}

/// How per-bin errors are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BinErrorOption {
    /// Symmetric `sqrt(sumw2)`.
    #[default]
    Normal,
    /// Asymmetric Garwood interval for Poisson counts.
    Poisson,
}

impl BinErrorOption {
    /// Stable integer code used on disk.
    pub fn code(self) -> i32 {
        match self {
            BinErrorOption::Normal => 0,
            BinErrorOption::Poisson => 1,
        }
    }

    /// Inverse of [`BinErrorOption::code`].
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(BinErrorOption::Normal),
            1 => Ok(BinErrorOption::Poisson),
            other => Err(Error::Validation(format!("unknown bin error option code {other}"))),
        }
    }
}

/// Cosmetic attributes carried with a histogram (ROOT colour/marker indices).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    /// Line colour index.
    pub line_color: i16,
    /// Line width in pixels.
    pub line_width: i16,
    /// Marker colour index.
    pub marker_color: i16,
    /// Marker style index.
    pub marker_style: i16,
    /// Marker size scale.
    pub marker_size: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self { line_color: 602, line_width: 1, marker_color: 1, marker_style: 1, marker_size: 1.0 }
    }
}

/// A filled 1D histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Object name (key in the container).
    pub name: String,
    /// Human-readable title (legend label).
    pub title: String,
    /// Error convention.
    pub error_option: BinErrorOption,
    /// Draw attributes.
    pub style: DrawStyle,
    binning: Binning,
    bin_content: Vec<f64>,
    sumw2: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: f64,
}

impl Histogram {
    /// Create an empty histogram.
    pub fn new(name: impl Into<String>, title: impl Into<String>, binning: Binning) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            error_option: BinErrorOption::Normal,
            style: DrawStyle::default(),
            binning,
            bin_content: vec![0.0; binning.n_bins],
            sumw2: vec![0.0; binning.n_bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0.0,
        }
    }

    /// Rebuild a histogram from stored arrays.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        name: impl Into<String>,
        title: impl Into<String>,
        binning: Binning,
        bin_content: Vec<f64>,
        sumw2: Vec<f64>,
        underflow: f64,
        overflow: f64,
        entries: f64,
    ) -> Result<Self> {
        binning.validate()?;
        if bin_content.len() != binning.n_bins || sumw2.len() != binning.n_bins {
            return Err(Error::Validation(format!(
                "array lengths (content={}, sumw2={}) do not match n_bins={}",
                bin_content.len(),
                sumw2.len(),
                binning.n_bins
            )));
        }
        Ok(Self {
            name: name.into(),
            title: title.into(),
            error_option: BinErrorOption::Normal,
            style: DrawStyle::default(),
            binning,
            bin_content,
            sumw2,
            underflow,
            overflow,
            entries,
        })
    }

    /// Builder-style error option.
    pub fn with_error_option(mut self, opt: BinErrorOption) -> Self {
        self.error_option = opt;
        self
    }

    /// Builder-style draw attributes.
    pub fn with_style(mut self, style: DrawStyle) -> Self {
        self.style = style;
        self
    }

    /// Fill one unit-weight entry at `x`.
    pub fn fill(&mut self, x: f64) {
        self.entries += 1.0;
        match self.binning.locate(x) {
            BinLocation::Underflow => self.underflow += 1.0,
            BinLocation::Overflow => self.overflow += 1.0,
            BinLocation::Bin(i) => {
                self.bin_content[i] += 1.0;
                self.sumw2[i] += 1.0;
            }
        }
    }

    /// Bin-wise add `other` (binning must match exactly).
    pub fn add(&mut self, other: &Histogram) -> Result<()> {
        if self.binning != other.binning {
            return Err(Error::Validation(format!(
                "cannot add '{}' ({} bins over [{}, {}]) to '{}' ({} bins over [{}, {}])",
                other.name,
                other.binning.n_bins,
                other.binning.x_min,
                other.binning.x_max,
                self.name,
                self.binning.n_bins,
                self.binning.x_min,
                self.binning.x_max
            )));
        }
        for (a, b) in self.bin_content.iter_mut().zip(&other.bin_content) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        Ok(())
    }

    /// Overwrite bin `i` with an unweighted count (`sumw2 = content`).
    pub fn set_bin_count(&mut self, i: usize, count: f64) {
        self.bin_content[i] = count;
        self.sumw2[i] = count.max(0.0);
    }

    /// Override the entry counter.
    pub fn set_entries(&mut self, entries: f64) {
        self.entries = entries;
    }

    /// Binning shared with every sibling histogram.
    pub fn binning(&self) -> &Binning {
        &self.binning
    }

    /// Number of regular bins.
    pub fn n_bins(&self) -> usize {
        self.binning.n_bins
    }

    /// Contents of the regular bins.
    pub fn bin_content(&self) -> &[f64] {
        &self.bin_content
    }

    /// Sum of squared weights of the regular bins.
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Underflow content.
    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    /// Overflow content.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Number of fill calls (including under/overflow).
    pub fn entries(&self) -> f64 {
        self.entries
    }

    /// Sum over the regular bins.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Largest regular-bin content (0 for an empty histogram).
    pub fn maximum(&self) -> f64 {
        self.bin_content.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Symmetric error of bin `i`. For Poisson errors this is the mean of the two sides.
    pub fn bin_error(&self, i: usize) -> f64 {
        match self.error_option {
            BinErrorOption::Normal => self.sumw2[i].max(0.0).sqrt(),
            BinErrorOption::Poisson => 0.5 * (self.bin_error_low(i) + self.bin_error_up(i)),
        }
    }

    /// Lower error of bin `i`.
    pub fn bin_error_low(&self, i: usize) -> f64 {
        match self.error_option {
            BinErrorOption::Normal => self.sumw2[i].max(0.0).sqrt(),
            BinErrorOption::Poisson => poisson_interval(self.bin_content[i]).0,
        }
    }

    /// Upper error of bin `i`.
    pub fn bin_error_up(&self, i: usize) -> f64 {
        match self.error_option {
            BinErrorOption::Normal => self.sumw2[i].max(0.0).sqrt(),
            BinErrorOption::Poisson => poisson_interval(self.bin_content[i]).1,
        }
    }
}

/// Garwood central interval for an observed count `n`, returned as `(lower, upper)` errors.
///
/// `lower = n - χ²⁻¹(α/2; 2n)/2`, `upper = χ²⁻¹(1-α/2; 2(n+1))/2 - n`.
pub fn poisson_interval(n: f64) -> (f64, f64) {
    if !n.is_finite() || n < 0.0 {
        return (0.0, 0.0);
    }
    let alpha = 1.0 - ONE_SIGMA_COVERAGE;
    let lower = if n == 0.0 {
        0.0
    } else {
        match ChiSquared::new(2.0 * n) {
            Ok(chi2) => n - 0.5 * chi2.inverse_cdf(alpha / 2.0),
            Err(_) => n.sqrt(),
        }
    };
    let upper = match ChiSquared::new(2.0 * (n + 1.0)) {
        Ok(chi2) => 0.5 * chi2.inverse_cdf(1.0 - alpha / 2.0) - n,
        Err(_) => n.sqrt(),
    };
    (lower, upper)
}
