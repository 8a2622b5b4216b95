//! Analytic densities truncated to the histogram axis.
//!
//! Both shapes are sampled by inverse CDF restricted to `[lo, hi)`, so every draw
//! lands inside the axis and a histogram filled with `n` draws has exactly `n`
//! in-range entries.

use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};
use tc_core::{Error, Result};

/// A 1D density that can be sampled on a finite interval.
pub trait Shape {
    /// Draw one value in `[lo, hi)`.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;
}

/// Gaussian restricted to `[lo, hi)`.
///
/// Sampling works on the standardized variable in whichever tail keeps the
/// CDF window away from 1.0, where doubles run out of resolution.
#[derive(Debug, Clone)]
pub struct TruncatedGaussian {
    standard: Normal,
    mean: f64,
    width: f64,
    lo: f64,
    hi: f64,
    /// Range lies entirely above the mean; draws are taken as `-z`.
    mirrored: bool,
    p_lo: f64,
    p_hi: f64,
}

/// Smallest in-range probability that can still be inverted reliably.
const MIN_MASS: f64 = 1e-300;

/// Rejections tolerated before a draw is clamped into the range.
const MAX_REJECTIONS: usize = 64;

impl TruncatedGaussian {
    /// Build the truncated density; fails if it carries no usable probability mass on the range.
    pub fn new(mean: f64, width: f64, lo: f64, hi: f64) -> Result<Self> {
        if !(mean.is_finite() && width.is_finite() && width > 0.0) {
            return Err(Error::Config(format!(
                "gaussian(mean={mean}, width={width}): width must be finite and > 0"
            )));
        }
        let standard = Normal::new(0.0, 1.0)
            .map_err(|e| Error::Config(format!("gaussian(mean={mean}, width={width}): {e}")))?;
        let a = (lo - mean) / width;
        let b = (hi - mean) / width;
        let mirrored = a > 0.0;
        let (p_lo, p_hi) = if mirrored {
            (standard.cdf(-b), standard.cdf(-a))
        } else {
            (standard.cdf(a), standard.cdf(b))
        };
        let mass = p_hi - p_lo;
        if mass.is_nan() || mass < MIN_MASS {
            return Err(Error::Config(format!(
                "gaussian(mean={mean}, width={width}) has no usable probability mass in [{lo}, {hi}]"
            )));
        }
        Ok(Self { standard, mean, width, lo, hi, mirrored, p_lo, p_hi })
    }
}

impl Shape for TruncatedGaussian {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut x = self.lo;
        for _ in 0..MAX_REJECTIONS {
            let u = rng.random_range(self.p_lo..self.p_hi);
            let z = self.standard.inverse_cdf(u);
            x = if self.mirrored { self.mean - z * self.width } else { self.mean + z * self.width };
            if x >= self.lo && x < self.hi {
                return x;
            }
        }
        // Only reachable through rounding at the range edges.
        if x.is_nan() || x < self.lo { self.lo } else { self.hi.next_down() }
    }
}

/// Density proportional to `exp(slope * x)` on `[lo, hi)`.
#[derive(Debug, Clone)]
pub struct TruncatedExponential {
    slope: f64,
    lo: f64,
    hi: f64,
    /// `exp(slope * (hi - lo)) - 1`, precomputed.
    span: f64,
}

impl TruncatedExponential {
    /// Build the truncated density; `slope == 0` degenerates to a flat shape.
    pub fn new(slope: f64, lo: f64, hi: f64) -> Result<Self> {
        if !slope.is_finite() {
            return Err(Error::Config(format!("exponential slope must be finite, got {slope}")));
        }
        let span = (slope * (hi - lo)).exp_m1();
        if !span.is_finite() {
            return Err(Error::Config(format!(
                "exponential slope {slope} overflows over [{lo}, {hi}]"
            )));
        }
        Ok(Self { slope, lo, hi, span })
    }
}

impl Shape for TruncatedExponential {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let u: f64 = rng.random();
            let x = if self.slope == 0.0 {
                self.lo + u * (self.hi - self.lo)
            } else {
                self.lo + (u * self.span).ln_1p() / self.slope
            };
            if x >= self.lo && x < self.hi {
                return x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use approx::assert_abs_diff_eq;

    #[test]
    fn gaussian_draws_stay_in_range() {
        let g = TruncatedGaussian::new(70.0, 10.0, 0.0, 100.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let xs: Vec<f64> = (0..5000).map(|_| g.sample(&mut rng)).collect();
        assert!(xs.iter().all(|&x| (0.0..100.0).contains(&x)));
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        // Truncation at 100 pulls the mean slightly below 70.
        assert_abs_diff_eq!(mean, 69.96, epsilon = 0.5);
    }

    #[test]
    fn gaussian_without_mass_is_rejected() {
        assert!(matches!(
            TruncatedGaussian::new(1000.0, 1.0, 0.0, 100.0),
            Err(Error::Config(_))
        ));
        assert!(matches!(TruncatedGaussian::new(50.0, -1.0, 0.0, 100.0), Err(Error::Config(_))));
    }

    #[test]
    fn gaussian_far_below_range_samples_its_tail() {
        // Peak 8.25 widths below the axis: only the far upper tail is in range.
        let g = TruncatedGaussian::new(-8.25, 1.0, 0.0, 100.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let xs: Vec<f64> = (0..2000).map(|_| g.sample(&mut rng)).collect();
        assert!(xs.iter().all(|&x| (0.0..100.0).contains(&x)));
        // Tail above a is roughly exponential with mean 1/a.
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert_abs_diff_eq!(mean, 1.0 / 8.25, epsilon = 0.03);
    }

    #[test]
    fn gaussian_far_above_range_samples_its_tail() {
        let g = TruncatedGaussian::new(108.25, 1.0, 0.0, 100.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let xs: Vec<f64> = (0..2000).map(|_| g.sample(&mut rng)).collect();
        assert!(xs.iter().all(|&x| (0.0..100.0).contains(&x)));
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert_abs_diff_eq!(mean, 100.0 - 1.0 / 8.25, epsilon = 0.03);
    }

    #[test]
    fn gaussian_with_underflowing_mass_is_rejected() {
        assert!(matches!(TruncatedGaussian::new(-40.0, 1.0, 0.0, 100.0), Err(Error::Config(_))));
    }

    #[test]
    fn exponential_matches_truncated_mean() {
        let slope = -1.0 / 25.0;
        let e = TruncatedExponential::new(slope, 0.0, 100.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let n = 20_000;
        let mean = (0..n).map(|_| e.sample(&mut rng)).sum::<f64>() / n as f64;
        // E[x] for exp(-x/tau) truncated to [0, L]: tau - L / (exp(L/tau) - 1)
        let tau = 25.0_f64;
        let expected = tau - 100.0 / ((100.0 / tau).exp() - 1.0);
        assert_abs_diff_eq!(mean, expected, epsilon = 0.5);
    }

    #[test]
    fn flat_exponential_is_uniform() {
        let e = TruncatedExponential::new(0.0, 10.0, 20.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mean = (0..10_000).map(|_| e.sample(&mut rng)).sum::<f64>() / 10_000.0;
        assert_abs_diff_eq!(mean, 15.0, epsilon = 0.1);
    }
}
