//! Poisson-fluctuated pseudo-data.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use tc_core::{BinErrorOption, DrawStyle, Error, Histogram, Result};

/// Name of the observed-data histogram.
pub const OBSERVED_NAME: &str = "data_obs";

/// Black markers with Poisson error bars.
pub fn observed_style() -> DrawStyle {
    DrawStyle { line_color: 1, line_width: 2, marker_color: 1, marker_style: 8, marker_size: 0.6 }
}

/// One Poisson draw with mean `lambda`; degenerate means yield zero.
fn poisson_draw<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> f64 {
    if !(lambda.is_finite() && lambda > 0.0) {
        return 0.0;
    }
    match Poisson::new(lambda) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.0,
    }
}

/// Sum `processes` and replace every regular bin by a Poisson draw around the sum.
///
/// All inputs must share one binning. Flows are not fluctuated.
pub fn synthesize_observed<R: Rng + ?Sized>(
    processes: &[Histogram],
    rng: &mut R,
) -> Result<Histogram> {
    let Some(first) = processes.first() else {
        return Err(Error::Validation("observed data needs at least one process".to_string()));
    };
    let mut sum = Histogram::new(OBSERVED_NAME, "Observed", *first.binning());
    for p in processes {
        sum.add(p)?;
    }

    let mut observed = Histogram::new(OBSERVED_NAME, "Observed", *first.binning())
        .with_error_option(BinErrorOption::Poisson)
        .with_style(observed_style());
    for (i, &expected) in sum.bin_content().iter().enumerate() {
        observed.set_bin_count(i, poisson_draw(expected, rng));
    }
    observed.set_entries(observed.integral());

    log::debug!(
        "observed data: expected {:.1}, drew {:.0} over {} bins",
        sum.integral(),
        observed.integral(),
        observed.n_bins()
    );
    Ok(observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tc_core::Binning;

    fn flat(name: &str, binning: Binning, per_bin: f64) -> Histogram {
        let mut h = Histogram::new(name, name, binning);
        for i in 0..binning.n_bins {
            h.set_bin_count(i, per_bin);
        }
        h
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(synthesize_observed(&[], &mut rng), Err(Error::Validation(_))));
    }

    #[test]
    fn mismatched_binning_is_rejected() {
        let a = flat("a", Binning::new(10, 0.0, 1.0).unwrap(), 1.0);
        let b = flat("b", Binning::new(20, 0.0, 1.0).unwrap(), 1.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(synthesize_observed(&[a, b], &mut rng), Err(Error::Validation(_))));
    }

    #[test]
    fn output_keeps_binning_and_style() {
        let b = Binning::new(50, 0.0, 100.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let obs = synthesize_observed(&[flat("a", b, 4.0), flat("b", b, 6.0)], &mut rng).unwrap();
        assert_eq!(obs.name, "data_obs");
        assert_eq!(obs.binning(), &b);
        assert_eq!(obs.error_option, BinErrorOption::Poisson);
        assert_eq!(obs.style.marker_style, 8);
        assert_eq!(obs.entries(), obs.integral());
        assert!(obs.bin_content().iter().all(|&c| c >= 0.0 && c.fract() == 0.0));
    }

    #[test]
    fn zero_expectation_stays_empty() {
        let b = Binning::new(5, 0.0, 5.0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let obs = synthesize_observed(&[flat("z", b, 0.0)], &mut rng).unwrap();
        assert_eq!(obs.integral(), 0.0);
    }

    #[test]
    fn same_seed_same_data() {
        let b = Binning::new(20, 0.0, 1.0).unwrap();
        let input = [flat("a", b, 12.5)];
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            synthesize_observed(&input, &mut rng).unwrap()
        };
        assert_eq!(draw(8), draw(8));
        assert_ne!(draw(8).bin_content(), draw(9).bin_content());
    }
}
