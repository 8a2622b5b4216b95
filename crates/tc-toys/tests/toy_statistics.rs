//! Statistical properties of the generated toy.

use rand::SeedableRng;
use rand::rngs::StdRng;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tc_core::{Binning, Histogram, ToyConfig};
use tc_toys::{generate, synthesize_observed};

#[test]
fn default_toy_has_reference_counts() {
    let cfg = ToyConfig::default();
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let toy = generate(&cfg, &mut rng).unwrap();

    let entries: Vec<f64> = toy.signals.iter().map(Histogram::entries).collect();
    assert_eq!(entries, vec![1000.0, 600.0, 400.0]);
    assert_eq!(toy.backgrounds.len(), 1);
    assert_eq!(toy.backgrounds[0].entries(), 3000.0);
    assert_eq!(toy.processes().count(), 4);
    assert_eq!(toy.all().count(), 5);

    let expected = Binning::new(50, 0.0, 100.0).unwrap();
    for h in toy.all() {
        assert_eq!(h.binning(), &expected, "{}", h.name);
    }
    // Poisson total around 5000 (sigma ~ 71).
    let total = toy.observed.integral();
    approx::assert_abs_diff_eq!(total, 5000.0, epsilon = 400.0);
}

#[test]
fn generation_is_reproducible() {
    let cfg = ToyConfig::default();
    let a = generate(&cfg, &mut StdRng::seed_from_u64(cfg.seed)).unwrap();
    let b = generate(&cfg, &mut StdRng::seed_from_u64(cfg.seed)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn observed_mean_converges_to_expectation() {
    let binning = Binning::new(8, 0.0, 8.0).unwrap();
    let mut sig = Histogram::new("sig", "sig", binning);
    let mut bkg = Histogram::new("bkg", "bkg", binning);
    for i in 0..binning.n_bins {
        sig.set_bin_count(i, 0.5 * i as f64);
        bkg.set_bin_count(i, 3.0);
    }
    let expectation: Vec<f64> = (0..binning.n_bins).map(|i| 0.5 * i as f64 + 3.0).collect();

    let trials = 10_000;
    let mut sums = vec![0.0; binning.n_bins];
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..trials {
        let obs = synthesize_observed(&[sig.clone(), bkg.clone()], &mut rng).unwrap();
        for (s, c) in sums.iter_mut().zip(obs.bin_content()) {
            *s += c;
        }
    }

    // Under the Poisson hypothesis each bin mean has variance lambda / trials.
    let chi2: f64 = sums
        .iter()
        .zip(&expectation)
        .map(|(s, lambda)| {
            let mean = s / trials as f64;
            (mean - lambda).powi(2) / (lambda / trials as f64)
        })
        .sum();
    let dist = ChiSquared::new(binning.n_bins as f64).unwrap();
    let p = 1.0 - dist.cdf(chi2);
    assert!(p > 1e-4, "chi2={chi2} p={p}");
}

#[test]
fn invalid_config_fails_before_sampling() {
    let mut cfg = ToyConfig::default();
    cfg.binning.x_max = cfg.binning.x_min;
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(generate(&cfg, &mut rng), Err(tc_core::Error::Config(_))));
}

#[test]
fn peak_far_below_axis_still_fills_every_event() {
    let mut cfg = ToyConfig::default();
    cfg.signals[0].mean = -8.25;
    cfg.signals[0].width = 1.0;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let toy = generate(&cfg, &mut rng).unwrap();
    let sig1 = &toy.signals[0];
    assert_eq!(sig1.entries(), 1000.0);
    assert_eq!(sig1.underflow(), 0.0);
    // Everything piles into the first bin.
    assert_eq!(sig1.bin_content()[0], 1000.0);
}

#[test]
fn peak_with_negligible_mass_in_range_is_rejected() {
    let mut cfg = ToyConfig::default();
    cfg.signals[1].mean = -40.0;
    cfg.signals[1].width = 1.0;
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    assert!(matches!(generate(&cfg, &mut rng), Err(tc_core::Error::Config(_))));
}
