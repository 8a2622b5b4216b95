//! Per-process histogram sampling.

use rand::Rng;
use tc_core::{Binning, DrawStyle, Histogram, Result, SignalComponent, event_count};

use crate::shapes::{Shape, TruncatedExponential, TruncatedGaussian};

/// Name of the single background process.
pub const BACKGROUND_NAME: &str = "bkg";

/// Line colour index for the `i`-th process (0-based): red, green, blue, ...
fn process_style(i: usize) -> DrawStyle {
    DrawStyle { line_color: i as i16 + 2, line_width: 2, ..DrawStyle::default() }
}

/// Fill a fresh histogram with `n` draws from `shape`.
pub fn fill_random<S: Shape, R: Rng + ?Sized>(
    name: &str,
    title: &str,
    binning: Binning,
    shape: &S,
    n: u64,
    rng: &mut R,
) -> Histogram {
    let mut hist = Histogram::new(name, title, binning);
    for _ in 0..n {
        hist.fill(shape.sample(rng));
    }
    hist
}

/// Generate `sig1..sigN` from Gaussian peaks.
///
/// Component `k` receives `round(fraction_k * n_signal)` draws, so fractions are
/// relative to the signal total, not the full event count.
pub fn sample_signals<R: Rng + ?Sized>(
    binning: Binning,
    n_signal: u64,
    components: &[SignalComponent],
    rng: &mut R,
) -> Result<Vec<Histogram>> {
    binning.validate()?;
    let mut hists = Vec::with_capacity(components.len());
    for (i, comp) in components.iter().enumerate() {
        let k = i + 1;
        let shape = TruncatedGaussian::new(comp.mean, comp.width, binning.x_min, binning.x_max)?;
        let n = event_count(comp.fraction, n_signal);
        log::debug!(
            "sampling sig{k}: {n} events, mean={}, width={}",
            comp.mean,
            comp.width
        );
        let hist = fill_random(&format!("sig{k}"), &format!("Signal {k}"), binning, &shape, n, rng)
            .with_style(process_style(i));
        hists.push(hist);
    }
    Ok(hists)
}

/// Generate the exponential background histogram `bkg`.
///
/// `style_index` positions the background in the colour sequence after the signals.
pub fn sample_background<R: Rng + ?Sized>(
    binning: Binning,
    n_background: u64,
    slope: f64,
    style_index: usize,
    rng: &mut R,
) -> Result<Vec<Histogram>> {
    binning.validate()?;
    let shape = TruncatedExponential::new(slope, binning.x_min, binning.x_max)?;
    log::debug!("sampling {BACKGROUND_NAME}: {n_background} events, slope={slope}");
    let hist = fill_random(BACKGROUND_NAME, "Background", binning, &shape, n_background, rng)
        .with_style(process_style(style_index));
    Ok(vec![hist])
}
