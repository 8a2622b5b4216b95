use tc_core::Histogram;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::PlotConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::{self, LegendBox, LegendEntry, LegendKind};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::*;

/// Overlay process histograms as step lines and the observed histogram as
/// markers with asymmetric Poisson error bars.
pub fn render(observed: &Histogram, processes: &[Histogram], config: &PlotConfig) -> crate::Result<String> {
    config.validate()?;
    let binning = *observed.binning();
    if let Some(h) = processes.iter().find(|h| *h.binning() != binning) {
        return Err(crate::RenderError::Layout(format!(
            "histogram '{}' does not share the binning of '{}'",
            h.name, observed.name
        )));
    }

    let mut canvas = Canvas::new(config.width as f64, config.height as f64)?;
    let area = PlotArea::from_margins(&canvas, &config.margins);

    let y_peak = processes.iter().map(Histogram::maximum).fold(observed.maximum(), f64::max);
    let y_max = if y_peak > 0.0 { config.headroom * y_peak } else { 1.0 };

    let x_axis = Axis::linear(binning.x_min, binning.x_max, 6).with_label(&config.x_title);
    let y_axis = Axis::linear(0.0, y_max, 6).with_label(&config.y_title);

    let to_px = |x: f64| x_axis.data_to_pixel(x, area.left, area.right());
    let to_py = |y: f64| y_axis.data_to_pixel(y, area.bottom(), area.top);

    let edges = binning.edges();
    let mut entries = Vec::with_capacity(processes.len() + 1);

    canvas.push_clip(area.left, area.top, area.width, area.height);

    for h in processes {
        let color = Color::from_root_index(h.style.line_color);
        let width = f64::from(h.style.line_width.max(1));
        let mut points = Vec::with_capacity(2 * edges.len());
        points.push((to_px(binning.x_min), to_py(0.0)));
        for (i, &content) in h.bin_content().iter().enumerate() {
            let y = to_py(content);
            points.push((to_px(edges[i]), y));
            points.push((to_px(edges[i + 1]), y));
        }
        points.push((to_px(binning.x_max), to_py(0.0)));
        canvas.polyline(&points, &LineStyle::solid(color, width));
        entries.push(LegendEntry { label: h.title.clone(), color, kind: LegendKind::Line(width) });
    }

    let obs_color = Color::from_root_index(observed.style.marker_color);
    let marker =
        MarkerStyle::from_root(observed.style.marker_style, observed.style.marker_size, obs_color);
    let bar_style =
        LineStyle::solid(Color::from_root_index(observed.style.line_color), f64::from(observed.style.line_width.max(1)));
    for (i, &content) in observed.bin_content().iter().enumerate() {
        let cx = to_px(binning.bin_center(i));
        let cy = to_py(content);
        let lo = to_py(content - observed.bin_error_low(i));
        let hi = to_py(content + observed.bin_error_up(i));
        canvas.line(to_px(edges[i]), cy, to_px(edges[i + 1]), cy, &bar_style);
        canvas.error_bar(cx, lo, hi, 0.0, &bar_style);
        canvas.marker(cx, cy, &marker);
    }
    entries.push(LegendEntry { label: observed.title.clone(), color: obs_color, kind: LegendKind::MarkerWithError(marker) });

    canvas.pop_clip();

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);
    let legend_text_size = config.legend_text_size * canvas.height;
    legend::draw_legend(
        &mut canvas,
        &LegendBox::from_array(config.legend),
        &entries,
        legend_text_size,
    );

    log::debug!(
        "rendered {} process histograms + '{}' on {}x{} canvas (y max {:.3})",
        processes.len(),
        observed.name,
        config.width,
        config.height,
        y_max
    );
    Ok(canvas.finish_svg())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::{BinErrorOption, Binning, DrawStyle};

    fn hist(name: &str, title: &str, counts: &[f64], color: i16) -> Histogram {
        let mut h = Histogram::new(name, title, Binning::new(counts.len(), 0.0, 10.0).unwrap());
        for (i, &c) in counts.iter().enumerate() {
            h.set_bin_count(i, c);
        }
        h.with_style(DrawStyle { line_color: color, line_width: 2, ..Default::default() })
    }

    fn observed(counts: &[f64]) -> Histogram {
        hist("data_obs", "Observed", counts, 1)
            .with_error_option(BinErrorOption::Poisson)
            .with_style(DrawStyle { line_color: 1, line_width: 2, marker_color: 1, marker_style: 8, marker_size: 0.6 })
    }

    #[test]
    fn draws_one_step_line_per_process() {
        let procs = [hist("sig1", "Signal 1", &[1.0, 4.0], 2), hist("bkg", "Background", &[3.0, 2.0], 3)];
        let svg = render(&observed(&[4.0, 6.0]), &procs, &PlotConfig::default()).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(">Signal 1</text>"));
        assert!(svg.contains(">Background</text>"));
        assert!(svg.contains(">Observed</text>"));
        assert!(svg.contains(">Events / bin</text>"));
        // One marker per observed bin plus the legend marker.
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn y_range_has_headroom_over_the_tallest_histogram() {
        let procs = [hist("sig1", "Signal 1", &[10.0, 100.0], 2)];
        let svg = render(&observed(&[50.0, 40.0]), &procs, &PlotConfig::default()).unwrap();
        // 1.1 * 100 = 110 leaves the 100 tick visible.
        assert!(svg.contains(">100</text>"));
    }

    #[test]
    fn empty_inputs_still_render() {
        let svg = render(&observed(&[0.0, 0.0]), &[], &PlotConfig::default()).unwrap();
        assert!(svg.contains(">Observed</text>"));
    }

    #[test]
    fn mismatched_binning_is_rejected() {
        let procs = [hist("sig1", "Signal 1", &[1.0, 2.0, 3.0], 2)];
        let err = render(&observed(&[1.0, 2.0]), &procs, &PlotConfig::default()).unwrap_err();
        assert!(matches!(err, crate::RenderError::Layout(_)));
    }
}
