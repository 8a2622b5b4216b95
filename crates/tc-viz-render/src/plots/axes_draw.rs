use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::PlotConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Tick length as a fraction of the perpendicular plot extent.
const TICK_FRACTION: f64 = 0.03;

/// Draw the frame with inward ticks, tick labels, and axis titles aligned to the far ends.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, config: &PlotConfig) {
    let frame_color = Color::rgb(0, 0, 0);
    let frame_style = LineStyle::solid(frame_color, 1.0);
    let tick_style_line = LineStyle::solid(frame_color, 1.0);
    let minor_tick_style = LineStyle::solid(frame_color, 0.8);

    let label_px = config.label_size * canvas.height;
    let title_px = config.title_size * canvas.height;
    let x_tl = TICK_FRACTION * area.height;
    let y_tl = TICK_FRACTION * area.width;

    canvas.line(area.left, area.top, area.right(), area.top, &frame_style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &frame_style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &frame_style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &frame_style);

    let tick_label_style = TextStyle {
        size: label_px,
        color: frame_color,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
    };

    // --- X axis ticks ---
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() - x_tl, &tick_style_line);
        canvas.line(px, area.top, px, area.top + x_tl, &tick_style_line);
        if let Some(label) = x_axis.tick_labels.get(i) {
            canvas.text(px, area.bottom() + 0.2 * label_px, label, &tick_label_style);
        }
    }
    for &val in &x_axis.minor_ticks {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() - 0.5 * x_tl, &minor_tick_style);
    }

    // --- Y axis ticks ---
    let y_tick_label_style = TextStyle {
        size: label_px,
        color: frame_color,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
    };

    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left + y_tl, py, &tick_style_line);
        canvas.line(area.right(), py, area.right() - y_tl, py, &tick_style_line);
        if let Some(label) = y_axis.tick_labels.get(i) {
            canvas.text(area.left - 0.3 * label_px, py, label, &y_tick_label_style);
        }
    }
    for &val in &y_axis.minor_ticks {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left + 0.5 * y_tl, py, &minor_tick_style);
    }

    // --- Axis titles ---
    let title_style =
        TextStyle { size: title_px, color: frame_color, anchor: TextAnchor::End, baseline: TextBaseline::Hanging };

    if !x_axis.label.is_empty() {
        let y = area.bottom() + 0.2 * label_px + 1.1 * label_px;
        canvas.text(area.right(), y, &x_axis.label, &title_style);
    }

    if !y_axis.label.is_empty() {
        let widest = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_tick_label_style).width)
            .fold(0.0_f64, f64::max);
        let x = (area.left - 0.3 * label_px - widest - 1.1 * title_px).max(0.0);
        let title_style = TextStyle { baseline: TextBaseline::Hanging, ..title_style };
        canvas.text_rotated(x, area.top, &y_axis.label, &title_style, -90.0);
    }
}
