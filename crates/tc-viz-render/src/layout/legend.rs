use crate::canvas::Canvas;
use crate::color::Color;
use crate::primitives::*;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    /// Line swatch with its width in pixels.
    Line(f64),
    /// Marker with vertical and horizontal error bars.
    MarkerWithError(MarkerStyle),
}

/// Legend placement in canvas fractions, y measured upwards from the bottom edge.
#[derive(Debug, Clone, Copy)]
pub struct LegendBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LegendBox {
    pub fn from_array(b: [f64; 4]) -> Self {
        Self { x1: b[0], y1: b[1], x2: b[2], y2: b[3] }
    }

    /// Pixel rectangle `(left, top, width, height)` on the given canvas.
    pub fn to_pixels(&self, canvas: &Canvas) -> (f64, f64, f64, f64) {
        let left = self.x1.min(self.x2) * canvas.width;
        let right = self.x1.max(self.x2) * canvas.width;
        let top = (1.0 - self.y1.max(self.y2)) * canvas.height;
        let bottom = (1.0 - self.y1.min(self.y2)) * canvas.height;
        (left, top, right - left, bottom - top)
    }
}

/// Draw a legend without fill or frame; rows share the box height evenly.
pub fn draw_legend(canvas: &mut Canvas, pos: &LegendBox, entries: &[LegendEntry], font_size: f64) {
    if entries.is_empty() {
        return;
    }

    let (lx, ly, lw, lh) = pos.to_pixels(canvas);
    let row_height = lh / entries.len() as f64;
    let swatch_w = (lw * 0.25).min(4.0 * font_size);
    let gap = 0.3 * font_size;

    let text_style = TextStyle { size: font_size, baseline: TextBaseline::Central, ..Default::default() };

    for (i, entry) in entries.iter().enumerate() {
        let ey = ly + (i as f64 + 0.5) * row_height;
        let sx = lx + gap;
        let cx = sx + swatch_w / 2.0;

        match entry.kind {
            LegendKind::Line(width) => {
                canvas.line(sx, ey, sx + swatch_w, ey, &LineStyle::solid(entry.color, width));
            }
            LegendKind::MarkerWithError(ref marker) => {
                let ls = LineStyle::solid(entry.color, 1.0);
                let half_h = 0.35 * row_height;
                canvas.line(cx, ey - half_h, cx, ey + half_h, &ls);
                canvas.line(sx, ey, sx + swatch_w, ey, &ls);
                canvas.marker(cx, ey, marker);
            }
        }

        canvas.text(sx + swatch_w + gap, ey, &entry.label, &text_style);
    }
}
