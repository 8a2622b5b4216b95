use crate::canvas::Canvas;
use crate::config::Margins;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Plot area left over by fractional pad margins.
    pub fn from_margins(canvas: &Canvas, m: &Margins) -> Self {
        let left = m.left * canvas.width;
        let top = m.top * canvas.height;
        let width = canvas.width * (1.0 - m.left - m.right);
        let height = canvas.height * (1.0 - m.top - m.bottom);
        Self { left, top, width: width.max(1.0), height: height.max(1.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_margins_on_800x600() {
        let c = Canvas::new(800.0, 600.0).unwrap();
        let a = PlotArea::from_margins(&c, &Margins::default());
        assert!((a.left - 88.0).abs() < 1e-9);
        assert!((a.top - 12.0).abs() < 1e-9);
        assert!((a.right() - 776.0).abs() < 1e-9);
        assert!((a.bottom() - 534.0).abs() < 1e-9);
    }
}
