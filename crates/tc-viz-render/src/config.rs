use serde::{Deserialize, Serialize};

/// Plot configuration. Sizes given as fractions are relative to the canvas height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Canvas name stored in the container.
    pub name: String,
    /// Canvas title stored in the container.
    pub title: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Left, right, bottom, top margins as fractions of the canvas.
    pub margins: Margins,
    /// Legend box `[x1, y1, x2, y2]` in canvas fractions (y measured from the bottom).
    pub legend: [f64; 4],
    /// Legend text size.
    pub legend_text_size: f64,
    /// Tick label size.
    pub label_size: f64,
    /// Axis title size.
    pub title_size: f64,
    pub x_title: String,
    pub y_title: String,
    /// Y range is `[0, headroom * max]`.
    pub headroom: f64,
    /// Raster resolution; 72 renders one PNG pixel per canvas pixel.
    pub dpi: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            name: "canvas".into(),
            title: "canvas".into(),
            width: 800,
            height: 600,
            margins: Margins::default(),
            legend: [0.60, 0.94, 0.88, 0.70],
            legend_text_size: 0.056,
            label_size: 0.052,
            title_size: 0.055,
            x_title: "x".into(),
            y_title: "Events / bin".into(),
            headroom: 1.1,
            dpi: 72,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self { left: 0.11, right: 0.03, bottom: 0.11, top: 0.02 }
    }
}

impl PlotConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(crate::RenderError::Config(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let m = &self.margins;
        let ok = |v: f64| (0.0..1.0).contains(&v);
        if !(ok(m.left) && ok(m.right) && ok(m.bottom) && ok(m.top))
            || m.left + m.right >= 1.0
            || m.bottom + m.top >= 1.0
        {
            return Err(crate::RenderError::Config(format!("margins leave no plot area: {m:?}")));
        }
        if !(self.headroom.is_finite() && self.headroom > 0.0) {
            return Err(crate::RenderError::Config(format!("headroom must be > 0, got {}", self.headroom)));
        }
        if self.dpi == 0 {
            return Err(crate::RenderError::Config("dpi must be positive".into()));
        }
        Ok(())
    }
}
