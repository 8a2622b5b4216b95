use crate::primitives::TextStyle;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Average advance of a sans-serif glyph, in units of the font size.
const AVG_ADVANCE: f64 = 0.55;

/// Estimate text extent without loading a font.
///
/// Layout only needs to reserve space for short labels, so a per-character
/// average advance is close enough; the rasterizer picks the real face.
pub fn measure_text(text: &str, style: &TextStyle) -> TextMetrics {
    let n = text.chars().count() as f64;
    TextMetrics { width: n * AVG_ADVANCE * style.size, height: 1.2 * style.size, ascent: 0.8 * style.size }
}
