use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    /// Colour for a ROOT colour index as stored in histogram draw attributes.
    ///
    /// Indices 0-9 follow the classic ROOT table; anything else falls back to the
    /// default histogram blue (602).
    pub fn from_root_index(index: i16) -> Self {
        match index {
            0 => Color::rgb(255, 255, 255),
            1 => Color::rgb(0, 0, 0),
            2 => Color::rgb(255, 0, 0),
            3 => Color::rgb(0, 255, 0),
            4 => Color::rgb(0, 0, 255),
            5 => Color::rgb(255, 255, 0),
            6 => Color::rgb(255, 0, 255),
            7 => Color::rgb(0, 255, 255),
            8 => Color::rgb(89, 212, 84),
            9 => Color::rgb(89, 84, 217),
            _ => Color::rgb(0, 0, 153),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_fill() {
        assert_eq!(Color::rgb(29, 78, 216).to_svg_fill(), "#1d4ed8");
        let translucent = Color { a: 0.5, ..Color::rgb(29, 78, 216) };
        assert_eq!(translucent.to_svg_fill(), "rgba(29,78,216,0.500)");
    }

    #[test]
    fn root_indices() {
        assert_eq!(Color::from_root_index(1), Color::rgb(0, 0, 0));
        assert_eq!(Color::from_root_index(2), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_root_index(4), Color::rgb(0, 0, 255));
        assert_eq!(Color::from_root_index(602), Color::from_root_index(-3));
    }
}
