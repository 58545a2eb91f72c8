use serde::{Deserialize, Serialize};

use crate::render::Color;

const QUALITATIVE: [Color; 10] = [
    Color::rgb8(0x63, 0x6e, 0xfa),
    Color::rgb8(0xef, 0x55, 0x3b),
    Color::rgb8(0x00, 0xcc, 0x96),
    Color::rgb8(0xab, 0x63, 0xfa),
    Color::rgb8(0xff, 0xa1, 0x5a),
    Color::rgb8(0x19, 0xd3, 0xf3),
    Color::rgb8(0xff, 0x66, 0x92),
    Color::rgb8(0xb6, 0xe8, 0x80),
    Color::rgb8(0xff, 0x97, 0xff),
    Color::rgb8(0xfe, 0xcb, 0x52),
];

const SEQUENTIAL: [Color; 10] = [
    Color::rgb8(0x0d, 0x08, 0x87),
    Color::rgb8(0x46, 0x03, 0x9f),
    Color::rgb8(0x72, 0x01, 0xa8),
    Color::rgb8(0x9c, 0x17, 0x9e),
    Color::rgb8(0xbd, 0x37, 0x86),
    Color::rgb8(0xd8, 0x57, 0x6b),
    Color::rgb8(0xed, 0x79, 0x53),
    Color::rgb8(0xfb, 0x9f, 0x3a),
    Color::rgb8(0xfd, 0xca, 0x26),
    Color::rgb8(0xf0, 0xf9, 0x21),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

/// Colors and font sizes used by the scene builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub plot_background: Color,
    pub grid_color: Color,
    pub axis_line_color: Color,
    pub text_color: Color,
    pub tile_border_color: Color,
    pub title_font_size_px: f64,
    pub label_font_size_px: f64,
}

impl Theme {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Color::rgb8(17, 17, 17),
            plot_background: Color::rgb8(17, 17, 17),
            grid_color: Color::rgb8(0x28, 0x34, 0x42),
            axis_line_color: Color::rgb8(0x50, 0x67, 0x84),
            text_color: Color::rgb8(0xf2, 0xf5, 0xfa),
            tile_border_color: Color::rgb8(17, 17, 17),
            title_font_size_px: 17.0,
            label_font_size_px: 12.0,
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            background: Color::rgb(1.0, 1.0, 1.0),
            plot_background: Color::rgb8(0xe5, 0xec, 0xf6),
            grid_color: Color::rgb(1.0, 1.0, 1.0),
            axis_line_color: Color::rgb(1.0, 1.0, 1.0),
            text_color: Color::rgb8(0x2a, 0x3f, 0x5f),
            tile_border_color: Color::rgb(1.0, 1.0, 1.0),
            title_font_size_px: 17.0,
            label_font_size_px: 12.0,
        }
    }

    #[must_use]
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Discrete color for the `index`-th category, cycling through the palette.
    #[must_use]
    pub fn category_color(&self, index: usize) -> Color {
        QUALITATIVE[index % QUALITATIVE.len()]
    }

    /// Continuous color for `value` inside `range`, on the sequential scale.
    #[must_use]
    pub fn scale_color(&self, value: f64, range: (f64, f64)) -> Color {
        let (min, max) = range;
        let t = if max > min { (value - min) / (max - min) } else { 0.5 };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let position = t * (SEQUENTIAL.len() - 1) as f64;
        let lower = position.floor() as usize;
        let upper = (lower + 1).min(SEQUENTIAL.len() - 1);
        SEQUENTIAL[lower].lerp(SEQUENTIAL[upper], position - lower as f64)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn category_palette_cycles() {
        let theme = Theme::dark();
        assert_eq!(theme.category_color(0), theme.category_color(10));
        assert_ne!(theme.category_color(0), theme.category_color(1));
    }

    #[test]
    fn scale_color_hits_both_ends() {
        let theme = Theme::dark();
        assert_eq!(theme.scale_color(0.0, (0.0, 10.0)).to_hex(), "#0d0887");
        assert_eq!(theme.scale_color(10.0, (0.0, 10.0)).to_hex(), "#f0f921");
        assert_eq!(theme.scale_color(99.0, (0.0, 10.0)).to_hex(), "#f0f921");
    }
}
