//! Dark and light palettes and color utilities.

use cryptoboard_core::market::PriceDirection;
use cryptoboard_core::ThemeMode;
use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
    pub up: Color,
    pub down: Color,
    pub error: Color,
    pub loading: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(14, 18, 24),
            bg_highlight: Color::Rgb(30, 36, 46),
            primary: Color::Rgb(76, 175, 80),
            text: Color::Rgb(230, 232, 235),
            text_dim: Color::Rgb(130, 136, 145),
            border: Color::Rgb(54, 60, 70),
            border_focus: Color::Rgb(76, 175, 80),
            up: Color::Rgb(0, 200, 83),
            down: Color::Rgb(255, 82, 82),
            error: Color::Rgb(255, 82, 82),
            loading: Color::Rgb(255, 193, 7),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(255, 255, 255),
            bg_highlight: Color::Rgb(232, 236, 241),
            primary: Color::Rgb(42, 46, 57),
            text: Color::Rgb(20, 22, 28),
            text_dim: Color::Rgb(110, 116, 126),
            border: Color::Rgb(200, 204, 210),
            border_focus: Color::Rgb(42, 46, 57),
            up: Color::Rgb(0, 150, 60),
            down: Color::Rgb(211, 47, 47),
            error: Color::Rgb(211, 47, 47),
            loading: Color::Rgb(230, 140, 0),
        }
    }
}

pub fn direction_color(direction: PriceDirection, palette: &Palette) -> Color {
    match direction {
        PriceDirection::Up => palette.up,
        PriceDirection::Down => palette.down,
    }
}

/// Color for a signed change; a missing change is neutral.
pub fn change_color(change: Option<f64>, palette: &Palette) -> Color {
    change
        .map(|c| direction_color(PriceDirection::from_change(c), palette))
        .unwrap_or(palette.text_dim)
}

/// Parse `rgba(r, g, b, a)` into an opaque terminal color. Alpha is ignored.
pub fn css_rgba(value: &str) -> Option<Color> {
    let inner = value.trim().strip_prefix("rgba(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r = parts.next()?.parse().ok()?;
    let g = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba("rgba(14, 18, 24, 1)"), Some(Color::Rgb(14, 18, 24)));
        assert_eq!(css_rgba("#ffffff"), None);
        assert_eq!(css_rgba("rgba(300, 0, 0, 1)"), None);
    }

    #[test]
    fn test_change_color() {
        let palette = Palette::dark();
        assert_eq!(change_color(Some(0.0), &palette), palette.up);
        assert_eq!(change_color(Some(-0.1), &palette), palette.down);
        assert_eq!(change_color(None, &palette), palette.text_dim);
    }
}
