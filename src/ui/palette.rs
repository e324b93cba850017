#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::io::IsTerminal;

use ratatui::style::Color;

use crate::{cli::ColorArg, layout::Rgb};

/// What the terminal can show. `Monochrome` means no escape codes at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
    Monochrome,
}

impl ColorCapability {
    #[must_use]
    pub fn is_colored(self) -> bool {
        self != Self::Monochrome
    }
}

pub fn detect_color_capability(mode: ColorArg) -> ColorCapability {
    detect_color_capability_from(
        mode,
        std::env::var("TERM").ok().as_deref(),
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("NO_COLOR").ok().as_deref(),
    )
}

/// Capability for printing to stdout: `auto` also turns color off when stdout
/// is not a terminal.
pub fn stdout_color_capability(mode: ColorArg) -> ColorCapability {
    if mode == ColorArg::Auto && !std::io::stdout().is_terminal() {
        return ColorCapability::Monochrome;
    }
    detect_color_capability(mode)
}

pub(crate) fn detect_color_capability_from(
    mode: ColorArg,
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: Option<&str>,
) -> ColorCapability {
    if should_disable_color(mode, term, no_color) {
        return ColorCapability::Monochrome;
    }
    if supports_truecolor(colorterm, term) {
        return ColorCapability::TrueColor;
    }
    if supports_256_color(term) {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

fn should_disable_color(mode: ColorArg, term: Option<&str>, no_color: Option<&str>) -> bool {
    match mode {
        ColorArg::Never => true,
        ColorArg::Always => false,
        ColorArg::Auto => {
            no_color.is_some_and(|value| !value.is_empty())
                || term.is_some_and(|value| value.eq_ignore_ascii_case("dumb"))
        }
    }
}

fn supports_truecolor(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let colorterm = colorterm.unwrap_or_default().to_lowercase();
    let term = term.unwrap_or_default().to_lowercase();
    truecolor_hint(&colorterm) || truecolor_hint(&term)
}

fn truecolor_hint(value: &str) -> bool {
    value.contains("truecolor")
        || value.contains("24bit")
        || value.contains("-direct")
        || value.ends_with("direct")
}

fn supports_256_color(term: Option<&str>) -> bool {
    term.unwrap_or_default().to_lowercase().contains("256color")
}

/// Maps a canvas color onto what the terminal can display.
#[must_use]
pub fn quantize(color: Rgb, capability: ColorCapability) -> Color {
    let Rgb { r, g, b } = color;
    match capability {
        ColorCapability::TrueColor => Color::Rgb(r, g, b),
        ColorCapability::Xterm256 => {
            let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b))
        }
        ColorCapability::Basic16 => basic16_from_rgb(r, g, b),
        ColorCapability::Monochrome => Color::Reset,
    }
}

fn basic16_from_rgb(r: u8, g: u8, b: u8) -> Color {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;

    let max = rf.max(gf.max(bf));
    let min = rf.min(gf.min(bf));
    let delta = max - min;
    let light = (max + min) / 2.0;

    if delta < 0.08 {
        return match light {
            l if l < 0.20 => Color::Black,
            l if l < 0.40 => Color::DarkGray,
            l if l < 0.72 => Color::Gray,
            _ => Color::White,
        };
    }

    let hue = if (max - rf).abs() < f32::EPSILON {
        60.0 * ((gf - bf) / delta).rem_euclid(6.0)
    } else if (max - gf).abs() < f32::EPSILON {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };

    let bright = light >= 0.55;
    let (dim, lit) = match hue {
        h if !(30.0..330.0).contains(&h) => (Color::Red, Color::LightRed),
        h if h < 90.0 => (Color::Yellow, Color::LightYellow),
        h if h < 150.0 => (Color::Green, Color::LightGreen),
        h if h < 210.0 => (Color::Cyan, Color::LightCyan),
        h if h < 270.0 => (Color::Blue, Color::LightBlue),
        _ => (Color::Magenta, Color::LightMagenta),
    };
    if bright { lit } else { dim }
}

/// Same color in crossterm's vocabulary, for printing outside ratatui.
#[must_use]
pub fn to_crossterm(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match color {
        Color::Rgb(r, g, b) => C::Rgb { r, g, b },
        Color::Indexed(i) => C::AnsiValue(i),
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::Gray => C::Grey,
        Color::DarkGray => C::DarkGrey,
        Color::LightRed => C::Red,
        Color::LightGreen => C::Green,
        Color::LightYellow => C::Yellow,
        Color::LightBlue => C::Blue,
        Color::LightMagenta => C::Magenta,
        Color::LightCyan => C::Cyan,
        Color::White => C::White,
        _ => C::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_disables_color() {
        assert_eq!(
            detect_color_capability_from(ColorArg::Never, Some("xterm-256color"), Some("truecolor"), None),
            ColorCapability::Monochrome
        );
    }

    #[test]
    fn no_color_only_applies_to_auto() {
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("xterm"), None, Some("1")),
            ColorCapability::Monochrome
        );
        assert_eq!(
            detect_color_capability_from(ColorArg::Always, Some("xterm"), None, Some("1")),
            ColorCapability::Basic16
        );
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("xterm"), None, Some("")),
            ColorCapability::Basic16
        );
    }

    #[test]
    fn dumb_terminal_is_monochrome() {
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("dumb"), None, None),
            ColorCapability::Monochrome
        );
    }

    #[test]
    fn detects_truecolor_and_256() {
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("xterm"), Some("24bit"), None),
            ColorCapability::TrueColor
        );
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("xterm-direct"), None, None),
            ColorCapability::TrueColor
        );
        assert_eq!(
            detect_color_capability_from(ColorArg::Auto, Some("screen-256color"), None, None),
            ColorCapability::Xterm256
        );
    }

    #[test]
    fn quantize_to_cube_and_basic16() {
        assert_eq!(
            quantize(Rgb::new(255, 0, 0), ColorCapability::Xterm256),
            Color::Indexed(196)
        );
        assert_eq!(quantize(Rgb::WHITE, ColorCapability::Basic16), Color::White);
        assert_eq!(quantize(Rgb::BLACK, ColorCapability::Basic16), Color::Black);
        assert_eq!(
            quantize(Rgb::new(20, 40, 200), ColorCapability::Basic16),
            Color::Blue
        );
        assert_eq!(
            quantize(Rgb::new(1, 2, 3), ColorCapability::TrueColor),
            Color::Rgb(1, 2, 3)
        );
    }

    #[test]
    fn crossterm_mapping_keeps_rgb() {
        assert_eq!(
            to_crossterm(Color::Rgb(1, 2, 3)),
            crossterm::style::Color::Rgb { r: 1, g: 2, b: 3 }
        );
        assert_eq!(
            to_crossterm(Color::Indexed(42)),
            crossterm::style::Color::AnsiValue(42)
        );
    }
}
