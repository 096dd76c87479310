//! Utility functions for color conversion and label layout.

use cssparser::{hsl_to_rgb, hwb_to_rgb, Color, Parser, ParserInput, RGBA};

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
///
/// # Example
///
/// ```rust
/// use element_themes::util::rgb_to_ansi256;
///
/// // Pure red maps to ANSI 196
/// assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
///
/// // Pure green maps to ANSI 46
/// assert_eq!(rgb_to_ansi256((0, 255, 0)), 46);
/// ```
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

/// Parses a CSS color value into an RGB triplet.
///
/// Accepts what `cssparser` understands as an sRGB color: hex notations,
/// `rgb()`/`rgba()` (numbers or percentages), `hsl()`/`hsla()`, `hwb()` and
/// named colors. Alpha is dropped, and missing (`none`) components read as
/// zero. `currentcolor`, other color spaces and anything that is not a single
/// color return `None`.
///
/// ```rust
/// use element_themes::util::parse_css_color;
///
/// assert_eq!(parse_css_color("#10384f"), Some((0x10, 0x38, 0x4f)));
/// assert_eq!(parse_css_color("#fff"), Some((255, 255, 255)));
/// assert_eq!(parse_css_color("rgb(0, 188, 255)"), Some((0, 188, 255)));
/// assert_eq!(parse_css_color("navy"), Some((0, 0, 128)));
/// assert_eq!(parse_css_color("var(--primary-400)"), None);
/// ```
pub fn parse_css_color(value: &str) -> Option<(u8, u8, u8)> {
    let mut input = ParserInput::new(value.trim());
    let mut parser = Parser::new(&mut input);
    let color = parser.parse_entirely(|p| Color::parse(p)).ok()?;

    let rgba = match color {
        Color::Rgba(rgba) => rgba,
        Color::Hsl(hsl) => {
            let (r, g, b) = hsl_to_rgb(
                hsl.hue.unwrap_or(0.0) / 360.0,
                hsl.saturation.unwrap_or(0.0),
                hsl.lightness.unwrap_or(0.0),
            );
            RGBA::from_floats(Some(r), Some(g), Some(b), hsl.alpha)
        }
        Color::Hwb(hwb) => {
            let (r, g, b) = hwb_to_rgb(
                hwb.hue.unwrap_or(0.0) / 360.0,
                hwb.whiteness.unwrap_or(0.0),
                hwb.blackness.unwrap_or(0.0),
            );
            RGBA::from_floats(Some(r), Some(g), Some(b), hwb.alpha)
        }
        _ => return None,
    };
    Some((
        rgba.red.unwrap_or(0),
        rgba.green.unwrap_or(0),
        rgba.blue.unwrap_or(0),
    ))
}

/// Pads `s` with spaces to `width` display columns.
///
/// Uses Unicode width calculations, so wide characters count double. Strings
/// already at or beyond `width` are returned unchanged.
pub fn pad_to_width(s: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    let current = s.width();
    if current >= width {
        return s.to_string();
    }
    let mut padded = String::with_capacity(s.len() + width - current);
    padded.push_str(s);
    padded.extend(std::iter::repeat(' ').take(width - current));
    padded
}
