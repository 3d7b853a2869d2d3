//! Color parsing and formatting for paint colors
//!
//! Accepted input:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - CSS functional and named colors: `rgb(...)`, `hsl(...)`, `red`, `transparent`, ...

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into RGBA.
///
/// # Examples
///
/// ```
/// use mctex::color::parse_color;
/// use image::Rgba;
///
/// assert_eq!(parse_color("#F00").unwrap(), Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#00ff0080").unwrap(), Rgba([0, 255, 0, 128]));
/// assert_eq!(parse_color("blue").unwrap(), Rgba([0, 0, 255, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => parse_css_color(s),
    }
}

/// Format a color as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
///
/// ```
/// use mctex::color::format_hex;
/// use image::Rgba;
///
/// assert_eq!(format_hex(Rgba([160, 160, 164, 255])), "#A0A0A4");
/// assert_eq!(format_hex(Rgba([0, 0, 0, 0])), "#00000000");
/// ```
pub fn format_hex(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

fn parse_hex(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    let channels: Vec<u8> = match digits.len() {
        // Short forms double each digit: #F00 -> #FF0000
        3 | 4 => digits.iter().map(|d| d * 17).collect(),
        6 | 8 => digits.chunks(2).map(|pair| pair[0] * 16 + pair[1]).collect(),
        n => return Err(ColorError::InvalidLength(n)),
    };

    let alpha = channels.get(3).copied().unwrap_or(255);
    Ok(Rgba([channels[0], channels[1], channels[2], alpha]))
}

/// Parse functional and named CSS colors through lightningcss
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let to_u8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
                Ok(Rgba([to_u8(rgb.r), to_u8(rgb.g), to_u8(rgb.b), to_u8(rgb.alpha)]))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#fff"), Ok(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_color("#0008"), Ok(Rgba([0, 0, 0, 136])));
        assert_eq!(parse_color("#A0A0A4"), Ok(Rgba([160, 160, 164, 255])));
        assert_eq!(parse_color("#12345678"), Ok(Rgba([0x12, 0x34, 0x56, 0x78])));
    }

    #[test]
    fn test_hex_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("   "), Err(ColorError::Empty));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#GG0000"), Err(ColorError::InvalidHex('G')));
    }

    #[test]
    fn test_css_colors() {
        assert_eq!(parse_color("red"), Ok(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_color("rgb(0, 128, 255)"), Ok(Rgba([0, 128, 255, 255])));
        assert_eq!(parse_color("transparent"), Ok(Rgba([0, 0, 0, 0])));
        assert!(matches!(parse_color("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_format_hex_parses_back() {
        for color in [Rgba([1, 2, 3, 255]), Rgba([250, 128, 0, 7])] {
            assert_eq!(parse_color(&format_hex(color)), Ok(color));
        }
    }
}
