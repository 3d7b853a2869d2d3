//! Terminal preview of textures using 24-bit ANSI colors
//!
//! Each texture pixel becomes two character cells with the pixel's color as
//! background, which keeps pixels roughly square in most terminal fonts.

use image::{Rgba, RgbaImage};

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// Convert RGBA color to ANSI 24-bit background escape sequence.
///
/// Transparent colors (alpha = 0) are rendered as a dark gray background
/// to visually distinguish them from opaque colors.
///
/// # Examples
///
/// ```
/// use mctex::terminal::color_to_ansi_bg;
/// use image::Rgba;
///
/// assert_eq!(color_to_ansi_bg(Rgba([255, 0, 0, 255])), "\x1b[48;2;255;0;0m");
/// assert_eq!(color_to_ansi_bg(Rgba([0, 0, 0, 0])), "\x1b[48;5;236m");
/// ```
pub fn color_to_ansi_bg(rgba: Rgba<u8>) -> String {
    if rgba[3] == 0 {
        "\x1b[48;5;236m".to_string()
    } else {
        format!("\x1b[48;2;{};{};{}m", rgba[0], rgba[1], rgba[2])
    }
}

/// Render an image as rows of colored double-width cells.
pub fn render_ansi(image: &RgbaImage) -> String {
    let mut output = String::new();
    for row in image.rows() {
        for pixel in row {
            output.push_str(&color_to_ansi_bg(*pixel));
            output.push_str("  ");
        }
        output.push_str(ANSI_RESET);
        output.push('\n');
    }
    output
}

/// Render with column numbers across the top and row numbers down the left.
///
/// Column headers show the last digit of each x coordinate, which is enough to
/// count along a 16- or 32-pixel texture.
///
/// ```text
///      0 1 2 3
///    ┌────────
///  0 │▒▒▒▒▒▒▒▒
///  1 │▒▒▒▒▒▒▒▒
/// ```
pub fn render_ansi_with_coordinates(image: &RgbaImage) -> String {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return String::new();
    }

    let label_width = (height - 1).to_string().len().max(2);
    let mut output = String::new();

    output.push_str(&" ".repeat(label_width + 2));
    for x in 0..width {
        output.push_str(&format!("{:<2}", x % 10));
    }
    output.push('\n');
    output.push_str(&format!("{:w$} ┌{}\n", "", "─".repeat(width as usize * 2), w = label_width));

    for (y, line) in render_ansi(image).lines().enumerate() {
        output.push_str(&format!("{:>w$} │{}\n", y, line, w = label_width));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_ansi_bg_partial_alpha() {
        // Only fully transparent pixels get the placeholder
        assert_eq!(color_to_ansi_bg(Rgba([10, 20, 30, 1])), "\x1b[48;2;10;20;30m");
    }

    #[test]
    fn test_render_ansi_rows() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        image.put_pixel(1, 1, Rgba([0, 0, 0, 0]));

        let output = render_ansi(&image);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches("\x1b[48;2;0;255;0m").count(), 2);
        assert!(lines[1].contains("\x1b[48;5;236m"));
        assert!(lines[1].ends_with(ANSI_RESET));
    }

    #[test]
    fn test_render_with_coordinates() {
        let image = RgbaImage::from_pixel(12, 3, Rgba([1, 1, 1, 255]));
        let output = render_ansi_with_coordinates(&image);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].trim_start().starts_with("0 1 2"));
        assert!(lines[0].contains("9 0 1"));
        assert!(lines[1].contains('┌'));
        assert!(lines[4].starts_with(" 2 │"));
    }

    #[test]
    fn test_render_with_coordinates_empty() {
        assert_eq!(render_ansi_with_coordinates(&RgbaImage::new(0, 0)), "");
    }
}
