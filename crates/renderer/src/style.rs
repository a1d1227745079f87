//! Color parsing for figure elements.

/// An RGBA color.
pub type Rgba = [u8; 4];

pub const BLACK: Rgba = [0, 0, 0, 255];
pub const WHITE: Rgba = [255, 255, 255, 255];
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Parse a color given as a name (`"red"`, `"teal"`), a single-letter
/// shorthand (`"k"`), or a hex string (`"#RRGGBB"` / `"#RRGGBBAA"`).
pub fn parse_color(color: &str) -> Option<Rgba> {
    let color = color.trim();
    if color.starts_with('#') {
        return parse_hex_color(color);
    }
    named_color(&color.to_lowercase())
}

/// Parse a color, falling back to black for unknown names.
pub fn parse_color_or_black(color: &str) -> Rgba {
    match parse_color(color) {
        Some(rgba) => rgba,
        None => {
            tracing::warn!(color = color, "Unknown color, drawing in black");
            BLACK
        }
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn parse_hex_color(s: &str) -> Option<Rgba> {
    let digits = s.trim_start_matches('#');
    match digits.len() {
        6 => hex_to_rgb(digits).map(|(r, g, b)| [r, g, b, 255]),
        8 => {
            let (r, g, b) = hex_to_rgb(&digits[0..6])?;
            let a = u8::from_str_radix(&digits[6..8], 16).ok()?;
            Some([r, g, b, a])
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Rgba> {
    let rgba = match name {
        "transparent" | "none" => TRANSPARENT,
        "black" | "k" => BLACK,
        "white" | "w" => WHITE,
        "red" | "r" => [255, 0, 0, 255],
        "green" | "g" => [0, 128, 0, 255],
        "blue" | "b" => [0, 0, 255, 255],
        "yellow" | "y" => [255, 255, 0, 255],
        "cyan" | "c" => [0, 255, 255, 255],
        "magenta" | "m" => [255, 0, 255, 255],
        "orange" => [255, 165, 0, 255],
        "purple" => [128, 0, 128, 255],
        "brown" => [165, 42, 42, 255],
        "pink" => [255, 192, 203, 255],
        "teal" => [0, 128, 128, 255],
        "navy" => [0, 0, 128, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        "lightgray" | "lightgrey" => [211, 211, 211, 255],
        "darkgray" | "darkgrey" => [169, 169, 169, 255],
        _ => return None,
    };
    Some(rgba)
}

/// SVG paint for the RGB part of a color, e.g. `#ff8000`.
pub fn svg_color(rgba: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2])
}

/// SVG opacity for the alpha part of a color.
pub fn svg_opacity(rgba: Rgba) -> f64 {
    rgba[3] as f64 / 255.0
}

/// Linear interpolation between two colors.
pub fn lerp(a: Rgba, b: Rgba, t: f64) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| ((x as f64) * (1.0 - t) + (y as f64) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), mix(a[3], b[3])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("00FF00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
    }

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!(parse_color("Teal"), Some([0, 128, 128, 255]));
        assert_eq!(parse_color("k"), Some(BLACK));
        assert_eq!(parse_color("#00000080"), Some([0, 0, 0, 128]));
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_svg_color() {
        assert_eq!(svg_color([255, 128, 0, 255]), "#ff8000");
        assert_eq!(lerp(BLACK, WHITE, 0.5), [128, 128, 128, 255]);
    }
}
