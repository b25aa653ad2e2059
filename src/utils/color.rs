//! Cell shade helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#?([0-9a-fA-F]{6}|[0-9a-fA-F]{3})$").unwrap();
}

/// Normalize `#abc` / `#AABBCC` / `aabbcc` to `AABBCC`
pub fn normalize_shade(color: &str) -> Option<String> {
    let caps = HEX_COLOR.captures(color.trim())?;
    let hex = caps.get(1)?.as_str();
    let full = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        hex.to_string()
    };
    Some(full.to_ascii_uppercase())
}

/// Relative luminance of a normalized `RRGGBB` color, 0.0 (black) to 1.0
fn luminance(hex: &str) -> Option<f64> {
    let channel = |i: usize| -> Option<f64> {
        let value = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
        Some(f64::from(value) / 255.0)
    };
    Some(0.299 * channel(0)? + 0.587 * channel(2)? + 0.114 * channel(4)?)
}

/// Text color readable on top of `shade`
pub fn contrasting_text(shade: &str) -> &'static str {
    match normalize_shade(shade).and_then(|hex| luminance(&hex)) {
        Some(l) if l < 0.5 => "FFFFFF",
        _ => "000000",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_shade() {
        assert_eq!(normalize_shade("#eeeeee").as_deref(), Some("EEEEEE"));
        assert_eq!(normalize_shade("00CC00").as_deref(), Some("00CC00"));
        assert_eq!(normalize_shade("#abc").as_deref(), Some("AABBCC"));
        assert_eq!(normalize_shade("red"), None);
        assert_eq!(normalize_shade("#12345"), None);
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(contrasting_text("#CC3333"), "FFFFFF");
        assert_eq!(contrasting_text("#FFCC00"), "000000");
        assert_eq!(contrasting_text("not a color"), "000000");
    }
}
