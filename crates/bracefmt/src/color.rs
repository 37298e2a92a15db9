//! Color name and hex value resolution for the `color` function.
//!
//! Supports:
//!
//! - Named colors: `black`, `red`, `green`, `yellow`, `blue`, `magenta`,
//!   `cyan`, `white`, `gray`
//! - Reset aliases: `default`, `normal`, `reset`
//! - 24-bit hex values: `0xRRGGBB` (resolved to a truecolor foreground)
//!
//! Input is lowercased and trimmed before matching.
//!
//! ```rust
//! use bracefmt::color::resolve_color;
//!
//! assert_eq!(resolve_color("  Red ").unwrap().to_string(), "\x1b[31m");
//! assert_eq!(resolve_color("0xADFF2F").unwrap().to_string(), "\x1b[38;2;173;255;47m");
//! assert!(resolve_color("teal").is_err());
//! ```

use crate::error::{FormatError, Result};
use crate::escape::{self, EscapeCode};

const RED_SHIFT: u32 = 16;
const GREEN_SHIFT: u32 = 8;
const MAX_HEX_COLOR: u32 = 0xFF_FFFF;

/// Looks up a named color.
fn named_color(name: &str) -> Option<EscapeCode> {
    let code = match name {
        "default" | "normal" | "reset" => escape::RESET,
        "black" => escape::BLACK,
        "red" => escape::RED,
        "green" => escape::GREEN,
        "yellow" => escape::YELLOW,
        "blue" => escape::BLUE,
        "magenta" => escape::MAGENTA,
        "cyan" => escape::CYAN,
        "white" => escape::WHITE,
        "gray" => escape::GRAY,
        _ => return None,
    };
    Some(code)
}

/// Parses the digits of a `0x` hex color into a truecolor code.
fn parse_hex(digits: &str, original: &str) -> Result<EscapeCode> {
    // from_str_radix tolerates a leading sign, a bare hex color does not
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FormatError::UnsupportedColor(format!(
            "invalid hex value: {}",
            original
        )));
    }

    let value = u32::from_str_radix(digits, 16)
        .ok()
        .filter(|value| *value <= MAX_HEX_COLOR)
        .ok_or_else(|| {
            FormatError::UnsupportedColor(format!("hex value out of 24-bit range: {}", original))
        })?;

    Ok(EscapeCode::rgb(
        (value >> RED_SHIFT) as u8,
        (value >> GREEN_SHIFT) as u8,
        value as u8,
    ))
}

/// Resolves a color name or `0x` hex value to an escape code.
pub fn resolve_color(input: &str) -> Result<EscapeCode> {
    let name = input.trim().to_lowercase();

    if let Some(code) = named_color(&name) {
        return Ok(code);
    }

    if let Some(digits) = name.strip_prefix("0x") {
        return parse_hex(digits, input);
    }

    Err(FormatError::UnsupportedColor(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(resolve_color("red").unwrap(), escape::RED);
        assert_eq!(resolve_color("GRAY").unwrap(), escape::GRAY);
        assert_eq!(resolve_color(" reset ").unwrap(), escape::RESET);
        assert_eq!(resolve_color("default").unwrap(), escape::RESET);
        assert_eq!(resolve_color("normal").unwrap(), escape::RESET);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(
            resolve_color("0xF3AC67").unwrap(),
            EscapeCode::rgb(243, 172, 103)
        );
        assert_eq!(
            resolve_color("0xADFF2F").unwrap(),
            EscapeCode::rgb(173, 255, 47)
        );
        assert_eq!(resolve_color("0x0000ff").unwrap(), EscapeCode::rgb(0, 0, 255));
        assert_eq!(resolve_color("0xff").unwrap(), EscapeCode::rgb(0, 0, 255));
    }

    #[test]
    fn test_hex_out_of_range() {
        let err = resolve_color("0xFFF3AC67").unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedColor(_)));
    }

    #[test]
    fn test_invalid_hex() {
        assert!(resolve_color("0x").is_err());
        assert!(resolve_color("0xZZ0000").is_err());
        assert!(resolve_color("0x+FF").is_err());
    }

    #[test]
    fn test_unknown_color() {
        let err = resolve_color("foo").unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedColor(_)));
        assert!(err.to_string().contains("foo"));
    }
}
