//! Terminal escape codes and the category-checked transforms between them.
//!
//! An escape code is the SGR sequence `ESC [ <n> m`. Set functions (such as
//! `red` or `bold`) produce a code; pipeline modifiers (`bright`,
//! `background`, `foreground`, `off`) take a previously produced code and map
//! it to another one. Each modifier only accepts codes of the categories it
//! is defined for:
//!
//! | Range | Category |
//! |-------|----------|
//! | `0` | reset |
//! | `1`–`9`, `53` | style set |
//! | `21`–`29`, `55` | style off |
//! | `30`–`37` / `90`–`97` | foreground / bright foreground |
//! | `40`–`47` / `100`–`107` | background / bright background |
//! | `38;2;r;g;b` / `48;2;r;g;b` | truecolor foreground / background |
//!
//! ```rust
//! use bracefmt::escape;
//!
//! let red = escape::RED.to_string();
//! assert_eq!(escape::bright(&red).unwrap(), "\x1b[91m");
//! assert_eq!(escape::background(&red).unwrap(), "\x1b[41m");
//! assert!(escape::off(&red).is_err());
//! ```

use std::fmt;

use crate::error::{FormatError, Result};

const CSI: &str = "\x1b[";

const BRIGHT_OFFSET: u8 = 60;
const BACKGROUND_OFFSET: u8 = 10;
const OFF_OFFSET: u8 = 20;

const DEFAULT_FOREGROUND: u8 = 39;
const DEFAULT_BACKGROUND: u8 = 49;
const OVERLINE_OFF: u8 = 55;

pub const RESET: EscapeCode = EscapeCode::Sgr(0);
pub const BOLD: EscapeCode = EscapeCode::Sgr(1);
pub const FAINT: EscapeCode = EscapeCode::Sgr(2);
pub const ITALIC: EscapeCode = EscapeCode::Sgr(3);
pub const UNDERLINE: EscapeCode = EscapeCode::Sgr(4);
pub const BLINK: EscapeCode = EscapeCode::Sgr(5);
pub const INVERT: EscapeCode = EscapeCode::Sgr(7);
pub const HIDE: EscapeCode = EscapeCode::Sgr(8);
pub const STRIKE: EscapeCode = EscapeCode::Sgr(9);
pub const OVERLINE: EscapeCode = EscapeCode::Sgr(53);

pub const BLACK: EscapeCode = EscapeCode::Sgr(30);
pub const RED: EscapeCode = EscapeCode::Sgr(31);
pub const GREEN: EscapeCode = EscapeCode::Sgr(32);
pub const YELLOW: EscapeCode = EscapeCode::Sgr(33);
pub const BLUE: EscapeCode = EscapeCode::Sgr(34);
pub const MAGENTA: EscapeCode = EscapeCode::Sgr(35);
pub const CYAN: EscapeCode = EscapeCode::Sgr(36);
pub const WHITE: EscapeCode = EscapeCode::Sgr(37);
pub const GRAY: EscapeCode = EscapeCode::Sgr(90);

/// The terminal bell. Not an SGR code, but emitted by the `bell` function.
pub const BELL: &str = "\x07";

/// Which plane a truecolor code paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Foreground,
    Background,
}

impl Layer {
    fn selector(self) -> u8 {
        match self {
            Layer::Foreground => 38,
            Layer::Background => 48,
        }
    }
}

/// Category of an escape code, derived from its numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Reset,
    Style,
    StyleOff,
    Foreground,
    BrightForeground,
    Background,
    BrightBackground,
    TrueForeground,
    TrueBackground,
    /// Valid SGR syntax, but not part of any transform's domain
    /// (for example `39`, `49`, or `6`).
    Other,
}

/// A decoded SGR escape code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeCode {
    /// A single parameter code, `ESC [ n m`.
    Sgr(u8),
    /// A 24-bit color, `ESC [ 38;2;r;g;b m` or `ESC [ 48;2;r;g;b m`.
    TrueColor {
        layer: Layer,
        red: u8,
        green: u8,
        blue: u8,
    },
}

impl EscapeCode {
    /// Truecolor foreground code from already clamped components.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        EscapeCode::TrueColor {
            layer: Layer::Foreground,
            red,
            green,
            blue,
        }
    }

    /// Decodes an escape code from its encoded string form.
    ///
    /// Returns `None` for anything that is not exactly one SGR sequence of a
    /// supported shape.
    pub fn parse(input: &str) -> Option<Self> {
        let body = input.strip_prefix(CSI)?.strip_suffix('m')?;

        if is_decimal(body) {
            return body.parse().ok().map(EscapeCode::Sgr);
        }

        let mut parts = body.split(';');
        let layer = match parts.next()? {
            "38" => Layer::Foreground,
            "48" => Layer::Background,
            _ => return None,
        };
        if parts.next()? != "2" {
            return None;
        }
        let mut component = || -> Option<u8> {
            let part = parts.next()?;
            if !is_decimal(part) {
                return None;
            }
            part.parse().ok()
        };
        let (red, green, blue) = (component()?, component()?, component()?);
        if parts.next().is_some() {
            return None;
        }

        Some(EscapeCode::TrueColor {
            layer,
            red,
            green,
            blue,
        })
    }

    /// Classifies this code by numeric range.
    pub fn category(&self) -> Category {
        match *self {
            EscapeCode::TrueColor {
                layer: Layer::Foreground,
                ..
            } => Category::TrueForeground,
            EscapeCode::TrueColor {
                layer: Layer::Background,
                ..
            } => Category::TrueBackground,
            EscapeCode::Sgr(code) => match code {
                0 => Category::Reset,
                1..=5 | 7..=9 | 53 => Category::Style,
                21..=25 | 27..=29 | OVERLINE_OFF => Category::StyleOff,
                30..=37 => Category::Foreground,
                40..=47 => Category::Background,
                90..=97 => Category::BrightForeground,
                100..=107 => Category::BrightBackground,
                _ => Category::Other,
            },
        }
    }

    /// Bright-range equivalent of a plain color. Idempotent on bright colors.
    pub fn to_bright(self) -> Option<Self> {
        match (self, self.category()) {
            (EscapeCode::Sgr(code), Category::Foreground | Category::Background) => {
                Some(EscapeCode::Sgr(code + BRIGHT_OFFSET))
            }
            (code, Category::BrightForeground | Category::BrightBackground) => Some(code),
            _ => None,
        }
    }

    /// Background equivalent of a foreground color. Idempotent on backgrounds;
    /// reset maps to the default background.
    pub fn to_background(self) -> Option<Self> {
        match (self, self.category()) {
            (_, Category::Reset) => Some(EscapeCode::Sgr(DEFAULT_BACKGROUND)),
            (EscapeCode::Sgr(code), Category::Foreground | Category::BrightForeground) => {
                Some(EscapeCode::Sgr(code + BACKGROUND_OFFSET))
            }
            (
                EscapeCode::TrueColor {
                    red, green, blue, ..
                },
                Category::TrueForeground,
            ) => Some(EscapeCode::TrueColor {
                layer: Layer::Background,
                red,
                green,
                blue,
            }),
            (
                code,
                Category::Background | Category::BrightBackground | Category::TrueBackground,
            ) => Some(code),
            _ => None,
        }
    }

    /// Foreground equivalent of a background color. Idempotent on foregrounds;
    /// reset maps to the default foreground.
    pub fn to_foreground(self) -> Option<Self> {
        match (self, self.category()) {
            (_, Category::Reset) => Some(EscapeCode::Sgr(DEFAULT_FOREGROUND)),
            (EscapeCode::Sgr(code), Category::Background | Category::BrightBackground) => {
                Some(EscapeCode::Sgr(code - BACKGROUND_OFFSET))
            }
            (
                EscapeCode::TrueColor {
                    red, green, blue, ..
                },
                Category::TrueBackground,
            ) => Some(EscapeCode::TrueColor {
                layer: Layer::Foreground,
                red,
                green,
                blue,
            }),
            (
                code,
                Category::Foreground | Category::BrightForeground | Category::TrueForeground,
            ) => Some(code),
            _ => None,
        }
    }

    /// The "off" code matching a style. Idempotent on off codes.
    pub fn to_off(self) -> Option<Self> {
        match (self, self.category()) {
            (EscapeCode::Sgr(53), Category::Style) => Some(EscapeCode::Sgr(OVERLINE_OFF)),
            (EscapeCode::Sgr(code), Category::Style) => Some(EscapeCode::Sgr(code + OFF_OFFSET)),
            (code, Category::StyleOff) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for EscapeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeCode::Sgr(code) => write!(f, "{}{}m", CSI, code),
            EscapeCode::TrueColor {
                layer,
                red,
                green,
                blue,
            } => write!(
                f,
                "{}{};2;{};{};{}m",
                CSI,
                layer.selector(),
                red,
                green,
                blue
            ),
        }
    }
}

// Canonical decimal parameter: digits only, no leading zero except "0" itself.
fn is_decimal(part: &str) -> bool {
    match part.as_bytes() {
        [] => false,
        [b'0', _, ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

/// Clamps a color component into `0..=255`.
pub fn scale_color(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Truecolor foreground code from three unclamped components.
pub fn rgb(red: i64, green: i64, blue: i64) -> EscapeCode {
    EscapeCode::rgb(scale_color(red), scale_color(green), scale_color(blue))
}

fn transform(
    input: &str,
    apply: impl FnOnce(EscapeCode) -> Option<EscapeCode>,
    message: &str,
) -> Result<String> {
    EscapeCode::parse(input)
        .and_then(apply)
        .map(|code| code.to_string())
        .ok_or_else(|| FormatError::transform(message))
}

/// Applies `bright` to an encoded code.
pub fn bright(input: &str) -> Result<String> {
    transform(
        input,
        EscapeCode::to_bright,
        "bright can be used only with colors",
    )
}

/// Applies `background` to an encoded code.
pub fn background(input: &str) -> Result<String> {
    transform(
        input,
        EscapeCode::to_background,
        "background can be used only with colors",
    )
}

/// Applies `foreground` to an encoded code.
pub fn foreground(input: &str) -> Result<String> {
    transform(
        input,
        EscapeCode::to_foreground,
        "foreground can be used only with colors",
    )
}

/// Applies `off` to an encoded code.
pub fn off(input: &str) -> Result<String> {
    transform(input, EscapeCode::to_off, "off can be used with that function")
}
