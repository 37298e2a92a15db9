//! Text attribute and color functions.
//!
//! Set functions take no arguments (except `rgb` and `color`) and produce an
//! encoded escape code. Transforms take a previously produced code as their
//! only argument, usually through a pipe:
//!
//! ```text
//! {red | bright | background}
//! {blink}blinking{blink | off}
//! ```

use std::sync::Arc;

use crate::color::resolve_color;
use crate::error::Result;
use crate::escape::{self, EscapeCode};
use crate::value::Value;

use super::{arity, int_arg, string_arg, wrong_arity, Builtin, Function};

/// Name, argument count, and implementation of every escape-sensitive
/// function.
pub(crate) const FUNCTIONS: &[(&str, usize, Builtin)] = &[
    ("reset", 0, reset),
    ("normal", 0, reset),
    ("default", 0, reset),
    ("bold", 0, bold),
    ("faint", 0, faint),
    ("italic", 0, italic),
    ("underline", 0, underline),
    ("overline", 0, overline),
    ("blink", 0, blink),
    ("invert", 0, invert),
    ("hide", 0, hide),
    ("strike", 0, strike),
    ("black", 0, black),
    ("red", 0, red),
    ("green", 0, green),
    ("yellow", 0, yellow),
    ("blue", 0, blue),
    ("magenta", 0, magenta),
    ("cyan", 0, cyan),
    ("white", 0, white),
    ("gray", 0, gray),
    ("rgb", 3, rgb),
    ("color", 1, color),
    ("bright", 1, bright),
    ("background", 1, background),
    ("foreground", 1, foreground),
    ("off", 1, off),
];

/// A stand-in that checks the argument count and produces an empty string.
pub(crate) fn dummy(name: &'static str, expected: usize) -> Function {
    Arc::new(move |args: &[Value]| {
        if args.len() != expected {
            return Err(wrong_arity(name, expected, args.len()));
        }
        Ok(Value::from(""))
    })
}

fn code(name: &str, args: &[Value], code: EscapeCode) -> Result<Value> {
    arity::<0>(name, args)?;
    Ok(Value::from(code.to_string()))
}

macro_rules! set_functions {
    ($($name:ident => $code:expr),* $(,)?) => {
        $(
            fn $name(args: &[Value]) -> Result<Value> {
                code(stringify!($name), args, $code)
            }
        )*
    };
}

set_functions! {
    reset => escape::RESET,
    bold => escape::BOLD,
    faint => escape::FAINT,
    italic => escape::ITALIC,
    underline => escape::UNDERLINE,
    overline => escape::OVERLINE,
    blink => escape::BLINK,
    invert => escape::INVERT,
    hide => escape::HIDE,
    strike => escape::STRIKE,
    black => escape::BLACK,
    red => escape::RED,
    green => escape::GREEN,
    yellow => escape::YELLOW,
    blue => escape::BLUE,
    magenta => escape::MAGENTA,
    cyan => escape::CYAN,
    white => escape::WHITE,
    gray => escape::GRAY,
}

fn rgb(args: &[Value]) -> Result<Value> {
    let [red, green, blue] = arity::<3>("rgb", args)?;
    let code = escape::rgb(
        int_arg("rgb", red)?,
        int_arg("rgb", green)?,
        int_arg("rgb", blue)?,
    );
    Ok(Value::from(code.to_string()))
}

fn color(args: &[Value]) -> Result<Value> {
    let [name] = arity::<1>("color", args)?;
    let code = resolve_color(string_arg("color", name)?)?;
    Ok(Value::from(code.to_string()))
}

/// Applies a string transform. Input that is not a string is outside every
/// transform's domain.
fn transform(
    name: &str,
    args: &[Value],
    apply: fn(&str) -> Result<String>,
) -> Result<Value> {
    let [input] = arity::<1>(name, args)?;
    let encoded = match input {
        Value::Str(s) => s.as_str(),
        _ => "",
    };
    apply(encoded).map(Value::from)
}

fn bright(args: &[Value]) -> Result<Value> {
    transform("bright", args, escape::bright)
}

fn background(args: &[Value]) -> Result<Value> {
    transform("background", args, escape::background)
}

fn foreground(args: &[Value]) -> Result<Value> {
    transform("foreground", args, escape::foreground)
}

fn off(args: &[Value]) -> Result<Value> {
    transform("off", args, escape::off)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    fn call(name: &str, args: &[Value]) -> Result<String> {
        let (_, _, function) = FUNCTIONS
            .iter()
            .find(|(n, _, _)| *n == name)
            .expect("function exists");
        function(args).map(|v| v.to_string())
    }

    fn piped(name: &str, input: &str) -> Result<String> {
        call(name, &[Value::from(input)])
    }

    #[test]
    fn test_set_functions() {
        assert_eq!(call("reset", &[]).unwrap(), "\x1b[0m");
        assert_eq!(call("normal", &[]).unwrap(), "\x1b[0m");
        assert_eq!(call("bold", &[]).unwrap(), "\x1b[1m");
        assert_eq!(call("overline", &[]).unwrap(), "\x1b[53m");
        assert_eq!(call("magenta", &[]).unwrap(), "\x1b[35m");
        assert_eq!(call("gray", &[]).unwrap(), "\x1b[90m");
    }

    #[test]
    fn test_set_function_rejects_arguments() {
        assert!(call("red", &[Value::from(1)]).is_err());
    }

    #[test]
    fn test_rgb_clamps() {
        let args = [Value::from(128), Value::from(340), Value::from(-13)];
        assert_eq!(call("rgb", &args).unwrap(), "\x1b[38;2;128;255;0m");
    }

    #[test]
    fn test_rgb_requires_ints() {
        let args = [Value::from(1), Value::from("2"), Value::from(3)];
        assert!(call("rgb", &args).is_err());
        assert!(call("rgb", &args[..2]).is_err());
    }

    #[test]
    fn test_color() {
        assert_eq!(call("color", &[Value::from("red")]).unwrap(), "\x1b[31m");
        let err = call("color", &[Value::from("foo")]).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedColor(_)));
    }

    #[test]
    fn test_transforms() {
        assert_eq!(piped("bright", "\x1b[35m").unwrap(), "\x1b[95m");
        assert_eq!(piped("background", "\x1b[90m").unwrap(), "\x1b[100m");
        assert_eq!(piped("foreground", "\x1b[0m").unwrap(), "\x1b[39m");
        assert_eq!(piped("off", "\x1b[5m").unwrap(), "\x1b[25m");
    }

    #[test]
    fn test_transform_rejects_non_codes() {
        let err = piped("bright", "5").unwrap_err();
        assert!(matches!(err, FormatError::InvalidTransformInput(_)));

        let err = call("background", &[Value::from(6)]).unwrap_err();
        assert_eq!(err.to_string(), "background can be used only with colors");
    }

    #[test]
    fn test_dummy() {
        let function = dummy("rgb", 3);
        let args = [Value::from(1), Value::from(2), Value::from(3)];
        assert_eq!(function(&args).unwrap(), Value::from(""));
        assert!(function(&args[..1]).is_err());
    }
}
