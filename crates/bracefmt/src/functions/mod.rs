//! Built-in template functions.
//!
//! Functions are grouped by concern:
//!
//! - [`style`]: text attributes, colors and their transforms. These depend on
//!   whether escape sequences are enabled; when disabled, the same names are
//!   bound to functions producing empty strings.
//! - [`text`]: `upper`, `lower`, `capitalize`, `print`, `bell`
//! - [`system`]: `env`, `expand`, `user`, `hostname`, `executable`, `cwd`,
//!   `pid`, `ppid`, `ip`
//! - [`time`]: `now`, `rfc3339`, `iso8601`
//! - [`path`]: `absolute`, `base`, `clean`, `directory`, `extension`
//! - [`object`]: `fields`, `json`, `indent`
//!
//! Every function receives its already evaluated arguments; a piped value
//! arrives as the last one.

pub mod object;
pub mod path;
pub mod style;
pub mod system;
pub mod text;
pub mod time;

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{FormatError, Result};
use crate::value::Value;

/// A template function.
///
/// ```rust
/// use std::sync::Arc;
/// use bracefmt::{Function, Value};
///
/// let answer: Function = Arc::new(|_args: &[Value]| Ok(Value::from(42)));
/// assert_eq!(answer(&[]).unwrap(), Value::Int(42));
/// ```
pub type Function = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// Functions by name.
pub type Functions = HashMap<String, Function>;

/// Plain function pointer used by the built-in tables.
pub(crate) type Builtin = fn(&[Value]) -> Result<Value>;

static BUILTINS: Lazy<Functions> = Lazy::new(|| {
    text::FUNCTIONS
        .iter()
        .chain(system::FUNCTIONS)
        .chain(time::FUNCTIONS)
        .chain(path::FUNCTIONS)
        .chain(object::FUNCTIONS)
        .map(|&(name, function)| (name.to_string(), Arc::new(function) as Function))
        .collect()
});

static ESCAPE_FUNCTIONS: Lazy<Functions> = Lazy::new(|| {
    style::FUNCTIONS
        .iter()
        .map(|&(name, _, function)| (name.to_string(), Arc::new(function) as Function))
        .collect()
});

static DUMMY_FUNCTIONS: Lazy<Functions> = Lazy::new(|| {
    style::FUNCTIONS
        .iter()
        .map(|&(name, arity, _)| (name.to_string(), style::dummy(name, arity)))
        .collect()
});

/// Functions that do not depend on escape sequence support.
pub fn builtins() -> &'static Functions {
    &BUILTINS
}

/// Style and color functions; dummies producing empty strings when
/// `enabled` is false.
pub fn escape_functions(enabled: bool) -> &'static Functions {
    if enabled {
        &ESCAPE_FUNCTIONS
    } else {
        &DUMMY_FUNCTIONS
    }
}

/// Checks the argument count and returns the arguments as an array.
pub(crate) fn arity<'a, const N: usize>(name: &str, args: &'a [Value]) -> Result<&'a [Value; N]> {
    args.try_into().map_err(|_| wrong_arity(name, N, args.len()))
}

pub(crate) fn wrong_arity(name: &str, want: usize, got: usize) -> FormatError {
    FormatError::expression(format!(
        "wrong number of args for {}: want {} got {}",
        name, want, got
    ))
}

pub(crate) fn string_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| wrong_type(name, "string", value))
}

pub(crate) fn int_arg(name: &str, value: &Value) -> Result<i64> {
    value.as_int().ok_or_else(|| wrong_type(name, "int", value))
}

pub(crate) fn wrong_type(name: &str, expected: &str, value: &Value) -> FormatError {
    FormatError::expression(format!(
        "wrong type for value in {}; expected {}; got {}",
        name,
        expected,
        value.type_name()
    ))
}
