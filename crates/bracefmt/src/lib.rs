//! Replacement-field string formatting with pipeline functions and terminal
//! escape sequences.
//!
//! `bracefmt` formats messages whose replacement fields are surrounded by
//! curly braces. A field is a small pipeline expression: it can name an
//! argument, access a field of a record, or call functions that produce
//! colors and text attributes.
//!
//! # Quick Start
//!
//! ```rust
//! use bracefmt::{args, format, Named};
//!
//! // automatic placeholders consume arguments in order
//! assert_eq!(format("{p} {p}-{p}", &args![4, "test", true]).unwrap(), "4 test-true");
//!
//! // positional placeholders
//! assert_eq!(format("{p1} {p0}", &args!["c", 3]).unwrap(), "3 c");
//!
//! // named arguments
//! let named = Named::new().with("x", 1).with("y", 2);
//! assert_eq!(format("{y} {x}", &args![named]).unwrap(), "2 1");
//!
//! // unused arguments are appended
//! assert_eq!(format("My test", &args![13, "foo", false]).unwrap(), "My test 13 foo false");
//! ```
//!
//! # Records
//!
//! Record arguments (including any `Serialize` struct converted with
//! [`Argument::from_serialize`]) expose their fields through `.Field`. A
//! serialized map such as a `HashMap` binds its keys as named placeholders
//! instead.
//!
//! ```rust
//! use bracefmt::{args, format, Record};
//!
//! let point = Record::new().field("X", 4).field("Y", 1);
//! assert_eq!(format("{.X}.{.Y}", &args![point]).unwrap(), "4.1");
//! ```
//!
//! # Escape sequences
//!
//! ```rust
//! use bracefmt::{args, Formatter};
//!
//! let mut formatter = Formatter::new();
//! formatter.enable_escape_sequences();
//!
//! let out = formatter.format("{red}red{normal} {cyan | bright | background}", &args![]).unwrap();
//! assert_eq!(out, "\x1b[31mred\x1b[0m \x1b[106m");
//! ```
//!
//! Whether escape sequences are enabled by default depends on the terminal
//! and the `FORCE_ESCAPE_SEQUENCES` environment variable; see [`env`].
//! When disabled, every style and color function produces an empty string.
//!
//! # Architecture
//!
//! ```text
//! Formatter
//! ├── Binder      arguments → placeholder names, usage tracking
//! ├── Template    message → pipelines, evaluated against a Scope
//! ├── functions   built-in function tables
//! └── escape      escape codes and their transforms
//! ```

pub mod argument;
pub mod binder;
pub mod color;
pub mod env;
mod error;
pub mod escape;
mod formatter;
pub mod functions;
mod shape;
pub mod template;
pub mod value;

use std::io::Write;

pub use argument::{Argument, Named};
pub use env::{are_escape_sequences_supported, FORCE_ESCAPE_SEQUENCES_ENV};
pub use error::{FormatError, Result};
pub use formatter::{
    Formatter, DEFAULT_LEFT_DELIMITER, DEFAULT_PLACEHOLDER, DEFAULT_RIGHT_DELIMITER,
};
pub use functions::{Function, Functions};
pub use value::{Record, Value};

/// Formats a message with a default [`Formatter`].
pub fn format(message: &str, arguments: &[Argument]) -> Result<String> {
    Formatter::new().format(message, arguments)
}

/// Formats a message with a default [`Formatter`], panicking on error.
///
/// Meant for initializing statics from messages known to be valid.
pub fn must_format(message: &str, arguments: &[Argument]) -> String {
    Formatter::new().must_format(message, arguments)
}

/// Formats a message into a writer with a default [`Formatter`].
pub fn format_writer<W: Write + ?Sized>(
    writer: &mut W,
    message: &str,
    arguments: &[Argument],
) -> Result<()> {
    Formatter::new().format_writer(writer, message, arguments)
}
