//! The [`Formatter`] façade.
//!
//! A formatter owns the configuration (placeholder prefix, delimiters,
//! escape sequence flag, custom functions) and runs one format call as:
//!
//! 1. bind the arguments to placeholder names ([`Binder`])
//! 2. parse and execute the message against the placeholders, the custom
//!    functions and the built-in functions
//! 3. append every argument the message did not use
//!
//! Name lookup prefers, in order: custom functions, placeholders, built-in
//! functions, style and color functions.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use tracing::debug;

use crate::argument::Argument;
use crate::binder::Binder;
use crate::env::default_escape_sequences;
use crate::error::{FormatError, Result};
use crate::functions::{self, wrong_arity, Function, Functions};
use crate::template::{Scope, Template};
use crate::value::Value;

/// Prefix of automatic (`p`) and positional (`p0`, `p1`, ...) placeholders.
pub const DEFAULT_PLACEHOLDER: &str = "p";

/// Opening delimiter of an action.
pub const DEFAULT_LEFT_DELIMITER: &str = "{";

/// Closing delimiter of an action.
pub const DEFAULT_RIGHT_DELIMITER: &str = "}";

/// Formats messages with replacement fields surrounded by delimiters.
///
/// ```rust
/// use bracefmt::{args, Formatter, Named};
///
/// let mut formatter = Formatter::new();
/// formatter.set_delimiters("<", ">").disable_escape_sequences();
///
/// assert_eq!(formatter.format("<p1> <p0>", &args!["c", 3]).unwrap(), "3 c");
/// assert_eq!(formatter.format("<red>x<normal>", &args![]).unwrap(), "x");
/// assert_eq!(formatter.format("unused:", &args![1, 2]).unwrap(), "unused: 1 2");
/// ```
#[derive(Clone)]
pub struct Formatter {
    placeholder: String,
    left_delimiter: String,
    right_delimiter: String,
    escape_sequences: bool,
    functions: Functions,
}

impl Formatter {
    /// Creates a formatter with default settings.
    ///
    /// Escape sequences start enabled if the process environment supports
    /// them (see [`crate::env`]).
    pub fn new() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            left_delimiter: DEFAULT_LEFT_DELIMITER.to_string(),
            right_delimiter: DEFAULT_RIGHT_DELIMITER.to_string(),
            escape_sequences: default_escape_sequences(),
            functions: Functions::new(),
        }
    }

    /// Formats a message.
    ///
    /// On error nothing is returned, even if part of the message was
    /// already rendered.
    pub fn format(&self, message: &str, arguments: &[Argument]) -> Result<String> {
        let mut out = Vec::with_capacity(message.len());
        self.format_writer(&mut out, message, arguments)?;
        String::from_utf8(out).map_err(|e| FormatError::expression(e.to_string()))
    }

    /// Like [`format`](Self::format), but panics on error.
    ///
    /// Meant for initializing statics from messages known to be valid.
    pub fn must_format(&self, message: &str, arguments: &[Argument]) -> String {
        match self.format(message, arguments) {
            Ok(formatted) => formatted,
            Err(e) => panic!("{}", e),
        }
    }

    /// Formats a message into a writer.
    ///
    /// Output is streamed: text before a failing action may already have
    /// been written when an error is returned.
    pub fn format_writer<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        message: &str,
        arguments: &[Argument],
    ) -> Result<()> {
        let template = Template::parse(message, &self.left_delimiter, &self.right_delimiter)?;

        let mut scope = FormatScope {
            binder: Binder::new(&self.placeholder, arguments),
            custom: &self.functions,
            escape: functions::escape_functions(self.escape_sequences),
        };
        let mut out = TrackingWriter::new(writer);
        template.execute(&mut scope, &mut out)?;

        let mut binder = scope.binder;
        if !binder.all_used() {
            binder.backfill_object(message, &self.left_delimiter, &self.right_delimiter)?;
        }

        let trailing = binder.unused_text();
        debug!(
            arguments = arguments.len(),
            unused = binder.unused().count(),
            escape_sequences = self.escape_sequences,
            "message formatted"
        );

        if let Some(text) = trailing {
            let separator = if out.ends_with_text() { " " } else { "" };
            out.write_all(format!("{}{}", separator, text).as_bytes())?;
        }
        Ok(())
    }

    /// Resets every setting to its default.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    // === Placeholder ===

    /// Sets the prefix of automatic and positional placeholders.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) -> &mut Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn reset_placeholder(&mut self) -> &mut Self {
        self.set_placeholder(DEFAULT_PLACEHOLDER)
    }

    // === Delimiters ===

    /// Sets both delimiters. They must be non-empty and differ from each
    /// other for messages to parse as expected.
    pub fn set_delimiters(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> &mut Self {
        self.set_left_delimiter(left).set_right_delimiter(right)
    }

    pub fn set_left_delimiter(&mut self, delimiter: impl Into<String>) -> &mut Self {
        self.left_delimiter = delimiter.into();
        self
    }

    pub fn set_right_delimiter(&mut self, delimiter: impl Into<String>) -> &mut Self {
        self.right_delimiter = delimiter.into();
        self
    }

    /// Returns `(left, right)`.
    pub fn delimiters(&self) -> (&str, &str) {
        (&self.left_delimiter, &self.right_delimiter)
    }

    pub fn left_delimiter(&self) -> &str {
        &self.left_delimiter
    }

    pub fn right_delimiter(&self) -> &str {
        &self.right_delimiter
    }

    pub fn reset_delimiters(&mut self) -> &mut Self {
        self.reset_left_delimiter().reset_right_delimiter()
    }

    pub fn reset_left_delimiter(&mut self) -> &mut Self {
        self.set_left_delimiter(DEFAULT_LEFT_DELIMITER)
    }

    pub fn reset_right_delimiter(&mut self) -> &mut Self {
        self.set_right_delimiter(DEFAULT_RIGHT_DELIMITER)
    }

    // === Escape sequences ===

    /// Enables or disables escape sequences. When disabled, style and color
    /// functions still exist but produce empty strings.
    pub fn set_escape_sequences(&mut self, enabled: bool) -> &mut Self {
        self.escape_sequences = enabled;
        self
    }

    pub fn enable_escape_sequences(&mut self) -> &mut Self {
        self.set_escape_sequences(true)
    }

    pub fn disable_escape_sequences(&mut self) -> &mut Self {
        self.set_escape_sequences(false)
    }

    pub fn are_escape_sequences_enabled(&self) -> bool {
        self.escape_sequences
    }

    // === Functions ===

    /// Replaces all custom functions.
    pub fn set_functions(&mut self, functions: Functions) -> &mut Self {
        self.functions = functions;
        self
    }

    /// Adds a custom function, replacing any function of the same name.
    ///
    /// Custom functions take precedence over placeholders and built-ins.
    pub fn add_function<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    pub fn add_functions(&mut self, functions: Functions) -> &mut Self {
        self.functions.extend(functions);
        self
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    /// Removes a custom function. Unknown names are ignored.
    pub fn remove_function(&mut self, name: &str) -> &mut Self {
        self.functions.remove(name);
        self
    }

    pub fn remove_functions<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.functions.remove(name.as_ref());
        }
        self
    }

    pub fn reset_functions(&mut self) -> &mut Self {
        self.functions.clear();
        self
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        functions.sort_unstable();
        f.debug_struct("Formatter")
            .field("placeholder", &self.placeholder)
            .field("left_delimiter", &self.left_delimiter)
            .field("right_delimiter", &self.right_delimiter)
            .field("escape_sequences", &self.escape_sequences)
            .field("functions", &functions)
            .finish()
    }
}

/// Names visible to one format call.
struct FormatScope<'a> {
    binder: Binder<'a>,
    custom: &'a Functions,
    escape: &'static Functions,
}

impl FormatScope<'_> {
    fn builtin(&self, name: &str) -> Option<&Function> {
        functions::builtins()
            .get(name)
            .or_else(|| self.escape.get(name))
    }
}

impl Scope for FormatScope<'_> {
    fn has_function(&self, name: &str) -> bool {
        self.custom.contains_key(name) || self.binder.contains(name) || self.builtin(name).is_some()
    }

    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        if let Some(function) = self.custom.get(name) {
            return function(&args);
        }

        if self.binder.contains(name) {
            if !args.is_empty() {
                return Err(wrong_arity(name, 0, args.len()));
            }
            return Ok(self.binder.resolve(name).unwrap_or_default());
        }

        match self.builtin(name) {
            Some(function) => function(&args),
            None => Err(FormatError::expression(format!(
                "function \"{}\" not defined",
                name
            ))),
        }
    }

    fn dot(&self) -> &Value {
        self.binder.dot()
    }
}

/// Forwards writes and remembers the last byte written.
struct TrackingWriter<'w, W: ?Sized> {
    inner: &'w mut W,
    last: Option<u8>,
}

impl<'w, W: Write + ?Sized> TrackingWriter<'w, W> {
    fn new(inner: &'w mut W) -> Self {
        Self { inner, last: None }
    }

    /// `true` if something was written and it does not end with a space.
    fn ends_with_text(&self) -> bool {
        matches!(self.last, Some(byte) if byte != b' ')
    }
}

impl<W: Write + ?Sized> Write for TrackingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if written > 0 {
            self.last = Some(buf[written - 1]);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn plain() -> Formatter {
        let mut formatter = Formatter::new();
        formatter.disable_escape_sequences();
        formatter
    }

    #[test]
    fn test_defaults() {
        let formatter = Formatter::new();
        assert_eq!(formatter.placeholder(), "p");
        assert_eq!(formatter.delimiters(), ("{", "}"));
        assert!(formatter.functions().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut formatter = Formatter::new();
        formatter
            .set_placeholder("z")
            .set_delimiters("[", "]")
            .add_function("f", |_: &[Value]| Ok(Value::Nil))
            .set_escape_sequences(!default_escape_sequences());

        formatter.reset();
        assert_eq!(formatter.placeholder(), DEFAULT_PLACEHOLDER);
        assert_eq!(formatter.left_delimiter(), DEFAULT_LEFT_DELIMITER);
        assert_eq!(formatter.right_delimiter(), DEFAULT_RIGHT_DELIMITER);
        assert!(formatter.functions().is_empty());
        assert_eq!(
            formatter.are_escape_sequences_enabled(),
            default_escape_sequences()
        );
    }

    #[test]
    fn test_trailing_separator_follows_rendered_output() {
        let formatter = plain();
        assert_eq!(formatter.format("", &args![1]).unwrap(), "1");
        assert_eq!(formatter.format(" ", &args![1]).unwrap(), " 1");
        assert_eq!(formatter.format("a", &args![1, 2]).unwrap(), "a 1 2");
        assert_eq!(formatter.format("{red}", &args![1]).unwrap(), "1");
        assert_eq!(formatter.format(r#"{"x "}"#, &args![1]).unwrap(), "x 1");
    }

    #[test]
    fn test_custom_function_shadows_placeholder() {
        let mut formatter = plain();
        formatter.add_function("p0", |_: &[Value]| Ok(Value::from("custom")));
        assert_eq!(formatter.format("{p0}", &args![1]).unwrap(), "custom 1");
    }

    #[test]
    fn test_placeholder_shadows_builtin() {
        let formatter = plain();
        let args = args![crate::Named::new().with("upper", "named")];
        assert_eq!(formatter.format("{upper}", &args).unwrap(), "named");
    }

    #[test]
    fn test_placeholder_rejects_arguments() {
        let err = plain().format("{p 1}", &args![1]).unwrap_err();
        assert!(err.to_string().contains("wrong number of args for p"));
    }

    #[test]
    fn test_tracking_writer() {
        let mut buffer = Vec::new();
        let mut writer = TrackingWriter::new(&mut buffer);
        assert!(!writer.ends_with_text());
        writer.write_all(b"ab").unwrap();
        assert!(writer.ends_with_text());
        writer.write_all(b"c ").unwrap();
        assert!(!writer.ends_with_text());
        writer.write_all(b"").unwrap();
        assert!(!writer.ends_with_text());
    }

    #[test]
    fn test_debug_lists_function_names() {
        let mut formatter = plain();
        formatter
            .add_function("b", |_: &[Value]| Ok(Value::Nil))
            .add_function("a", |_: &[Value]| Ok(Value::Nil));
        let debug = format!("{:?}", formatter);
        assert!(debug.contains(r#"functions: ["a", "b"]"#));
    }
}
