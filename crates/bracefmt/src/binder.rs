//! Binds call-time arguments to placeholder names and tracks their usage.
//!
//! For a placeholder prefix `p` and arguments `a0, a1, ...` the symbol table
//! contains:
//!
//! | Name | Resolves to |
//! |------|-------------|
//! | `p` | the next argument in order, then nil once exhausted |
//! | `p0`, `p1`, ... | the argument at that position |
//! | every key of a [`Named`](crate::Named) argument | that key's value |
//!
//! Names are bound in argument order and the last binding of a name wins.
//! Resolving a name marks the argument behind it as used; a key marks its
//! whole named argument. The last record argument becomes the object behind
//! `.` in the template.

use std::collections::HashMap;

use regex::Regex;
use tracing::trace;

use crate::argument::Argument;
use crate::error::{FormatError, Result};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Automatic,
    Positional(usize),
    /// A key of the named argument at this position.
    Key(usize),
}

/// Per-call symbol table and usage tracker.
#[derive(Debug)]
pub struct Binder<'a> {
    arguments: &'a [Argument],
    symbols: HashMap<String, Symbol>,
    used: Vec<bool>,
    cursor: usize,
    object: Option<usize>,
    dot: Value,
}

impl<'a> Binder<'a> {
    /// Builds the symbol table for `arguments`.
    pub fn new(placeholder: &str, arguments: &'a [Argument]) -> Self {
        let mut symbols = HashMap::new();
        symbols.insert(placeholder.to_string(), Symbol::Automatic);

        let mut object = None;
        for (position, argument) in arguments.iter().enumerate() {
            symbols.insert(
                format!("{}{}", placeholder, position),
                Symbol::Positional(position),
            );

            match argument {
                Argument::Named(named) => {
                    for (key, _) in named.iter() {
                        symbols.insert(key.to_string(), Symbol::Key(position));
                    }
                }
                Argument::Record(_) | Argument::RecordPointer(Some(_)) => {
                    object = Some(position);
                }
                Argument::Scalar(_) | Argument::RecordPointer(None) => {}
            }
        }

        let dot = object
            .and_then(|position| arguments[position].record())
            .map(|record| Value::Record(record.clone()))
            .unwrap_or_default();

        trace!(
            placeholder,
            arguments = arguments.len(),
            symbols = symbols.len(),
            object = ?object,
            "symbol table built"
        );

        Self {
            arguments,
            symbols,
            used: vec![false; arguments.len()],
            cursor: 0,
            object,
            dot,
        }
    }

    /// Returns `true` if `name` is a placeholder.
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Resolves a placeholder and marks its argument used.
    pub fn resolve(&mut self, name: &str) -> Option<Value> {
        let value = match *self.symbols.get(name)? {
            Symbol::Automatic => {
                let position = self.cursor;
                match self.arguments.get(position) {
                    Some(argument) => {
                        self.cursor += 1;
                        self.used[position] = true;
                        argument.value()
                    }
                    None => Value::Nil,
                }
            }
            Symbol::Positional(position) => {
                self.used[position] = true;
                self.arguments[position].value()
            }
            Symbol::Key(position) => {
                self.used[position] = true;
                match &self.arguments[position] {
                    Argument::Named(named) => named.get(name).cloned().unwrap_or_default(),
                    _ => Value::Nil,
                }
            }
        };
        Some(value)
    }

    /// The object behind `.`, or nil when no record argument was given.
    pub fn dot(&self) -> &Value {
        &self.dot
    }

    /// Position of the record argument exposed as `.`.
    pub fn object(&self) -> Option<usize> {
        self.object
    }

    pub fn is_used(&self, position: usize) -> bool {
        self.used.get(position).copied().unwrap_or(false)
    }

    pub fn all_used(&self) -> bool {
        self.used.iter().all(|used| *used)
    }

    /// Marks the object used if `message` appears to access its fields.
    ///
    /// Fields reached through `.` never resolve a placeholder, so this is
    /// decided from the message text with [`field_access_used`].
    pub fn backfill_object(&mut self, message: &str, left: &str, right: &str) -> Result<()> {
        let Some(position) = self.object else {
            return Ok(());
        };
        if self.used[position] {
            return Ok(());
        }

        let accessed = field_access_used(message, left, right)?;
        trace!(position, accessed, "object usage backfill");
        self.used[position] = accessed;
        Ok(())
    }

    /// Unused arguments in position order.
    pub fn unused(&self) -> impl Iterator<Item = &'a Argument> + '_ {
        self.arguments
            .iter()
            .zip(&self.used)
            .filter(|(_, used)| !**used)
            .map(|(argument, _)| argument)
    }

    /// Default text of the unused arguments joined by spaces, if any.
    pub fn unused_text(&self) -> Option<String> {
        let parts: Vec<String> = self.unused().map(|a| a.to_string()).collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Heuristic check for `.Field` access in a message.
///
/// Matches an action that starts with `.` or that contains ` .` after some
/// other leading text, such as `{.X}` or `{p | print .X}`. The check is
/// textual: a ` .` inside a string literal also matches, and a field reached
/// through a custom function does not.
///
/// ```rust
/// use bracefmt::binder::field_access_used;
///
/// assert!(field_access_used("{.X}.{.Y}", "{", "}").unwrap());
/// assert!(field_access_used("[.Z}", "[", "}").unwrap());
/// assert!(!field_access_used("{p}", "{", "}").unwrap());
/// ```
pub fn field_access_used(message: &str, left: &str, right: &str) -> Result<bool> {
    let pattern = format!(
        r"{}\s*(\.|[^\.].* \.).+{}",
        regex::escape(left),
        regex::escape(right)
    );
    let regex = Regex::new(&pattern)
        .map_err(|e| FormatError::expression(format!("field access pattern: {}", e)))?;
    Ok(regex.is_match(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Named;
    use crate::args;
    use crate::value::Record;

    fn point() -> Record {
        Record::new().field("X", 4).field("Y", 1)
    }

    #[test]
    fn test_automatic_advances_and_exhausts() {
        let args = args![4, "test"];
        let mut binder = Binder::new("p", &args);

        assert_eq!(binder.resolve("p"), Some(Value::from(4)));
        assert_eq!(binder.resolve("p"), Some(Value::from("test")));
        assert_eq!(binder.resolve("p"), Some(Value::Nil));
        assert_eq!(binder.resolve("p"), Some(Value::Nil));
        assert!(binder.all_used());
    }

    #[test]
    fn test_positional_is_independent_of_automatic() {
        let args = args![1, 2];
        let mut binder = Binder::new("p", &args);

        assert_eq!(binder.resolve("p1"), Some(Value::from(2)));
        assert!(!binder.is_used(0));
        assert_eq!(binder.resolve("p"), Some(Value::from(1)));
        assert_eq!(binder.resolve("p"), Some(Value::from(2)));
        assert!(binder.all_used());
    }

    #[test]
    fn test_named_keys_mark_whole_argument() {
        let args = args![Named::new().with("x", 1).with("y", 2), "c"];
        let mut binder = Binder::new("p", &args);

        assert!(binder.contains("x"));
        assert!(binder.contains("p0"));
        assert_eq!(binder.resolve("y"), Some(Value::from(2)));
        assert!(binder.is_used(0));
        assert!(!binder.is_used(1));
        assert_eq!(binder.unused_text(), Some("c".into()));
    }

    #[test]
    fn test_last_binding_wins() {
        let args = args![
            Named::new().with("name", "first"),
            Named::new().with("name", "second")
        ];
        let mut binder = Binder::new("p", &args);

        assert_eq!(binder.resolve("name"), Some(Value::from("second")));
        assert!(!binder.is_used(0));
        assert!(binder.is_used(1));
    }

    #[test]
    fn test_named_key_can_shadow_placeholder() {
        let args = args![Named::new().with("p", "named")];
        let mut binder = Binder::new("p", &args);
        assert_eq!(binder.resolve("p"), Some(Value::from("named")));
    }

    #[test]
    fn test_unknown_name() {
        let args = args![1];
        let mut binder = Binder::new("p", &args);
        assert!(!binder.contains("p1"));
        assert_eq!(binder.resolve("p1"), None);
        assert!(!binder.is_used(0));
    }

    #[test]
    fn test_last_record_is_object() {
        let args = args![point(), 3, Record::new().field("Z", 9)];
        let binder = Binder::new("p", &args);
        assert_eq!(binder.object(), Some(2));
        assert_eq!(binder.dot().to_string(), "{9}");
    }

    #[test]
    fn test_nil_pointer_is_not_object() {
        let args = args![point(), Argument::RecordPointer(None)];
        let binder = Binder::new("p", &args);
        assert_eq!(binder.object(), Some(0));

        let args = args![Argument::RecordPointer(None)];
        let binder = Binder::new("p", &args);
        assert_eq!(binder.object(), None);
        assert!(binder.dot().is_nil());
    }

    #[test]
    fn test_backfill_object() {
        let args = args![point(), "b"];
        let mut binder = Binder::new("p", &args);
        binder.backfill_object("{.X}.{.Y}", "{", "}").unwrap();
        assert!(binder.is_used(0));
        assert_eq!(binder.unused_text(), Some("b".into()));

        let mut binder = Binder::new("p", &args);
        binder.backfill_object("no access", "{", "}").unwrap();
        assert!(!binder.is_used(0));
        assert_eq!(binder.unused_text(), Some("{4 1} b".into()));
    }

    #[test]
    fn test_unused_text_keeps_position_order() {
        let args = args![1, 2, 3, 4];
        let mut binder = Binder::new("p", &args);
        binder.resolve("p2");
        assert_eq!(binder.unused_text(), Some("1 2 4".into()));

        binder.resolve("p0");
        binder.resolve("p1");
        binder.resolve("p3");
        assert_eq!(binder.unused_text(), None);
    }

    #[test]
    fn test_field_access_heuristic() {
        assert!(field_access_used("{.Z} {.Y}", "{", "}").unwrap());
        assert!(field_access_used("{ .Z}", "{", "}").unwrap());
        assert!(field_access_used("{p | print .X}", "{", "}").unwrap());
        assert!(field_access_used("<<.X>>", "<<", ">>").unwrap());
        assert!(field_access_used("(.X)", "(", ")").unwrap());

        assert!(!field_access_used("{p} {p1}", "{", "}").unwrap());
        assert!(!field_access_used("{.}", "{", "}").unwrap());
        assert!(!field_access_used("{.X}", "<", ">").unwrap());
    }

    #[test]
    fn test_field_access_heuristic_matches_inside_literals() {
        assert!(field_access_used(r#"{print "a .b"}"#, "{", "}").unwrap());
    }
}
