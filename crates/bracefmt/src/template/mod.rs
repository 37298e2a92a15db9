//! A small pipeline template engine with configurable delimiters.
//!
//! Messages mix literal text with actions enclosed in delimiters. An action
//! is a pipeline of commands joined by `|`; the result of each command is
//! passed as the last argument of the next one:
//!
//! ```text
//! {p}                          automatic placeholder
//! {p1.Name}                    field of a placeholder's value
//! {.X}                         field of the current object
//! {rgb 255 165 0 | background} function call with literal arguments
//! {print (upper "a") 3}        nested pipeline
//! {/* comment */}
//! ```
//!
//! Identifiers are resolved through a [`Scope`], which supplies every callable
//! name (placeholders and functions alike) and the object behind `.`.
//!
//! ```rust
//! use bracefmt::template::{Scope, Template};
//! use bracefmt::{Result, Value};
//!
//! struct Upper(Value);
//!
//! impl Scope for Upper {
//!     fn has_function(&self, name: &str) -> bool {
//!         name == "upper"
//!     }
//!
//!     fn call(&mut self, _name: &str, args: Vec<Value>) -> Result<Value> {
//!         Ok(Value::from(args[0].to_string().to_uppercase()))
//!     }
//!
//!     fn dot(&self) -> &Value {
//!         &self.0
//!     }
//! }
//!
//! let template = Template::parse("<{.}> <{upper .}>", "{", "}").unwrap();
//! let mut out = Vec::new();
//! template.execute(&mut Upper(Value::from("hi")), &mut out).unwrap();
//! assert_eq!(out, b"<hi> <HI>");
//! ```

mod exec;
mod lexer;
mod parse;

use std::io::Write;

use crate::error::{FormatError, Result};
use crate::value::Value;

pub use parse::Template;

/// Name resolution and the current object for template execution.
pub trait Scope {
    /// Returns `true` if `name` can be called.
    fn has_function(&self, name: &str) -> bool;

    /// Calls `name` with already evaluated arguments.
    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value>;

    /// The value of `.`.
    fn dot(&self) -> &Value;
}

impl Template {
    /// Fails on the first function name the scope does not define.
    pub fn check(&self, scope: &dyn Scope) -> Result<()> {
        match self
            .function_names()
            .into_iter()
            .find(|name| !scope.has_function(name))
        {
            Some(name) => Err(FormatError::expression(format!(
                "function \"{}\" not defined",
                name
            ))),
            None => Ok(()),
        }
    }

    /// Checks the template against `scope` and then renders it into `out`.
    ///
    /// Nothing is written when the check fails. Evaluation stops at the
    /// first error, so text before the failing action may already be
    /// written.
    pub fn execute(&self, scope: &mut dyn Scope, out: &mut dyn Write) -> Result<()> {
        self.check(&*scope)?;
        exec::Executor::new(scope).run(&self.nodes, out)
    }
}
