//! Object inspection functions.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{FormatError, Result};
use crate::value::Value;

use super::{arity, string_arg, Builtin};

pub(crate) const FUNCTIONS: &[(&str, Builtin)] = &[
    ("fields", fields),
    ("json", json),
    ("indent", indent),
];

/// Text of a value with record field names, e.g. `{Value:3 Message:text}`.
fn fields(args: &[Value]) -> Result<Value> {
    let [value] = arity::<1>("fields", args)?;
    Ok(Value::from(value.to_field_string()))
}

/// Compact JSON of a value.
fn json(args: &[Value]) -> Result<Value> {
    let [value] = arity::<1>("json", args)?;
    serde_json::to_string(value)
        .map(Value::from)
        .map_err(|e| FormatError::expression(format!("json: {}", e)))
}

/// Re-indents a JSON document with tabs.
fn indent(args: &[Value]) -> Result<Value> {
    let [text] = arity::<1>("indent", args)?;
    let text = string_arg("indent", text)?;

    let document: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| FormatError::expression(format!("indent: {}", e)))?;

    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    document
        .serialize(&mut serializer)
        .map_err(|e| FormatError::expression(format!("indent: {}", e)))?;

    String::from_utf8(out)
        .map(Value::from)
        .map_err(|e| FormatError::expression(format!("indent: {}", e)))
}
