//! String functions.

use crate::error::Result;
use crate::escape;
use crate::value::Value;

use super::{arity, string_arg, Builtin};

pub(crate) const FUNCTIONS: &[(&str, Builtin)] = &[
    ("upper", upper),
    ("lower", lower),
    ("capitalize", capitalize),
    ("print", print),
    ("bell", bell),
];

fn upper(args: &[Value]) -> Result<Value> {
    let [text] = arity::<1>("upper", args)?;
    Ok(Value::from(string_arg("upper", text)?.to_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value> {
    let [text] = arity::<1>("lower", args)?;
    Ok(Value::from(string_arg("lower", text)?.to_lowercase()))
}

/// Uppercases the first character and keeps the rest.
fn capitalize(args: &[Value]) -> Result<Value> {
    let [text] = arity::<1>("capitalize", args)?;
    let text = string_arg("capitalize", text)?;

    let mut chars = text.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Ok(Value::from(capitalized))
}

/// Concatenates the operands, adding a space between two operands when
/// neither is a string.
fn print(args: &[Value]) -> Result<Value> {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        let is_string = matches!(arg, Value::Str(_));
        if i > 0 && !is_string && !matches!(args[i - 1], Value::Str(_)) {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    Ok(Value::from(out))
}

fn bell(args: &[Value]) -> Result<Value> {
    arity::<0>("bell", args)?;
    Ok(Value::from(escape::BELL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(function: Builtin, args: &[Value]) -> String {
        function(args).unwrap().to_string()
    }

    #[test]
    fn test_case_functions() {
        assert_eq!(text(upper, &[Value::from("text")]), "TEXT");
        assert_eq!(text(lower, &[Value::from("teXt")]), "text");
        assert_eq!(text(capitalize, &[Value::from("text")]), "Text");
        assert_eq!(text(capitalize, &[Value::from("")]), "");
        assert_eq!(text(capitalize, &[Value::from("élan vital")]), "Élan vital");
    }

    #[test]
    fn test_case_functions_require_strings() {
        assert!(upper(&[Value::from(3)]).is_err());
        assert!(lower(&[]).is_err());
    }

    #[test]
    fn test_print_spacing() {
        assert_eq!(text(print, &[Value::from(5)]), "5");
        assert_eq!(text(print, &[Value::from(1), Value::from(2)]), "1 2");
        assert_eq!(text(print, &[Value::from("a"), Value::from("b")]), "ab");
        assert_eq!(
            text(print, &[Value::from("a"), Value::from(1), Value::from(2)]),
            "a1 2"
        );
        assert_eq!(text(print, &[]), "");
    }

    #[test]
    fn test_bell() {
        assert_eq!(text(bell, &[]), "\x07");
    }
}
