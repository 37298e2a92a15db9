//! Call-time arguments and their classification.
//!
//! Every value handed to a format call becomes an [`Argument`]. The variant
//! decides how the binder exposes it:
//!
//! - [`Argument::Scalar`]: automatic and positional placeholders only.
//! - [`Argument::Named`]: additionally, every key becomes a placeholder name.
//! - [`Argument::Record`]: additionally, a candidate for `.Field` access.
//! - [`Argument::RecordPointer`]: like `Record` when present; an absent
//!   pointer is never treated as a record.
//!
//! The [`args!`](crate::args) macro converts a list of expressions with
//! `Into<Argument>`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::value::{Record, Value};

/// String-keyed arguments whose keys become placeholder names.
///
/// ```rust
/// use bracefmt::{args, format, Named};
///
/// let named = Named::new().with("file", "dir/file").with("line", 3);
/// assert_eq!(format("{file}:{line}", &args![named]).unwrap(), "dir/file:3");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Named {
    entries: BTreeMap<String, Value>,
}

impl Named {
    /// Creates an empty set of named arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a named argument.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Adds (or replaces) a named argument in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Named {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A classified call-time argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Scalar(Value),
    Named(Named),
    Record(Record),
    /// A reference to a record that may be absent.
    RecordPointer(Option<Record>),
}

impl Argument {
    /// Classifies a value: maps become named arguments, records become
    /// record arguments, everything else is a scalar.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Map(entries) => Argument::Named(Named { entries }),
            Value::Record(record) => Argument::Record(record),
            other => Argument::Scalar(other),
        }
    }

    /// Classifies any serializable value. Structs become records and
    /// top-level maps become named arguments.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::classify(Value::from_serialize(value)?))
    }

    /// A reference to a serializable struct, or an absent one.
    pub fn pointer<T: Serialize>(value: Option<&T>) -> Result<Self> {
        Ok(Argument::RecordPointer(
            value.map(Record::from_serialize).transpose()?,
        ))
    }

    /// The nil scalar.
    pub fn nil() -> Self {
        Argument::Scalar(Value::Nil)
    }

    /// The record exposed to `.Field` access, if this argument has one.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Argument::Record(record) | Argument::RecordPointer(Some(record)) => Some(record),
            _ => None,
        }
    }

    /// The value a placeholder for this argument resolves to.
    pub fn value(&self) -> Value {
        match self {
            Argument::Scalar(value) => value.clone(),
            Argument::Named(named) => Value::Map(named.entries.clone()),
            Argument::Record(record) | Argument::RecordPointer(Some(record)) => {
                Value::Record(record.clone())
            }
            Argument::RecordPointer(None) => Value::Nil,
        }
    }
}

/// Default text used when appending unused arguments.
///
/// A present pointer is shown with a leading `&`.
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::RecordPointer(Some(record)) => write!(f, "&{}", record),
            other => write!(f, "{}", other.value()),
        }
    }
}

macro_rules! argument_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Argument::classify(Value::from(value))
                }
            }
        )*
    };
}

argument_from_value!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, &str, String, Record
);

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::classify(value)
    }
}

impl From<Option<Record>> for Argument {
    fn from(record: Option<Record>) -> Self {
        Argument::RecordPointer(record)
    }
}

impl From<Named> for Argument {
    fn from(named: Named) -> Self {
        Argument::Named(named)
    }
}

/// Builds a `Vec<Argument>` from a list of expressions.
///
/// ```rust
/// use bracefmt::{args, format};
///
/// assert_eq!(format("{p1} {p0}", &args!["c", 3]).unwrap(), "3 c");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Argument>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Argument::from($arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_classify() {
        assert!(matches!(Argument::from(3), Argument::Scalar(Value::Int(3))));
        assert!(matches!(
            Argument::from(Record::new().field("X", 1)),
            Argument::Record(_)
        ));
        assert!(matches!(
            Argument::from(Named::new().with("a", 1)),
            Argument::Named(_)
        ));
        assert!(matches!(
            Argument::classify(Value::Map(BTreeMap::new())),
            Argument::Named(_)
        ));
    }

    #[test]
    fn test_from_serialize_struct_is_record() {
        let arg = Argument::from_serialize(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(arg.record().map(|r| r.to_string()), Some("{1 2}".into()));
    }

    #[test]
    fn test_from_serialize_map_is_named() {
        let arg = Argument::from_serialize(&HashMap::from([("x", 1)])).unwrap();
        assert!(matches!(arg, Argument::Named(_)));
        assert!(arg.record().is_none());
    }

    #[test]
    fn test_nil_pointer_is_not_a_record() {
        let arg = Argument::pointer::<Point>(None).unwrap();
        assert!(arg.record().is_none());
        assert_eq!(arg.value(), Value::Nil);
        assert_eq!(arg.to_string(), "<nil>");
    }

    #[test]
    fn test_pointer_display() {
        let arg = Argument::pointer(Some(&Point { x: 2, y: 3 })).unwrap();
        assert_eq!(arg.to_string(), "&{2 3}");
        assert_eq!(arg.value().to_string(), "{2 3}");
    }

    #[test]
    fn test_args_macro() {
        let args = args![1, "two", 3.5, true, Argument::nil()];
        assert_eq!(args.len(), 5);
        assert_eq!(args[4].to_string(), "<nil>");
        assert!(args![].is_empty());
    }
}
