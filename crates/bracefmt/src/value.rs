//! Runtime values flowing through template pipelines.
//!
//! The [`Value`] enum is what placeholders resolve to, what functions receive
//! and return, and what finally gets printed. Its [`Display`](fmt::Display)
//! implementation is the default textual representation used both for
//! template output and for appending unused arguments:
//!
//! | Value | Text |
//! |-------|------|
//! | `Nil` | `<nil>` |
//! | `Record` | `{4 dir/file}` |
//! | `Map` | `map[a:1 b:2]` |
//! | `List` | `[1 2 3]` |
//!
//! Values can be built from any `Serialize` type with
//! [`Value::from_serialize`]; serialized structs become [`Record`]s with their
//! field order preserved, while a top-level map such as a `HashMap` becomes a
//! [`Value::Map`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{FormatError, Result};
use crate::shape::{shape_of, Shape};

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// String-keyed mapping, printed in key order.
    Map(BTreeMap<String, Value>),
    /// Structured value with ordered named fields.
    Record(Record),
    /// Point in time, produced by `now`.
    Time(DateTime<Local>),
}

impl Value {
    /// Converts any serializable value.
    ///
    /// A derived struct becomes a record that keeps its field names and
    /// declaration order. A map at the top level becomes a `Map` with its keys
    /// as strings; maps nested deeper are records like any other object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = to_json(value)?;
        match (shape_of(value), json) {
            (Shape::Map, serde_json::Value::Object(map)) => Ok(Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            )),
            (_, json) => Ok(Self::from_json(json)),
        }
    }

    /// Converts a JSON value. Objects become records.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Record(Record {
                fields: map
                    .into_iter()
                    .map(|(name, value)| (name, Value::from_json(value)))
                    .collect(),
            }),
        }
    }

    /// Returns `true` if this is `Nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the string slice if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the time if this is a `Time`.
    pub fn as_time(&self) -> Option<&DateTime<Local>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Time(_) => "time",
        }
    }

    /// Text with record field names included, e.g. `{Value:3 Message:text}`.
    pub fn to_field_string(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = write_value(&mut out, self, true);
        out
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| FormatError::expression(format!("cannot convert value: {}", e)))
}

fn write_value(out: &mut impl fmt::Write, value: &Value, field_names: bool) -> fmt::Result {
    match value {
        Value::Nil => out.write_str("<nil>"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Int(i) => write!(out, "{}", i),
        Value::Float(x) => write!(out, "{}", x),
        Value::Str(s) => out.write_str(s),
        Value::Time(t) => write!(out, "{}", t.format("%Y-%m-%d %H:%M:%S%.f %z")),
        Value::List(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write_value(out, item, field_names)?;
            }
            out.write_char(']')
        }
        Value::Map(map) => {
            out.write_str("map[")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write!(out, "{}:", key)?;
                write_value(out, item, field_names)?;
            }
            out.write_char(']')
        }
        Value::Record(record) => write_record(out, record, field_names),
    }
}

fn write_record(out: &mut impl fmt::Write, record: &Record, field_names: bool) -> fmt::Result {
    out.write_char('{')?;
    for (i, (name, item)) in record.fields.iter().enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        if field_names {
            write!(out, "{}:", name)?;
        }
        write_value(out, item, field_names)?;
    }
    out.write_char('}')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, false)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Time(t) => serializer.serialize_str(&t.to_rfc3339()),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key, item)?;
                }
                out.end()
            }
            Value::Record(record) => record.serialize(serializer),
        }
    }
}

/// A structured value with ordered, named fields.
///
/// Fields are reachable from templates through `.Field` access.
///
/// ```rust
/// use bracefmt::Record;
///
/// let point = Record::new().field("X", 4).field("Y", 1);
/// assert_eq!(point.to_string(), "{4 1}");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any existing field of the same name in place.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Converts a serializable struct into a record.
    ///
    /// Fails if the value does not serialize to an object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        match Value::from_json(to_json(value)?) {
            Value::Record(record) => Ok(record),
            other => Err(FormatError::expression(format!(
                "cannot use {} value as a record",
                other.type_name()
            ))),
        }
    }

    /// Looks up a field by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterates fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_record(f, self, false)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            out.serialize_entry(name, value)?;
        }
        out.end()
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(v as i64)
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Value::Float(v as f64), Value::Int)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::from(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl From<DateTime<Local>> for Value {
    fn from(v: DateTime<Local>) -> Self {
        Value::Time(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
