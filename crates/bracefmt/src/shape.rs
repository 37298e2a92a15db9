//! Top-level shape of a serializable value.
//!
//! JSON erases the difference between a struct and a string-keyed map, but
//! the two bind differently: a struct is a record, a map supplies named
//! placeholders. [`shape_of`] drives `Serialize` just far enough to see which
//! entry point the type calls, without visiting any field or element.

use serde::ser::{self, Serialize, Serializer};

/// What a value looks like to serde at its outermost level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// `serialize_map`: `HashMap`, `BTreeMap` and other keyed collections.
    Map,
    /// `serialize_struct` or `serialize_struct_variant`.
    Struct,
    Other,
}

/// Returns the outermost shape of `value`, looking through `Option` and
/// newtype wrappers.
pub(crate) fn shape_of<T: Serialize + ?Sized>(value: &T) -> Shape {
    value.serialize(ShapeSerializer).unwrap_or(Shape::Other)
}

struct ShapeSerializer;

/// Compound serializer that ignores its contents and reports a fixed shape.
struct Skip(Shape);

type Error = serde_json::Error;

macro_rules! scalar_shapes {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, _: $ty) -> Result<Shape, Error> {
                Ok(Shape::Other)
            }
        )*
    };
}

impl Serializer for ShapeSerializer {
    type Ok = Shape;
    type Error = Error;
    type SerializeSeq = Skip;
    type SerializeTuple = Skip;
    type SerializeTupleStruct = Skip;
    type SerializeTupleVariant = Skip;
    type SerializeMap = Skip;
    type SerializeStruct = Skip;
    type SerializeStructVariant = Skip;

    scalar_shapes! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
        serialize_unit_struct: &'static str,
    }

    fn serialize_none(self) -> Result<Shape, Error> {
        Ok(Shape::Other)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Shape, Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Shape, Error> {
        Ok(Shape::Other)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<Shape, Error> {
        Ok(Shape::Other)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Shape, Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Shape, Error> {
        Ok(Shape::Other)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Skip, Error> {
        Ok(Skip(Shape::Other))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Skip, Error> {
        Ok(Skip(Shape::Other))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Skip, Error> {
        Ok(Skip(Shape::Other))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Skip, Error> {
        Ok(Skip(Shape::Other))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Skip, Error> {
        Ok(Skip(Shape::Map))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Skip, Error> {
        Ok(Skip(Shape::Struct))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Skip, Error> {
        Ok(Skip(Shape::Struct))
    }
}

macro_rules! skip_compound {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl ser::$trait for Skip {
                type Ok = Shape;
                type Error = Error;

                fn $method<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Error> {
                    Ok(())
                }

                fn end(self) -> Result<Shape, Error> {
                    Ok(self.0)
                }
            }
        )*
    };
}

skip_compound! {
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field,
}

impl ser::SerializeMap for Skip {
    type Ok = Shape;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Error> {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Error> {
        Ok(())
    }

    fn end(self) -> Result<Shape, Error> {
        Ok(self.0)
    }
}

macro_rules! skip_struct {
    ($($trait:ident),*) => {
        $(
            impl ser::$trait for Skip {
                type Ok = Shape;
                type Error = Error;

                fn serialize_field<T: ?Sized + Serialize>(
                    &mut self,
                    _: &'static str,
                    _: &T,
                ) -> Result<(), Error> {
                    Ok(())
                }

                fn end(self) -> Result<Shape, Error> {
                    Ok(self.0)
                }
            }
        )*
    };
}

skip_struct!(SerializeStruct, SerializeStructVariant);

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize)]
    struct Wrapper(HashMap<String, i32>);

    #[test]
    fn test_maps() {
        assert_eq!(shape_of(&HashMap::<String, i32>::new()), Shape::Map);
        assert_eq!(shape_of(&BTreeMap::from([(1, "a")])), Shape::Map);
        assert_eq!(shape_of(&Some(HashMap::from([("k", 1)]))), Shape::Map);
        assert_eq!(shape_of(&Wrapper(HashMap::new())), Shape::Map);
    }

    #[test]
    fn test_structs() {
        assert_eq!(shape_of(&Point { x: 1, y: 2 }), Shape::Struct);
        assert_eq!(shape_of(&Some(Point { x: 1, y: 2 })), Shape::Struct);
    }

    #[test]
    fn test_other() {
        assert_eq!(shape_of(&5), Shape::Other);
        assert_eq!(shape_of("text"), Shape::Other);
        assert_eq!(shape_of(&vec![HashMap::from([("k", 1)])]), Shape::Other);
        assert_eq!(shape_of(&None::<Point>), Shape::Other);
        assert_eq!(shape_of(&(1, 2)), Shape::Other);
    }
}
