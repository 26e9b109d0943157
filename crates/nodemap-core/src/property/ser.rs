//! Serde serializer from entities into property values.

use std::fmt;

use serde::ser::{self, Impossible, Serialize};

use super::{PropertyMap, PropertyValue};
use crate::error::MapperError;

/// Why a value could not become a node property, and for which field.
#[derive(Debug)]
pub(crate) struct SerializeError {
    field: Option<String>,
    reason: String,
}

impl SerializeError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            field: None,
            reason: reason.into(),
        }
    }

    /// Attach the innermost field name only.
    fn in_field(mut self, field: &str) -> Self {
        if self.field.is_none() {
            self.field = Some(field.to_string());
        }
        self
    }
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for SerializeError {}

impl ser::Error for SerializeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }
}

impl From<SerializeError> for MapperError {
    fn from(err: SerializeError) -> Self {
        MapperError::unsupported(err.field.unwrap_or_default(), err.reason)
    }
}

/// A serialized value: a storable scalar/list, or a map of them.
pub(crate) enum Shape {
    Value(PropertyValue),
    Map(PropertyMap),
}

type Result<T> = std::result::Result<T, SerializeError>;

fn value(v: PropertyValue) -> Result<Shape> {
    Ok(Shape::Value(v))
}

fn unsupported<T>(reason: &str) -> Result<T> {
    Err(SerializeError::new(reason))
}

pub(crate) struct ShapeSerializer;

impl ser::Serializer for ShapeSerializer {
    type Ok = Shape;
    type Error = SerializeError;

    type SerializeSeq = ListCollector;
    type SerializeTuple = ListCollector;
    type SerializeTupleStruct = ListCollector;
    type SerializeTupleVariant = Impossible<Shape, SerializeError>;
    type SerializeMap = MapCollector;
    type SerializeStruct = MapCollector;
    type SerializeStructVariant = Impossible<Shape, SerializeError>;

    fn serialize_bool(self, v: bool) -> Result<Shape> {
        value(PropertyValue::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Shape> {
        value(PropertyValue::Integer(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Shape> {
        value(PropertyValue::Integer(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Shape> {
        value(PropertyValue::Integer(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Shape> {
        value(PropertyValue::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Shape> {
        value(PropertyValue::Integer(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Shape> {
        value(PropertyValue::Integer(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Shape> {
        value(PropertyValue::Integer(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Shape> {
        match i64::try_from(v) {
            Ok(i) => value(PropertyValue::Integer(i)),
            Err(_) => Err(SerializeError::new(format!(
                "integer {v} exceeds the 64-bit signed range"
            ))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Shape> {
        value(PropertyValue::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Shape> {
        value(PropertyValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Shape> {
        value(PropertyValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Shape> {
        value(PropertyValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Shape> {
        let bytes = v.iter().map(|b| PropertyValue::Integer(i64::from(*b))).collect();
        value(PropertyValue::List(bytes))
    }

    fn serialize_none(self) -> Result<Shape> {
        value(PropertyValue::Null)
    }

    fn serialize_some<T>(self, v: &T) -> Result<Shape>
    where
        T: ?Sized + Serialize,
    {
        v.serialize(self)
    }

    fn serialize_unit(self) -> Result<Shape> {
        value(PropertyValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Shape> {
        value(PropertyValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Shape> {
        value(PropertyValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, v: &T) -> Result<Shape>
    where
        T: ?Sized + Serialize,
    {
        v.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Shape>
    where
        T: ?Sized + Serialize,
    {
        unsupported("enum variants with data are not storable")
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListCollector> {
        Ok(ListCollector::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<ListCollector> {
        Ok(ListCollector::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<ListCollector> {
        Ok(ListCollector::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        unsupported("enum variants with data are not storable")
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCollector> {
        Ok(MapCollector::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapCollector> {
        Ok(MapCollector::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        unsupported("enum variants with data are not storable")
    }
}

/// Collects list elements; each must be a non-null scalar.
pub(crate) struct ListCollector {
    items: Vec<PropertyValue>,
}

impl ListCollector {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, element: &T) -> Result<()> {
        match element.serialize(ShapeSerializer)? {
            Shape::Value(PropertyValue::Null) => unsupported("lists cannot contain null"),
            Shape::Value(PropertyValue::List(_)) | Shape::Map(_) => {
                unsupported("nested collections are not storable")
            }
            Shape::Value(v) => {
                self.items.push(v);
                Ok(())
            }
        }
    }

    fn finish(self) -> Result<Shape> {
        value(PropertyValue::List(self.items))
    }
}

impl ser::SerializeSeq for ListCollector {
    type Ok = Shape;
    type Error = SerializeError;

    fn serialize_element<T>(&mut self, element: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(element)
    }

    fn end(self) -> Result<Shape> {
        self.finish()
    }
}

impl ser::SerializeTuple for ListCollector {
    type Ok = Shape;
    type Error = SerializeError;

    fn serialize_element<T>(&mut self, element: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(element)
    }

    fn end(self) -> Result<Shape> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for ListCollector {
    type Ok = Shape;
    type Error = SerializeError;

    fn serialize_field<T>(&mut self, element: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(element)
    }

    fn end(self) -> Result<Shape> {
        self.finish()
    }
}

/// Collects struct fields or string-keyed map entries, in order.
pub(crate) struct MapCollector {
    map: PropertyMap,
    pending_key: Option<String>,
}

impl MapCollector {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            map: PropertyMap::with_capacity(capacity),
            pending_key: None,
        }
    }

    fn field<T: ?Sized + Serialize>(&mut self, key: String, v: &T) -> Result<()> {
        match v.serialize(ShapeSerializer).map_err(|e| e.in_field(&key))? {
            Shape::Value(v) => {
                self.map.insert(key, v);
                Ok(())
            }
            Shape::Map(_) => {
                Err(SerializeError::new("nested maps are not storable").in_field(&key))
            }
        }
    }
}

impl ser::SerializeMap for MapCollector {
    type Ok = Shape;
    type Error = SerializeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ShapeSerializer)? {
            Shape::Value(PropertyValue::String(key)) => {
                self.pending_key = Some(key);
                Ok(())
            }
            _ => unsupported("property names must be strings"),
        }
    }

    fn serialize_value<T>(&mut self, v: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| SerializeError::new("map value serialized before its key"))?;
        self.field(key, v)
    }

    fn end(self) -> Result<Shape> {
        Ok(Shape::Map(self.map))
    }
}

impl ser::SerializeStruct for MapCollector {
    type Ok = Shape;
    type Error = SerializeError;

    fn serialize_field<T>(&mut self, key: &'static str, v: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key.to_string(), v)
    }

    fn end(self) -> Result<Shape> {
        Ok(Shape::Map(self.map))
    }
}
