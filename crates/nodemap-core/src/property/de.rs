//! Serde deserializer from property values back into entities.

use std::fmt;

use serde::de::value::{self, MapDeserializer, SeqDeserializer};
use serde::de::{
    self, DeserializeOwned, Deserializer, IntoDeserializer, SeqAccess, Unexpected, Visitor,
};
use serde::forward_to_deserialize_any;

use super::{PropertyMap, PropertyValue};
use crate::error::MapperResult;

pub(super) fn from_property_map<T: DeserializeOwned>(map: PropertyMap) -> MapperResult<T> {
    let mut access = MapDeserializer::<_, value::Error>::new(map.into_iter());
    let entity = T::deserialize(value::MapAccessDeserializer::new(&mut access))?;
    access.end()?;
    Ok(entity)
}

impl<'de> Deserializer<'de> for PropertyValue {
    type Error = value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            PropertyValue::Null => visitor.visit_unit(),
            PropertyValue::Boolean(b) => visitor.visit_bool(b),
            PropertyValue::Integer(i) => visitor.visit_i64(i),
            PropertyValue::Float(f) => visitor.visit_f64(f),
            PropertyValue::String(s) => visitor.visit_string(s),
            PropertyValue::List(items) => {
                let mut seq = SeqDeserializer::<_, value::Error>::new(items.into_iter());
                let list = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(list)
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            PropertyValue::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self {
            PropertyValue::String(variant) => {
                let variant: value::StringDeserializer<value::Error> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            _ => Err(de::Error::invalid_type(
                Unexpected::Other("non-string property"),
                &"a unit variant name",
            )),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, value::Error> for PropertyValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> de::Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PropertyValueVisitor)
    }
}

struct PropertyValueVisitor;

impl<'de> Visitor<'de> for PropertyValueVisitor {
    type Value = PropertyValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a storable node property")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<PropertyValue, E> {
        Ok(PropertyValue::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PropertyValue, E> {
        Ok(PropertyValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PropertyValue, E> {
        i64::try_from(v)
            .map(PropertyValue::Integer)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<PropertyValue, E> {
        Ok(PropertyValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PropertyValue, E> {
        Ok(PropertyValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<PropertyValue, E> {
        Ok(PropertyValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<PropertyValue, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<PropertyValue, E> {
        Ok(PropertyValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<PropertyValue, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PropertyValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(PropertyValue::List(items))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    enum Status {
        Active,
        Suspended,
    }

    #[derive(Debug, Deserialize)]
    struct Profile {
        status: Status,
        nickname: Option<String>,
        tags: Vec<String>,
        #[serde(default)]
        visits: u32,
    }

    #[test]
    fn test_profile_from_properties() {
        let map: PropertyMap = vec![
            ("status", PropertyValue::from("Suspended")),
            ("tags", PropertyValue::from(vec!["x", "y"])),
            ("legacy", PropertyValue::Boolean(true)),
        ]
        .into_iter()
        .collect();

        let profile: Profile = from_property_map(map).unwrap();
        assert_eq!(profile.status, Status::Suspended);
        assert_eq!(profile.nickname, None);
        assert_eq!(profile.tags, vec!["x", "y"]);
        assert_eq!(profile.visits, 0);
    }

    #[test]
    fn test_wrong_type_reports_field_value() {
        let map: PropertyMap = vec![
            ("status", PropertyValue::from("Active")),
            ("tags", PropertyValue::Integer(3)),
        ]
        .into_iter()
        .collect();

        let err = from_property_map::<Profile>(map).unwrap_err();
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_property_value_from_deserializer() {
        let list = PropertyValue::List(vec![PropertyValue::Float(f64::NAN)]);
        let copy = PropertyValue::deserialize(list).unwrap();
        assert!(matches!(&copy, PropertyValue::List(items)
            if matches!(items[0], PropertyValue::Float(f) if f.is_nan())));
    }
}
