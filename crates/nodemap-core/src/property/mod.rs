//! Node property maps.
//!
//! A [`PropertyMap`] is the replacement value-set written onto a node by an
//! overwrite, and the value-set read back when a node is fetched. Only values a
//! graph node can actually store are representable: scalars and flat lists of
//! scalars.
//!
//! Entities go to and from property maps through serde directly, so every
//! `f64` (NaN and infinities included) survives the round trip.

mod de;
mod ser;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entity::NodeEntity;
use crate::error::{MapperError, MapperResult};

use self::ser::{Shape, ShapeSerializer};

/// A single storable property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered mapping from property name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Serialize an entity into the property map written by an overwrite.
    ///
    /// The entity's id field is excluded and null fields are dropped, since a
    /// node stores no null properties. Nested maps, nested lists and integers
    /// outside the `i64` range are rejected.
    pub fn from_entity<T: NodeEntity>(entity: &T) -> MapperResult<Self> {
        let Shape::Map(fields) = entity.serialize(ShapeSerializer)? else {
            return Err(MapperError::NotAMap);
        };

        Ok(fields
            .into_iter()
            .filter(|(name, value)| name != T::ID_FIELD && !value.is_null())
            .collect())
    }

    /// Deserialize the map into `T`, field by field.
    pub fn deserialize_into<T: DeserializeOwned>(self) -> MapperResult<T> {
        de::from_property_map(self)
    }

    /// Insert a value, returning the previous one stored under `key`.
    /// Re-inserting an existing key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for PropertyMap {
    type Item = (String, PropertyValue);
    type IntoIter = std::vec::IntoIter<(String, PropertyValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
