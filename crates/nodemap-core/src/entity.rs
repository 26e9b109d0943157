//! The node identity capability implemented by mapped entities.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::MapperResult;
use crate::property::PropertyMap;
use crate::record::NodeRecord;

/// An application type stored as a single graph node.
///
/// Exactly one field carries the database-assigned node id. It is `None`
/// until the entity has been associated with a stored node.
///
/// ```
/// use nodemap_core::NodeEntity;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Person {
///     id: Option<i64>,
///     name: String,
/// }
///
/// impl NodeEntity for Person {
///     fn node_id(&self) -> Option<i64> {
///         self.id
///     }
///
///     fn set_node_id(&mut self, id: i64) {
///         self.id = Some(id);
///     }
/// }
/// ```
pub trait NodeEntity: Serialize + DeserializeOwned {
    /// Serialized name of the id field. Never written as a node property.
    const ID_FIELD: &'static str = "id";

    fn node_id(&self) -> Option<i64>;

    fn set_node_id(&mut self, id: i64);

    /// Property set written onto the node by an overwrite.
    fn to_properties(&self) -> MapperResult<PropertyMap> {
        PropertyMap::from_entity(self)
    }

    /// Build the entity from a fetched node, assigning the node's id.
    fn from_record(record: &NodeRecord) -> MapperResult<Self> {
        let mut fields = record.properties().clone();
        fields.insert(Self::ID_FIELD, record.id());

        let mut entity: Self = fields.deserialize_into()?;
        entity.set_node_id(record.id());
        Ok(entity)
    }
}
