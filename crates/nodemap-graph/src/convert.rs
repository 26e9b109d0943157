//! Conversion between nodemap values and Bolt values.

use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, Node, Query};

use nodemap_core::{MapperError, MapperResult, NodeRecord, PropertyMap, PropertyValue, Statement};

/// Build a driver query from a statement and its `p1`/`p2` parameters.
pub fn to_query(statement: &Statement) -> Query {
    let params = statement.parameters();
    let query = Query::new(statement.text().to_string()).param("p1", params.p1);

    match &params.p2 {
        Some(properties) => query.param("p2", BoltType::Map(to_bolt_map(properties))),
        None => query,
    }
}

pub fn to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::Null => BoltType::Null(BoltNull),
        PropertyValue::Boolean(b) => BoltType::from(*b),
        PropertyValue::Integer(i) => BoltType::from(*i),
        PropertyValue::Float(f) => BoltType::from(*f),
        PropertyValue::String(s) => BoltType::from(s.as_str()),
        PropertyValue::List(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(to_bolt(item));
            }
            BoltType::List(list)
        }
    }
}

pub fn to_bolt_map(properties: &PropertyMap) -> BoltMap {
    let mut map = BoltMap::new();
    for (key, value) in properties.iter() {
        map.put(BoltString::from(key), to_bolt(value));
    }
    map
}

/// Read a driver node into a [`NodeRecord`].
pub fn node_record(node: &Node) -> MapperResult<NodeRecord> {
    let mut properties = PropertyMap::new();
    for key in node.keys() {
        let value: PropertyValue = node.get(key).map_err(MapperError::session)?;
        properties.insert(key, value);
    }

    let labels = node.labels().into_iter().map(str::to_string).collect();
    Ok(NodeRecord::new(node.id(), labels, properties))
}
