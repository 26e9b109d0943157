//! Query results: rows of named node columns.

use tracing::warn;

use crate::entity::NodeEntity;
use crate::error::{MapperError, MapperResult};
use crate::property::PropertyMap;

/// A node as returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    id: i64,
    labels: Vec<String>,
    properties: PropertyMap,
}

impl NodeRecord {
    pub fn new(id: i64, labels: Vec<String>, properties: PropertyMap) -> Self {
        Self { id, labels, properties }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn into_properties(self) -> PropertyMap {
        self.properties
    }

    pub(crate) fn replace_properties(&mut self, properties: PropertyMap) {
        self.properties = properties;
    }
}

/// One result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, NodeRecord)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node column to the row.
    pub fn with_node(mut self, column: impl Into<String>, node: NodeRecord) -> Self {
        self.columns.push((column.into(), node));
        self
    }

    pub fn get(&self, column: &str) -> Option<&NodeRecord> {
        self.columns.iter().find(|(c, _)| c == column).map(|(_, n)| n)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(c, _)| c.as_str())
    }
}

/// Buffered rows of an executed statement.
///
/// Also the opaque handle returned by overwrites, which carry no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    records: Vec<Record>,
}

impl QueryResult {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// The node in `column` of the only row, if any.
    ///
    /// No rows is `Ok(None)`; more than one row is a cardinality error, since
    /// an id match resolves to at most one node.
    pub fn single_node(&self, column: &str, node_id: i64) -> MapperResult<Option<&NodeRecord>> {
        match self.records.as_slice() {
            [] => Ok(None),
            [row] => row
                .get(column)
                .map(Some)
                .ok_or_else(|| MapperError::MissingColumn(column.to_string())),
            rows => {
                warn!(node_id, rows = rows.len(), "Id match returned more than one row");
                Err(MapperError::Cardinality {
                    node_id,
                    count: rows.len(),
                })
            }
        }
    }

    /// Map the node in `column` of every row onto `T`.
    pub fn entities<T: NodeEntity>(&self, column: &str) -> MapperResult<Vec<T>> {
        self.records
            .iter()
            .map(|row| {
                let node = row
                    .get(column)
                    .ok_or_else(|| MapperError::MissingColumn(column.to_string()))?;
                T::from_record(node)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValue;

    fn node(id: i64, name: &str) -> NodeRecord {
        let props: PropertyMap = vec![("name", PropertyValue::from(name))].into_iter().collect();
        NodeRecord::new(id, vec!["Person".to_string()], props)
    }

    #[test]
    fn test_single_node_empty() {
        let result = QueryResult::empty();
        assert_eq!(result.single_node("node", 1).unwrap(), None);
    }

    #[test]
    fn test_single_node_one_row() {
        let result = QueryResult::new(vec![Record::new().with_node("node", node(1, "Ann"))]);
        let found = result.single_node("node", 1).unwrap().unwrap();
        assert_eq!(found.id(), 1);
        assert_eq!(found.labels(), ["Person".to_string()]);
    }

    #[test]
    fn test_single_node_many_rows() {
        let result = QueryResult::new(vec![
            Record::new().with_node("node", node(1, "Ann")),
            Record::new().with_node("node", node(1, "Ann")),
        ]);
        let err = result.single_node("node", 1).unwrap_err();
        assert!(matches!(err, MapperError::Cardinality { node_id: 1, count: 2 }));
        assert!(err.to_string().contains("Expected exactly one result"));
    }

    #[test]
    fn test_single_node_missing_column() {
        let result = QueryResult::new(vec![Record::new().with_node("n", node(1, "Ann"))]);
        let err = result.single_node("node", 1).unwrap_err();
        assert!(matches!(err, MapperError::MissingColumn(ref c) if c == "node"));
    }

    #[test]
    fn test_entities_maps_every_row() {
        #[derive(Debug, serde::Serialize, serde::Deserialize)]
        struct Person {
            id: Option<i64>,
            name: String,
        }

        impl NodeEntity for Person {
            fn node_id(&self) -> Option<i64> {
                self.id
            }

            fn set_node_id(&mut self, id: i64) {
                self.id = Some(id);
            }
        }

        let result = QueryResult::new(vec![
            Record::new().with_node("node", node(1, "Ann")),
            Record::new().with_node("node", node(2, "Bob")),
        ]);
        let people: Vec<Person> = result.entities("node").unwrap();

        assert_eq!(people.len(), 2);
        assert_eq!(people[1].id, Some(2));
        assert_eq!(people[1].name, "Bob");
    }
}
