//! Fixed Cypher statements and their parameters.

use crate::property::PropertyMap;

/// Match a node by internal id and return it.
pub const GET_NODE_STATEMENT: &str = "MATCH (node) WHERE id(node) = $p1 RETURN node";

/// Match a node by internal id and replace its whole property set.
pub const SET_NODE_STATEMENT: &str = "MATCH (node) WHERE id(node) = $p1 SET node = $p2";

/// Column the fetch statement returns the node under.
pub const NODE_COLUMN: &str = "node";

/// The `{p1, p2?}` parameter pair shared by both statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// Node id to match.
    pub p1: i64,
    /// Replacement property set; only present for overwrites.
    pub p2: Option<PropertyMap>,
}

/// A statement ready to run against a [`GraphSession`](crate::GraphSession).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: &'static str,
    parameters: Parameters,
    returns: Option<&'static str>,
}

impl Statement {
    /// Fetch statement for `node_id`.
    pub fn get_node(node_id: i64) -> Self {
        Self {
            text: GET_NODE_STATEMENT,
            parameters: Parameters { p1: node_id, p2: None },
            returns: Some(NODE_COLUMN),
        }
    }

    /// Overwrite statement replacing the properties of `node_id` with `properties`.
    pub fn set_node(node_id: i64, properties: PropertyMap) -> Self {
        Self {
            text: SET_NODE_STATEMENT,
            parameters: Parameters {
                p1: node_id,
                p2: Some(properties),
            },
            returns: None,
        }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Node column produced by the statement, `None` for writes.
    pub fn returns(&self) -> Option<&'static str> {
        self.returns
    }

    pub fn is_write(&self) -> bool {
        self.returns.is_none()
    }
}
