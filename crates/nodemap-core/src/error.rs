//! Centralized error types for nodemap.

use thiserror::Error;

/// Message carried by [`MapperError::NodeIdUnspecified`].
pub const NODE_ID_UNSPECIFIED_MESSAGE: &str = "NodeId not specified or the Node Id is null";

/// Boxed upstream error, kept intact so callers can downcast to the driver type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for node mapping operations.
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("{}", NODE_ID_UNSPECIFIED_MESSAGE)]
    NodeIdUnspecified,

    #[error("Invalid node id: {0} (node ids are non-negative)")]
    InvalidNodeId(i64),

    #[error("Expected exactly one result for node {node_id}, got {count}")]
    Cardinality { node_id: i64, count: usize },

    #[error("Node not found: {0}")]
    NodeNotFound(i64),

    #[error("Result row has no node column '{0}'")]
    MissingColumn(String),

    #[error("Property '{field}' cannot be stored on a node: {reason}")]
    UnsupportedProperty { field: String, reason: String },

    #[error("Entity did not serialize to a map of properties")]
    NotAMap,

    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    #[error("Mapping error: {0}")]
    Mapping(#[from] serde::de::value::Error),

    #[error("Failed to read node column '{column}': {source}")]
    ColumnRead {
        column: String,
        #[source]
        source: BoxError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(#[source] BoxError),
}

/// Result type for node mapping operations.
pub type MapperResult<T> = Result<T, MapperError>;

impl MapperError {
    /// Wrap an upstream driver or query error without translating it.
    pub fn session<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Session(Box::new(err))
    }

    /// A row column that exists but does not decode as a node.
    pub fn column_read<E>(column: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ColumnRead {
            column: column.into(),
            source: Box::new(err),
        }
    }

    /// Create an unsupported property error.
    pub fn unsupported(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedProperty {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
