//! Fetch and overwrite operations on any [`GraphSession`].
//!
//! Both operations run one fixed statement each:
//!
//! ```cypher
//! MATCH (node) WHERE id(node) = $p1 RETURN node
//! MATCH (node) WHERE id(node) = $p1 SET node = $p2
//! ```
//!
//! An overwrite is a full replace: properties missing from the entity's
//! property map are removed from the stored node.

use async_trait::async_trait;
use tracing::debug;

use crate::entity::NodeEntity;
use crate::error::{MapperError, MapperResult};
use crate::record::QueryResult;
use crate::session::GraphSession;
use crate::statement::{Statement, NODE_COLUMN};

/// Typed node operations, available on every [`GraphSession`].
#[async_trait]
pub trait NodeSessionExt: GraphSession {
    /// Fetch the node with `node_id` as a `T`.
    ///
    /// Returns `Ok(None)` when no node has that id, and a
    /// [`MapperError::Cardinality`] error if the match yields more than one row.
    async fn get_node<T>(&self, node_id: i64) -> MapperResult<Option<T>>
    where
        T: NodeEntity + Send,
    {
        check_node_id(node_id)?;

        let result = self.run(Statement::get_node(node_id)).await?;
        let entity = result
            .single_node(NODE_COLUMN, node_id)?
            .map(T::from_record)
            .transpose()?;

        debug!(node_id, found = entity.is_some(), "Fetched node");
        Ok(entity)
    }

    /// Like [`get_node`](Self::get_node), but a missing node is a
    /// [`MapperError::NodeNotFound`] error.
    async fn require_node<T>(&self, node_id: i64) -> MapperResult<T>
    where
        T: NodeEntity + Send,
    {
        self.get_node(node_id)
            .await?
            .ok_or(MapperError::NodeNotFound(node_id))
    }

    /// Replace the properties of the entity's node with the entity's fields.
    ///
    /// Fails with [`MapperError::NodeIdUnspecified`] before touching the
    /// session when the entity carries no node id.
    async fn set_node<T>(&self, entity: &T) -> MapperResult<QueryResult>
    where
        T: NodeEntity + Sync,
    {
        let node_id = entity.node_id().ok_or(MapperError::NodeIdUnspecified)?;
        check_node_id(node_id)?;

        let properties = entity.to_properties()?;
        let count = properties.len();

        let result = self.run(Statement::set_node(node_id, properties)).await?;

        debug!(node_id, properties = count, "Overwrote node properties");
        Ok(result)
    }
}

impl<S: GraphSession + ?Sized> NodeSessionExt for S {}

fn check_node_id(node_id: i64) -> MapperResult<()> {
    if node_id < 0 {
        return Err(MapperError::InvalidNodeId(node_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::memory::MemorySession;
    use crate::property::{PropertyMap, PropertyValue};
    use crate::record::{NodeRecord, Record};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Person {
        id: Option<i64>,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        age: Option<i64>,
    }

    impl NodeEntity for Person {
        fn node_id(&self) -> Option<i64> {
            self.id
        }

        fn set_node_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    /// Session that counts calls and always fails.
    #[derive(Default)]
    struct UnreachableSession {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GraphSession for UnreachableSession {
        async fn run(&self, _statement: Statement) -> MapperResult<QueryResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MapperError::session(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    /// Session that answers every statement with the same rows.
    struct FixedSession(QueryResult);

    #[async_trait]
    impl GraphSession for FixedSession {
        async fn run(&self, _statement: Statement) -> MapperResult<QueryResult> {
            Ok(self.0.clone())
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn bob_props() -> PropertyMap {
        vec![("name", PropertyValue::from("Bob")), ("age", PropertyValue::from(30i64))]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_get_node_existing() {
        init_tracing();
        let session = MemorySession::new();
        let id = session.create_node(&["Person"], bob_props());

        let person: Person = session.get_node(id).await.unwrap().unwrap();
        assert_eq!(
            person,
            Person {
                id: Some(id),
                name: "Bob".to_string(),
                age: Some(30),
            }
        );
    }

    #[tokio::test]
    async fn test_get_node_missing_is_none() {
        let session = MemorySession::new();
        let person: Option<Person> = session.get_node(404).await.unwrap();
        assert!(person.is_none());
    }

    #[tokio::test]
    async fn test_require_node_missing() {
        let session = MemorySession::new();
        let err = session.require_node::<Person>(404).await.unwrap_err();
        assert!(matches!(err, MapperError::NodeNotFound(404)));
    }

    #[tokio::test]
    async fn test_get_node_many_rows() {
        let node = NodeRecord::new(5, Vec::new(), bob_props());
        let session = FixedSession(QueryResult::new(vec![
            Record::new().with_node("node", node.clone()),
            Record::new().with_node("node", node),
        ]));

        let err = session.get_node::<Person>(5).await.unwrap_err();
        assert!(matches!(err, MapperError::Cardinality { node_id: 5, count: 2 }));
    }

    #[tokio::test]
    async fn test_set_node_full_replace() {
        init_tracing();
        let session = MemorySession::new();
        let id = session.create_node(&["Person"], bob_props());

        let carol = Person {
            id: Some(id),
            name: "Carol".to_string(),
            age: None,
        };
        let result = session.set_node(&carol).await.unwrap();
        assert!(result.is_empty());

        let stored = session.node(id).unwrap();
        assert_eq!(stored.properties().keys().collect::<Vec<_>>(), vec!["name"]);
        assert!(!stored.properties().contains_key("age"));

        let fetched: Person = session.require_node(id).await.unwrap();
        assert_eq!(fetched, carol);
    }

    #[tokio::test]
    async fn test_set_node_round_trip_matches_serialized_fields() {
        let session = MemorySession::new();
        let id = session.create_node(&["Person"], PropertyMap::new());

        let ann = Person {
            id: Some(id),
            name: "Ann".to_string(),
            age: Some(41),
        };
        session.set_node(&ann).await.unwrap();

        let stored = session.node(id).unwrap();
        assert_eq!(stored.properties(), &ann.to_properties().unwrap());
        assert_eq!(session.get_node::<Person>(id).await.unwrap(), Some(ann));
    }

    #[tokio::test]
    async fn test_set_node_without_id_skips_session() {
        let session = UnreachableSession::default();
        let ann = Person {
            id: None,
            name: "Ann".to_string(),
            age: None,
        };

        let err = session.set_node(&ann).await.unwrap_err();
        assert!(matches!(err, MapperError::NodeIdUnspecified));
        assert!(err.to_string().contains("not specified or the Node Id is null"));
        assert_eq!(session.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_negative_id_skips_session() {
        let session = UnreachableSession::default();

        let err = session.get_node::<Person>(-1).await.unwrap_err();
        assert!(matches!(err, MapperError::InvalidNodeId(-1)));

        let ghost = Person {
            id: Some(-3),
            name: "Ghost".to_string(),
            age: None,
        };
        let err = session.set_node(&ghost).await.unwrap_err();
        assert!(matches!(err, MapperError::InvalidNodeId(-3)));
        assert_eq!(session.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_session_errors_pass_through() {
        let session = UnreachableSession::default();
        let err = session.get_node::<Person>(1).await.unwrap_err();

        let MapperError::Session(source) = err else {
            panic!("expected a session error");
        };
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
        assert_eq!(session.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_set_node_on_missing_node_is_noop() {
        let session = MemorySession::new();
        let ann = Person {
            id: Some(77),
            name: "Ann".to_string(),
            age: None,
        };

        let result = session.set_node(&ann).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(session.node_count(), 0);
    }

    #[tokio::test]
    async fn test_non_finite_floats_survive_overwrite() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Reading {
            id: Option<i64>,
            value: f64,
            ceiling: f64,
        }

        impl NodeEntity for Reading {
            fn node_id(&self) -> Option<i64> {
                self.id
            }

            fn set_node_id(&mut self, id: i64) {
                self.id = Some(id);
            }
        }

        let session = MemorySession::new();
        let id = session.create_node(&["Reading"], PropertyMap::new());
        let reading = Reading {
            id: Some(id),
            value: f64::NAN,
            ceiling: f64::INFINITY,
        };
        session.set_node(&reading).await.unwrap();

        let stored = session.node(id).unwrap();
        assert_eq!(stored.properties().len(), 2);

        let fetched: Reading = session.require_node(id).await.unwrap();
        assert!(fetched.value.is_nan());
        assert_eq!(fetched.ceiling, f64::INFINITY);
    }
}
