//! In-process session backed by a node map.
//!
//! Understands the fetch and overwrite statements only. Node ids are assigned
//! sequentially from zero, mirroring a fresh database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{MapperError, MapperResult};
use crate::property::PropertyMap;
use crate::record::{NodeRecord, QueryResult, Record};
use crate::session::GraphSession;
use crate::statement::{Statement, GET_NODE_STATEMENT, NODE_COLUMN, SET_NODE_STATEMENT};

#[derive(Debug, Default)]
struct MemoryGraph {
    next_id: i64,
    nodes: BTreeMap<i64, NodeRecord>,
}

/// A [`GraphSession`] holding its nodes in memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    graph: Mutex<MemoryGraph>,
    statements_run: AtomicUsize,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new node and return its id. Null properties are not stored.
    pub fn create_node(&self, labels: &[&str], properties: PropertyMap) -> i64 {
        let mut graph = self.lock();
        let id = graph.next_id;
        graph.next_id += 1;

        let labels = labels.iter().map(|l| l.to_string()).collect();
        graph.nodes.insert(id, NodeRecord::new(id, labels, without_nulls(properties)));
        id
    }

    /// Snapshot of the stored node with `id`.
    pub fn node(&self, id: i64) -> Option<NodeRecord> {
        self.lock().nodes.get(&id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Number of statements this session has executed.
    pub fn statements_run(&self) -> usize {
        self.statements_run.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl GraphSession for MemorySession {
    async fn run(&self, statement: Statement) -> MapperResult<QueryResult> {
        self.statements_run.fetch_add(1, Ordering::SeqCst);
        let params = statement.parameters();

        match statement.text() {
            GET_NODE_STATEMENT => {
                let graph = self.lock();
                let records: Vec<Record> = graph
                    .nodes
                    .get(&params.p1)
                    .map(|node| Record::new().with_node(NODE_COLUMN, node.clone()))
                    .into_iter()
                    .collect();
                debug!(node_id = params.p1, rows = records.len(), "Memory fetch");
                Ok(QueryResult::new(records))
            }
            SET_NODE_STATEMENT => {
                let properties = params.p2.clone().unwrap_or_default();
                let mut graph = self.lock();
                // SET on an unmatched id touches nothing.
                if let Some(node) = graph.nodes.get_mut(&params.p1) {
                    node.replace_properties(without_nulls(properties));
                }
                debug!(node_id = params.p1, "Memory overwrite");
                Ok(QueryResult::empty())
            }
            other => Err(MapperError::UnsupportedStatement(other.to_string())),
        }
    }
}

fn without_nulls(properties: PropertyMap) -> PropertyMap {
    properties.into_iter().filter(|(_, v)| !v.is_null()).collect()
}
