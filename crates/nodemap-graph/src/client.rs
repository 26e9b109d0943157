//! Neo4j session over a `neo4rs` connection pool.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Node, Query, Row};
use tracing::{debug, info};

use nodemap_core::blocking::current_thread_runtime;
use nodemap_core::{
    BlockingSession, GraphSession, MapperError, MapperResult, QueryResult, Record, Statement,
};

use crate::config::GraphConfig;
use crate::convert;

/// A [`GraphSession`] executing statements against Neo4j.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// `Graph::connect` only builds the pool; the `RETURN 1` ping forces a real
    /// bolt handshake so an unreachable server fails here instead of on first use.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Connect using `NEO4J_*` environment variables over the defaults.
    pub async fn connect_from_env() -> Result<Self> {
        Self::connect(&GraphConfig::from_env()).await
    }

    /// Connect on a dedicated runtime and return a blocking session.
    ///
    /// Pool connections are bound to the runtime that opened them, so the
    /// returned session drives the same runtime.
    pub fn connect_blocking(config: &GraphConfig) -> Result<BlockingSession<Self>> {
        let runtime = current_thread_runtime().context("Failed to build blocking runtime")?;
        let client = runtime.block_on(Self::connect(config))?;
        Ok(BlockingSession::with_runtime(client, runtime))
    }

    /// Wrap an already connected pool.
    pub fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }

    /// Get a reference to the underlying neo4rs Graph.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }

    async fn fetch(&self, query: Query, column: &str) -> MapperResult<QueryResult> {
        let mut stream = self.graph.execute(query).await.map_err(MapperError::session)?;

        let mut records = Vec::new();
        while let Some(row) = stream.next().await.map_err(MapperError::session)? {
            let node = node_column(&row, column)?;
            records.push(Record::new().with_node(column, convert::node_record(&node)?));
        }
        Ok(QueryResult::new(records))
    }
}

/// Decode `column` of a driver row as a node, keeping the decode error.
fn node_column(row: &Row, column: &str) -> MapperResult<Node> {
    row.get::<Node>(column).map_err(|err| MapperError::column_read(column, err))
}

#[async_trait]
impl GraphSession for GraphClient {
    async fn run(&self, statement: Statement) -> MapperResult<QueryResult> {
        let node_id = statement.parameters().p1;
        let query = convert::to_query(&statement);

        let result = match statement.returns() {
            Some(column) => self.fetch(query, column).await?,
            None => {
                self.graph.run(query).await.map_err(MapperError::session)?;
                QueryResult::empty()
            }
        };

        debug!(
            node_id,
            write = statement.is_write(),
            rows = result.len(),
            "Executed statement"
        );
        Ok(result)
    }
}
