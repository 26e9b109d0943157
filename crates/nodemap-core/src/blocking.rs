//! Blocking forms of the node operations.
//!
//! [`BlockingSession`] drives an async [`GraphSession`] on its own
//! current-thread Tokio runtime. Calling it from inside another async runtime
//! panics, as any nested `block_on` does.

use tokio::runtime::{Builder, Runtime};

use crate::entity::NodeEntity;
use crate::error::MapperResult;
use crate::mapper::NodeSessionExt;
use crate::record::QueryResult;
use crate::session::GraphSession;
use crate::statement::Statement;

/// A session whose operations block the calling thread until they complete.
pub struct BlockingSession<S> {
    inner: S,
    runtime: Runtime,
}

impl<S: GraphSession> BlockingSession<S> {
    /// Wrap `inner` with a fresh current-thread runtime.
    pub fn new(inner: S) -> MapperResult<Self> {
        Ok(Self::with_runtime(inner, current_thread_runtime()?))
    }

    /// Wrap `inner` with the runtime its connections were created on.
    pub fn with_runtime(inner: S, runtime: Runtime) -> Self {
        Self { inner, runtime }
    }

    /// Blocking [`NodeSessionExt::get_node`]; a missing node is `Ok(None)`.
    pub fn get_node<T>(&self, node_id: i64) -> MapperResult<Option<T>>
    where
        T: NodeEntity + Send,
    {
        self.runtime.block_on(self.inner.get_node(node_id))
    }

    /// Blocking [`NodeSessionExt::require_node`].
    pub fn require_node<T>(&self, node_id: i64) -> MapperResult<T>
    where
        T: NodeEntity + Send,
    {
        self.runtime.block_on(self.inner.require_node(node_id))
    }

    /// Blocking [`NodeSessionExt::set_node`].
    pub fn set_node<T>(&self, entity: &T) -> MapperResult<QueryResult>
    where
        T: NodeEntity + Sync,
    {
        self.runtime.block_on(self.inner.set_node(entity))
    }

    /// Run an arbitrary statement to completion.
    pub fn run(&self, statement: Statement) -> MapperResult<QueryResult> {
        self.runtime.block_on(self.inner.run(statement))
    }

    /// The runtime operations are driven on.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Runtime suitable for [`BlockingSession::with_runtime`].
pub fn current_thread_runtime() -> MapperResult<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}
