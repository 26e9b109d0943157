//! The session seam between the mapper and a graph database driver.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MapperResult;
use crate::record::QueryResult;
use crate::statement::Statement;

/// An open context through which statements execute.
///
/// Implementations pass driver failures through as
/// [`MapperError::Session`](crate::MapperError::Session) without translating
/// them, and add no retries or timeouts of their own.
#[async_trait]
pub trait GraphSession: Send + Sync {
    async fn run(&self, statement: Statement) -> MapperResult<QueryResult>;
}

#[async_trait]
impl<S: GraphSession + ?Sized> GraphSession for &S {
    async fn run(&self, statement: Statement) -> MapperResult<QueryResult> {
        (**self).run(statement).await
    }
}

#[async_trait]
impl<S: GraphSession + ?Sized> GraphSession for Arc<S> {
    async fn run(&self, statement: Statement) -> MapperResult<QueryResult> {
        (**self).run(statement).await
    }
}

#[async_trait]
impl<S: GraphSession + ?Sized> GraphSession for Box<S> {
    async fn run(&self, statement: Statement) -> MapperResult<QueryResult> {
        (**self).run(statement).await
    }
}
