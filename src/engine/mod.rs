//! Engine seam - the row-query collaborator
//!
//! The aggregate layer drives the underlying database through two
//! execution primitives: a single-value fetch and a row-set fetch. Both
//! take the final SQL text assembled from the rewritten clauses. Failures
//! propagate to the caller unchanged; this layer adds no retries or
//! timeouts around the round trip.

pub mod row;
pub mod value;

pub use row::{Row, RowSet};
pub use value::Value;

use async_trait::async_trait;
use thiserror::Error;

/// Engine operation errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Query execution failed
    #[error("execution error: {0}")]
    Execution(String),

    /// Connection-level failure
    #[error("connection error: {0}")]
    Connection(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Execution primitives supplied by the underlying row-query engine
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Fetch a single value: the first column of the first result row,
    /// or None if the query produced no rows
    async fn fetch_scalar(&self, sql: &str) -> EngineResult<Option<Value>>;

    /// Fetch the full result set
    async fn fetch_rows(&self, sql: &str) -> EngineResult<RowSet>;
}
