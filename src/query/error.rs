//! Query error types

use thiserror::Error;

use crate::engine::EngineError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
///
/// Malformed aggregate parameters never error; they degrade during
/// normalization instead. What remains is the collaborators' failures.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Target table is not in the catalog
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Engine round trip failed
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}
