//! TallyQ - an aggregate query layer over a row-query engine
//!
//! Features:
//! - Permissive normalization of aggregate request parameters
//! - SELECT/GROUP BY clause rewriting with catalog-validated fields
//! - Scalar, raw-scalar, and grouped result extraction

pub mod catalog;
pub mod engine;
pub mod query;
