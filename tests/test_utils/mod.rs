//! Shared test utilities
//!
//! Note: clippy reports false-positive dead_code warnings because it
//! can't trace usage across test binaries. These utilities are used by
//! multiple tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parking_lot::RwLock;

use tallyq::catalog::{Catalog, ColumnDef, DataType, TableDef};
use tallyq::engine::{EngineError, EngineResult, QueryEngine, Row, RowSet, Value};

/// A recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Scalar(String),
    Rows(String),
}

/// Scripted engine that records every SQL text it receives
#[derive(Debug, Default)]
pub struct MockEngine {
    scalars: Mutex<VecDeque<Option<Value>>>,
    row_sets: Mutex<VecDeque<RowSet>>,
    calls: Mutex<Vec<Call>>,
    fail: Mutex<Option<String>>,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a scalar response
    pub fn push_scalar(&self, value: Option<Value>) {
        self.scalars.lock().unwrap().push_back(value);
    }

    /// Queue a row-set response
    pub fn push_rows(&self, rows: RowSet) {
        self.row_sets.lock().unwrap().push_back(rows);
    }

    /// Make every subsequent call fail
    pub fn fail_with(&self, message: &str) {
        *self.fail.lock().unwrap() = Some(message.to_string());
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// SQL texts of recorded scalar fetches
    pub fn scalar_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Scalar(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    /// SQL texts of recorded row fetches
    pub fn row_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Rows(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl QueryEngine for MockEngine {
    async fn fetch_scalar(&self, sql: &str) -> EngineResult<Option<Value>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Scalar(sql.to_string()));
        if let Some(message) = self.fail.lock().unwrap().clone() {
            return Err(EngineError::Execution(message));
        }
        Ok(self.scalars.lock().unwrap().pop_front().unwrap_or(None))
    }

    async fn fetch_rows(&self, sql: &str) -> EngineResult<RowSet> {
        self.calls.lock().unwrap().push(Call::Rows(sql.to_string()));
        if let Some(message) = self.fail.lock().unwrap().clone() {
            return Err(EngineError::Execution(message));
        }
        Ok(self.row_sets.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Catalog with the sales table the tests query
pub fn sales_catalog() -> Arc<RwLock<Catalog>> {
    let mut catalog = Catalog::new();
    catalog
        .create_table(
            TableDef::new("sales")
                .column(ColumnDef::new("id", DataType::BigInt).nullable(false))
                .column(ColumnDef::new("amount", DataType::Decimal))
                .column(ColumnDef::new("tax", DataType::Decimal))
                .column(ColumnDef::new("discount", DataType::Decimal))
                .column(ColumnDef::new("quantity", DataType::Int))
                .column(ColumnDef::new("product_id", DataType::BigInt))
                .column(ColumnDef::new("tag_a", DataType::Int))
                .column(ColumnDef::new("tag_b", DataType::Int))
                .column(ColumnDef::new("name", DataType::Varchar(100)))
                .column(ColumnDef::new("status", DataType::Varchar(20))),
        )
        .unwrap();
    Arc::new(RwLock::new(catalog))
}

/// Build a row set from column names and value rows
pub fn row_set(columns: &[&str], rows: Vec<Vec<Value>>) -> RowSet {
    let mut set = RowSet::new(columns.iter().map(|c| c.to_string()).collect());
    for values in rows {
        set.push(Row::new(values));
    }
    set
}
