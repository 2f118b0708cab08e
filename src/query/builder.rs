//! Aggregate query orchestration
//!
//! Construction normalizes the raw parameters, resolves the target table
//! and derives the typed request; execution builds the clause skeleton,
//! lets the installed interceptor rewrite it, assembles the final SQL
//! and runs it through the engine. One query instance owns one request
//! for its lifetime.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{Catalog, TableDef};
use crate::engine::{QueryEngine, RowSet};
use crate::query::args::QueryArgs;
use crate::query::clauses::ClauseSet;
use crate::query::error::{QueryError, QueryResult};
use crate::query::request::{self, AggregateRequest};
use crate::query::result::{plan_extraction, ExecutionOutcome, Extraction};
use crate::query::rewrite::{AggregateRewriter, ClauseInterceptor};

/// Keys consumed by the aggregate layer; everything else is a filter
const RESERVED_KEYS: &[&str] = &[
    request::FUNCTION_KEY,
    request::OPERATOR_KEY,
    request::FIELDS_KEY,
    request::GROUPBY_KEY,
    request::AGGREGATE_FIELDS_KEY,
    request::COUNT_KEY,
];

/// An executed query over one table
///
/// The query runs in `run`; `get_result` interprets the captured
/// execution state into the caller-facing outcome.
#[derive(Debug)]
pub struct AggregateQuery<E: QueryEngine> {
    engine: Arc<E>,
    table: TableDef,
    /// Parameters exactly as passed in
    original: QueryArgs,
    /// Parameters after normalization
    vars: QueryArgs,
    /// Typed request, derived once at construction
    request: Option<AggregateRequest>,
    rewriter: Option<AggregateRewriter>,
    sql: String,
    found_rows: u64,
    items: Option<RowSet>,
}

impl<E: QueryEngine> AggregateQuery<E> {
    /// Build and execute a query.
    ///
    /// Malformed aggregate parameters degrade during normalization and
    /// never fail construction; an unknown table does.
    pub async fn run(
        catalog: Arc<RwLock<Catalog>>,
        table: &str,
        engine: Arc<E>,
        args: QueryArgs,
    ) -> QueryResult<Self> {
        let table = catalog
            .read()
            .get_table(table)
            .cloned()
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()))?;

        let original = args.clone();
        let vars = request::normalize(args);
        let request = AggregateRequest::from_args(&vars);
        let rewriter = request
            .as_ref()
            .map(|req| AggregateRewriter::new(req.clone(), table.clone()));

        let count = vars.get_flag(request::COUNT_KEY).unwrap_or(false);
        let group_by = request::group_by_columns(&vars);
        let skeleton = ClauseSet::skeleton(count, &group_by);
        let clauses = match &rewriter {
            Some(rewriter) => rewriter.intercept(skeleton),
            None => skeleton,
        };
        let sql = assemble_sql(&table.name, &vars, &clauses);

        tracing::debug!(sql = %sql, count, "executing query");

        let mut found_rows = 0;
        let mut items = None;
        if count && group_by.is_empty() {
            let value = engine.fetch_scalar(&sql).await?;
            found_rows = value.and_then(|v| v.as_int()).unwrap_or(0).max(0) as u64;
        } else {
            let rows = engine.fetch_rows(&sql).await?;
            found_rows = rows.len() as u64;
            items = Some(rows);
        }

        Ok(AggregateQuery {
            engine,
            table,
            original,
            vars,
            request,
            rewriter,
            sql,
            found_rows,
            items,
        })
    }

    /// Extract the aggregate outcome.
    ///
    /// Pure-integer single aggregates reuse the count machinery's value;
    /// mixed-type single aggregates re-fetch the final SQL as a raw
    /// scalar; grouped aggregates hand back the materialized rows. A
    /// query that never entered count mode has nothing to extract.
    pub async fn get_result(&self) -> QueryResult<ExecutionOutcome> {
        let count = self.count_mode();
        let grouped = !request::group_by_columns(&self.vars).is_empty();
        let fields = self
            .rewriter
            .as_ref()
            .map(|rewriter| rewriter.validated_fields())
            .unwrap_or_default();

        match plan_extraction(count, grouped, &fields) {
            Extraction::Absent => Ok(ExecutionOutcome::Absent),
            Extraction::FoundRows => Ok(ExecutionOutcome::Integer(self.found_rows)),
            Extraction::ScalarFetch => {
                let value = self.engine.fetch_scalar(&self.sql).await?;
                Ok(ExecutionOutcome::Scalar(value.unwrap_or_default()))
            }
            Extraction::RowSet => Ok(ExecutionOutcome::Rows(
                self.items.clone().unwrap_or_default(),
            )),
        }
    }

    /// The final SQL text after rewriting
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The found-rows count captured by the count machinery
    pub fn found_rows(&self) -> u64 {
        self.found_rows
    }

    /// Materialized rows, when the execution path produced them
    pub fn items(&self) -> Option<&RowSet> {
        self.items.as_ref()
    }

    /// The table this query ran against
    pub fn table(&self) -> &TableDef {
        &self.table
    }

    /// Parameters exactly as passed in
    pub fn original_args(&self) -> &QueryArgs {
        &self.original
    }

    /// Parameters after normalization
    pub fn vars(&self) -> &QueryArgs {
        &self.vars
    }

    /// The typed aggregate request, when one survived normalization
    pub fn request(&self) -> Option<&AggregateRequest> {
        self.request.as_ref()
    }

    fn count_mode(&self) -> bool {
        self.vars.get_flag(request::COUNT_KEY).unwrap_or(false)
    }
}

/// Assemble the final SQL text from the rewritten clauses and the
/// passthrough filter keys
fn assemble_sql(table: &str, vars: &QueryArgs, clauses: &ClauseSet) -> String {
    let mut sql = format!("SELECT {} FROM {}", clauses.projection, table);

    let predicates: Vec<String> = vars
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(key))
        .filter_map(|(key, value)| {
            value
                .as_str()
                .map(|v| format!("{} = '{}'", key, escape(v)))
        })
        .collect();
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }

    if !clauses.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&clauses.group_by);
    }
    sql
}

fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::args::ArgValue;

    #[test]
    fn test_assemble_plain_select() {
        let vars = QueryArgs::new();
        let clauses = ClauseSet::new("*", "");
        assert_eq!(assemble_sql("sales", &vars, &clauses), "SELECT * FROM sales");
    }

    #[test]
    fn test_assemble_with_filters() {
        let vars = QueryArgs::new()
            .set("function", "SUM")
            .set("status", "complete")
            .set("region", "eu");
        let clauses = ClauseSet::new("SUM(amount) as total_amount", "");
        assert_eq!(
            assemble_sql("sales", &vars, &clauses),
            "SELECT SUM(amount) as total_amount FROM sales \
             WHERE status = 'complete' AND region = 'eu'"
        );
    }

    #[test]
    fn test_assemble_with_group_by() {
        let vars = QueryArgs::new();
        let clauses = ClauseSet::new("product_id, SUM(amount) as amount", "product_id");
        assert_eq!(
            assemble_sql("sales", &vars, &clauses),
            "SELECT product_id, SUM(amount) as amount FROM sales GROUP BY product_id"
        );
    }

    #[test]
    fn test_filters_skip_non_string_values() {
        let vars = QueryArgs::new()
            .set("count", true)
            .set("ids", ArgValue::List(vec!["1".to_string()]))
            .set("status", "complete");
        let clauses = ClauseSet::new("COUNT(*)", "");
        assert_eq!(
            assemble_sql("sales", &vars, &clauses),
            "SELECT COUNT(*) FROM sales WHERE status = 'complete'"
        );
    }

    #[test]
    fn test_escape_quotes() {
        let vars = QueryArgs::new().set("name", "O'Brien");
        let clauses = ClauseSet::new("*", "");
        assert_eq!(
            assemble_sql("sales", &vars, &clauses),
            "SELECT * FROM sales WHERE name = 'O''Brien'"
        );
    }
}
