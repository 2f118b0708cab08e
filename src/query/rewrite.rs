//! Clause rewriting
//!
//! Turns the engine's count-mode projection skeleton into the final
//! aggregate projection: recovers any grouping columns the skeleton
//! carries, validates the requested fields against the table, and
//! assembles the aggregate SELECT list. Fields that do not exist or are
//! not numeric are dropped; if none survive, the clauses pass through
//! unmodified and the engine's original behavior stands.

use crate::catalog::{DataType, TableDef};
use crate::query::clauses::ClauseSet;
use crate::query::request::{AggregateFunction, AggregateRequest};

/// Interceptor invoked after the engine generates its clause skeleton
/// and before execution. One interceptor is installed per query
/// instance, scoped to that instance's lifetime.
pub trait ClauseInterceptor {
    /// Return a possibly rewritten clause set
    fn intercept(&self, clauses: ClauseSet) -> ClauseSet;
}

/// A requested field that passed catalog validation
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    /// Column name
    pub name: String,
    /// Declared column type
    pub data_type: DataType,
}

impl FieldRef {
    /// Whether the declared type is integer-like
    pub fn is_integer(&self) -> bool {
        self.data_type.is_integer()
    }
}

/// Strip the count artifact from a count-mode projection, leaving the
/// grouping column list.
///
/// A grouped count skeleton reads `<group columns>, COUNT(*) as count`;
/// an ungrouped one is a bare `COUNT(*)`. Whatever remains after peeling
/// those off, minus stray trailing commas and whitespace, is the
/// grouping list.
pub fn strip_count_artifact(projection: &str) -> String {
    let mut rest = projection.trim();
    if let Some(stripped) = rest.strip_suffix(", COUNT(*) as count") {
        rest = stripped;
    } else if let Some(stripped) = rest.strip_suffix("COUNT(*)") {
        rest = stripped;
    }
    rest.trim_end().trim_end_matches(',').trim_end().to_string()
}

/// Validate requested fields against the table, keeping only columns
/// that exist with a numeric declared type
pub fn validate_fields(table: &TableDef, names: &[String]) -> Vec<FieldRef> {
    names
        .iter()
        .filter_map(|name| {
            let column = table.get_column(name)?;
            column.data_type.is_numeric().then(|| FieldRef {
                name: name.clone(),
                data_type: column.data_type.clone(),
            })
        })
        .collect()
}

/// Aggregate expression over the whole match set: all fields joined into
/// a single projection entry
fn ungrouped_projection(request: &AggregateRequest, fields: &[FieldRef]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    match request.function {
        AggregateFunction::GroupConcat => {
            let concat = names.join(", '|', ");
            format!(
                "GROUP_CONCAT(DISTINCT CONCAT({}) SEPARATOR '|') AS concatenated_fields",
                concat
            )
        }
        function => {
            let joined = names.join(&format!(" {} ", request.operator.as_sql()));
            format!("{}({}) as total_amount", function.as_sql(), joined)
        }
    }
}

/// Per-field aggregate expressions for the grouped case, each aliased to
/// its own field name
fn grouped_projection(request: &AggregateRequest, fields: &[FieldRef]) -> String {
    fields
        .iter()
        .map(|field| match request.function {
            AggregateFunction::GroupConcat => {
                format!("GROUP_CONCAT(DISTINCT {}) as {}", field.name, field.name)
            }
            function => format!("{}({}) as {}", function.as_sql(), field.name, field.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rewrites the skeleton clause set into the final aggregate projection
#[derive(Debug)]
pub struct AggregateRewriter {
    request: AggregateRequest,
    table: TableDef,
}

impl AggregateRewriter {
    /// Create a rewriter for one request against one table
    pub fn new(request: AggregateRequest, table: TableDef) -> Self {
        AggregateRewriter { request, table }
    }

    /// The requested fields that survived catalog validation
    pub fn validated_fields(&self) -> Vec<FieldRef> {
        validate_fields(&self.table, &self.request.fields)
    }
}

impl ClauseInterceptor for AggregateRewriter {
    fn intercept(&self, clauses: ClauseSet) -> ClauseSet {
        let fields = self.validated_fields();
        if fields.is_empty() {
            tracing::debug!(
                table = %self.table.name,
                "no valid aggregate fields, leaving clauses unmodified"
            );
            return clauses;
        }

        let groups = strip_count_artifact(&clauses.projection);
        let aggregate = if groups.is_empty() {
            ungrouped_projection(&self.request, &fields)
        } else {
            grouped_projection(&self.request, &fields)
        };
        let projection = if groups.is_empty() {
            aggregate
        } else {
            format!("{}, {}", groups, aggregate)
        };
        tracing::debug!(
            function = %self.request.function,
            projection = %projection,
            "rewrote aggregate projection"
        );
        ClauseSet {
            projection,
            group_by: clauses.group_by,
        }
    }
}
