//! Aggregate request normalization
//!
//! Canonicalizes the raw aggregate parameters of a request mapping.
//! Malformed parameters degrade instead of failing: an unknown function
//! disables aggregation for the request, an unknown operator falls back
//! to `+`, and an empty field list leaves the request a plain row query.

use std::fmt;

use crate::query::args::{ArgValue, QueryArgs};

/// Requested aggregate function
pub(crate) const FUNCTION_KEY: &str = "function";
/// Operator joining multiple fields in the ungrouped expression
pub(crate) const OPERATOR_KEY: &str = "operator";
/// Raw field list, consumed by normalization
pub(crate) const FIELDS_KEY: &str = "fields";
/// Grouping column list
pub(crate) const GROUPBY_KEY: &str = "groupby";
/// Canonical field list produced by normalization
pub(crate) const AGGREGATE_FIELDS_KEY: &str = "aggregate_fields";
/// Count-mode flag; normalization forces it on for aggregate requests
pub(crate) const COUNT_KEY: &str = "count";

/// Aggregate functions accepted by the rewriter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    /// SUM
    Sum,
    /// AVG
    Avg,
    /// MAX
    Max,
    /// MIN
    Min,
    /// GROUP_CONCAT
    GroupConcat,
    /// STDDEV
    StdDev,
    /// VAR_SAMP
    VarSamp,
    /// VAR_POP
    VarPop,
}

impl AggregateFunction {
    /// Parse a raw function name, case-insensitively, ignoring
    /// surrounding whitespace
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUM" => Some(AggregateFunction::Sum),
            "AVG" => Some(AggregateFunction::Avg),
            "MAX" => Some(AggregateFunction::Max),
            "MIN" => Some(AggregateFunction::Min),
            "GROUP_CONCAT" => Some(AggregateFunction::GroupConcat),
            "STDDEV" => Some(AggregateFunction::StdDev),
            "VAR_SAMP" => Some(AggregateFunction::VarSamp),
            "VAR_POP" => Some(AggregateFunction::VarPop),
            _ => None,
        }
    }

    /// The SQL keyword form
    pub fn as_sql(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Min => "MIN",
            AggregateFunction::GroupConcat => "GROUP_CONCAT",
            AggregateFunction::StdDev => "STDDEV",
            AggregateFunction::VarSamp => "VAR_SAMP",
            AggregateFunction::VarPop => "VAR_POP",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Operator joining fields in an ungrouped multi-field expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArithmeticOperator {
    /// `+`
    #[default]
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

impl ArithmeticOperator {
    /// Parse a raw operator; anything unrecognized falls back to `+`
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "+" => ArithmeticOperator::Add,
            "-" => ArithmeticOperator::Sub,
            "*" => ArithmeticOperator::Mul,
            "/" => ArithmeticOperator::Div,
            "%" => ArithmeticOperator::Mod,
            _ => ArithmeticOperator::Add,
        }
    }

    /// The SQL operator form
    pub fn as_sql(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Sub => "-",
            ArithmeticOperator::Mul => "*",
            ArithmeticOperator::Div => "/",
            ArithmeticOperator::Mod => "%",
        }
    }
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A canonical aggregate request, built once at query construction
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRequest {
    /// Aggregate function applied to the fields
    pub function: AggregateFunction,
    /// Operator joining fields in the ungrouped expression
    pub operator: ArithmeticOperator,
    /// De-duplicated field names, input order preserved
    pub fields: Vec<String>,
    /// Grouping columns (may be empty)
    pub group_by: Vec<String>,
}

impl AggregateRequest {
    /// Build the typed request from a normalized mapping.
    ///
    /// Returns None unless both `function` and `aggregate_fields`
    /// survived normalization.
    pub fn from_args(args: &QueryArgs) -> Option<Self> {
        let function = args.get_str(FUNCTION_KEY).and_then(AggregateFunction::parse)?;
        let fields = args.get(AGGREGATE_FIELDS_KEY).map(name_list).unwrap_or_default();
        if fields.is_empty() {
            return None;
        }
        let operator = args
            .get_str(OPERATOR_KEY)
            .map(ArithmeticOperator::parse_or_default)
            .unwrap_or_default();
        let group_by = group_by_columns(args);
        Some(AggregateRequest {
            function,
            operator,
            fields,
            group_by,
        })
    }

    /// Whether the request carries grouping columns
    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }
}

/// Canonicalize the aggregate keys of a raw request mapping.
///
/// Unrelated keys pass through untouched. A valid non-empty field list
/// is stored under `aggregate_fields` and the request is forced into
/// count mode, repurposing the engine's row-counting execution path for
/// the aggregate result.
pub fn normalize(mut args: QueryArgs) -> QueryArgs {
    let function = match args.get_str(FUNCTION_KEY).and_then(AggregateFunction::parse) {
        Some(function) => function,
        None => {
            if args.contains(FUNCTION_KEY) {
                tracing::debug!("unknown aggregate function, disabling aggregation");
            }
            args.remove(FUNCTION_KEY);
            return args;
        }
    };
    args.insert(FUNCTION_KEY, function.as_sql());

    let operator = args
        .get_str(OPERATOR_KEY)
        .map(ArithmeticOperator::parse_or_default)
        .unwrap_or_default();
    args.insert(OPERATOR_KEY, operator.as_sql());

    let fields = args.get(FIELDS_KEY).map(name_list).unwrap_or_default();
    if fields.is_empty() {
        // Valid function but nothing to aggregate
        args.remove(AGGREGATE_FIELDS_KEY);
    } else {
        args.remove(FIELDS_KEY);
        args.insert(AGGREGATE_FIELDS_KEY, ArgValue::List(fields));
        args.insert(COUNT_KEY, true);
    }
    args
}

/// Normalized group-by column list from the mapping
pub fn group_by_columns(args: &QueryArgs) -> Vec<String> {
    args.get(GROUPBY_KEY).map(name_list).unwrap_or_default()
}

/// Trimmed, de-duplicated name list from a string or list argument,
/// input order preserved. A string value may carry comma-separated names.
fn name_list(value: &ArgValue) -> Vec<String> {
    let raw: Vec<&str> = match value {
        ArgValue::Str(s) => s.split(',').collect(),
        ArgValue::List(items) => items.iter().map(String::as_str).collect(),
        ArgValue::Flag(_) => Vec::new(),
    };
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}
