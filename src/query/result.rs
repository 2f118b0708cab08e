//! Result extraction
//!
//! Decides what shape a completed aggregate takes: a plain integer (the
//! count machinery already produced the value as a side effect), a raw
//! scalar fetched in a second round trip, or the grouped row set.

use crate::engine::{RowSet, Value};
use crate::query::rewrite::FieldRef;

/// The caller-facing outcome of running a query
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Pure-integer single aggregate, taken from the count side effect
    Integer(u64),
    /// Single aggregate over non-integer numeric fields, fetched raw
    Scalar(Value),
    /// Grouped aggregate rows
    Rows(RowSet),
    /// Not an aggregate request
    Absent,
}

impl ExecutionOutcome {
    /// Whether there was no aggregate to extract
    pub fn is_absent(&self) -> bool {
        matches!(self, ExecutionOutcome::Absent)
    }

    /// Integer form, if this is an `Integer`
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            ExecutionOutcome::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Raw scalar form, if this is a `Scalar`
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            ExecutionOutcome::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Row set form, if this is `Rows`
    pub fn as_rows(&self) -> Option<&RowSet> {
        match self {
            ExecutionOutcome::Rows(rows) => Some(rows),
            _ => None,
        }
    }
}

/// Extraction strategy for a completed query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Use the found-rows count directly, no second round trip
    FoundRows,
    /// Re-fetch the final SQL as a single raw value
    ScalarFetch,
    /// Hand back the materialized grouped rows
    RowSet,
    /// Nothing to extract
    Absent,
}

/// Choose the extraction strategy from the request shape and the
/// validated field types.
///
/// The found-rows shortcut holds only while every validated field is
/// integer-like: the count path truncates to an integer, which is not
/// the true aggregate for decimal or float columns.
pub fn plan_extraction(count_mode: bool, grouped: bool, fields: &[FieldRef]) -> Extraction {
    if !count_mode {
        return Extraction::Absent;
    }
    if grouped {
        return Extraction::RowSet;
    }
    if fields.iter().any(|field| !field.is_integer()) {
        Extraction::ScalarFetch
    } else {
        Extraction::FoundRows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;

    fn field(name: &str, data_type: DataType) -> FieldRef {
        FieldRef {
            name: name.to_string(),
            data_type,
        }
    }

    #[test]
    fn test_not_count_mode_is_absent() {
        let fields = vec![field("quantity", DataType::Int)];
        assert_eq!(plan_extraction(false, false, &fields), Extraction::Absent);
        assert_eq!(plan_extraction(false, true, &fields), Extraction::Absent);
    }

    #[test]
    fn test_grouped_returns_rows() {
        let fields = vec![field("amount", DataType::Decimal)];
        assert_eq!(plan_extraction(true, true, &fields), Extraction::RowSet);
    }

    #[test]
    fn test_all_integer_uses_found_rows() {
        let fields = vec![
            field("quantity", DataType::Int),
            field("product_id", DataType::BigInt),
        ];
        assert_eq!(plan_extraction(true, false, &fields), Extraction::FoundRows);
    }

    #[test]
    fn test_non_integer_forces_scalar_fetch() {
        let fields = vec![
            field("quantity", DataType::Int),
            field("amount", DataType::Decimal),
        ];
        assert_eq!(
            plan_extraction(true, false, &fields),
            Extraction::ScalarFetch
        );
    }

    #[test]
    fn test_plain_count_uses_found_rows() {
        // Count mode without any aggregate fields is an ordinary count
        assert_eq!(plan_extraction(true, false, &[]), Extraction::FoundRows);
    }

    #[test]
    fn test_outcome_accessors() {
        assert!(ExecutionOutcome::Absent.is_absent());
        assert_eq!(ExecutionOutcome::Integer(3).as_integer(), Some(3));
        assert_eq!(ExecutionOutcome::Integer(3).as_scalar(), None);
        let scalar = ExecutionOutcome::Scalar(Value::Int(9));
        assert_eq!(scalar.as_scalar(), Some(&Value::Int(9)));
        assert!(ExecutionOutcome::Rows(RowSet::default()).as_rows().is_some());
    }
}
