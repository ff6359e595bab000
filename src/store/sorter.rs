//! Record ordering for in-memory results
//!
//! Sorts JSON records by one or more fields, deterministically.

use std::cmp::Ordering;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};

/// Sort direction for an order clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses `asc` / `desc`, ignoring case
    pub fn parse(value: &str) -> StoreResult<Self> {
        match value.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(StoreError::InvalidSortDirection(value.to_string())),
        }
    }
}

/// Order clause as declared by the caller.
///
/// The direction is kept verbatim and only validated when the clause is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: String,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: direction.into(),
        }
    }
}

/// Sorts records
pub struct RecordSorter;

impl RecordSorter {
    /// Sorts records by the given clauses, first clause taking precedence.
    ///
    /// Sort is stable, so records comparing equal keep their stored order.
    pub fn sort(records: &mut [Value], order: &[OrderBy]) -> StoreResult<()> {
        if order.is_empty() {
            return Ok(());
        }

        let clauses = order
            .iter()
            .map(|clause| Ok((clause.column.as_str(), SortDirection::parse(&clause.direction)?)))
            .collect::<StoreResult<Vec<_>>>()?;

        records.sort_by(|a, b| {
            for (column, direction) in &clauses {
                let ordering = compare_fields(a.get(*column), b.get(*column));
                let ordering = match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        Ok(())
    }
}

/// Position of a field's JSON kind in the cross-type order; absent sorts first
fn kind_rank(field: Option<&Value>) -> u8 {
    match field {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

/// Order two record fields: by kind first, then by value within a kind.
/// Arrays and objects of the same kind tie.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .zip(y.as_f64())
                .and_then(|(x, y)| x.partial_cmp(&y))
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}
