//! Data source descriptors and result transforms

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Per-record mapping applied during result assembly
pub type ItemTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Whole-result mapping applied after item transforms
pub type CollectionTransform = Arc<dyn Fn(Vec<Value>) -> Vec<Value> + Send + Sync>;

/// Where a query's results come from, before anything is executed
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource<H> {
    /// Model/table identifier, resolved through the data store
    Model(String),
    /// Unexecuted query or relation handle
    Unexecuted(H),
    /// Already materialized records
    Materialized(Vec<Value>),
    /// Anything else; cannot be resolved
    Unrecognized(String),
}

impl<H> DataSource<H> {
    /// Short name of the variant, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::Model(_) => "model",
            DataSource::Unexecuted(_) => "unexecuted",
            DataSource::Materialized(_) => "materialized",
            DataSource::Unrecognized(_) => "unrecognized",
        }
    }
}

impl<H> From<Vec<Value>> for DataSource<H> {
    fn from(records: Vec<Value>) -> Self {
        DataSource::Materialized(records)
    }
}

/// Outcome of resolving a data source
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<H> {
    /// Execution deferred to the paginator
    Deferred(H),
    /// Concrete records, transforms already applied
    Items(Vec<Value>),
}

/// How `paginate` serves unexecuted handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaginationMode {
    /// Count, fetch one narrowed page, then transform that page
    #[default]
    Transformed,
    /// Hand back raw rows of the narrowed page. Item transforms are rejected.
    Passthrough,
}

impl fmt::Display for PaginationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationMode::Transformed => write!(f, "transformed"),
            PaginationMode::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// Map every record, then hand the whole sequence to the collection transform.
///
/// Must run exactly once per set of records.
pub fn apply_transforms(
    records: Vec<Value>,
    item: Option<&ItemTransform>,
    collection: Option<&CollectionTransform>,
) -> Vec<Value> {
    let records = match item {
        Some(map) => records.into_iter().map(|record| map(record)).collect(),
        None => records,
    };

    match collection {
        Some(wrap) => wrap(records),
        None => records,
    }
}
