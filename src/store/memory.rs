//! # In-Memory Data Store
//!
//! Tables of JSON records kept in insertion order. Handles are plain
//! `TableQuery` values, so a query can be declared without touching the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::sorter::{OrderBy, RecordSorter};
use super::DataStore;
use crate::search::{SearchEngine, SearchQuery};

/// Unexecuted query against one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub table: String,
    /// Equality filters, all of which must match
    pub filters: Vec<(String, Value)>,
    pub order: Vec<OrderBy>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl TableQuery {
    /// Query every row of a table
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            filters: Vec::new(),
            order: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    /// Add an equality filter
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Add an order clause. The direction is validated on execution.
    pub fn order_by(mut self, column: impl Into<String>, direction: impl Into<String>) -> Self {
        self.order.push(OrderBy::new(column, direction));
        self
    }

    fn matches(&self, record: &Value) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}

/// Round trips served by an `InMemoryStore`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub executes: usize,
    pub counts: usize,
    pub searches: usize,
}

/// In-memory tables of JSON records
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: HashMap<String, Vec<Value>>,
    executes: AtomicUsize,
    counts: AtomicUsize,
    searches: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records to a table, creating it if needed
    pub fn insert<I>(&mut self, table: &str, records: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend(records);
    }

    /// Builder form of `insert`
    pub fn with_table<I>(mut self, table: &str, records: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.insert(table, records);
        self
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            executes: self.executes.load(Ordering::Relaxed),
            counts: self.counts.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
        }
    }

    fn rows(&self, table: &str) -> StoreResult<&[Value]> {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
    }
}

impl DataStore for InMemoryStore {
    type Handle = TableQuery;

    fn model(&self, name: &str) -> Option<TableQuery> {
        self.tables
            .contains_key(name)
            .then(|| TableQuery::table(name))
    }

    fn execute(&self, handle: &TableQuery) -> StoreResult<Vec<Value>> {
        self.executes.fetch_add(1, Ordering::Relaxed);

        let mut rows: Vec<Value> = self
            .rows(&handle.table)?
            .iter()
            .filter(|record| handle.matches(record))
            .cloned()
            .collect();

        RecordSorter::sort(&mut rows, &handle.order)?;

        Ok(rows
            .into_iter()
            .skip(handle.offset)
            .take(handle.limit.unwrap_or(usize::MAX))
            .collect())
    }

    fn count(&self, handle: &TableQuery) -> StoreResult<usize> {
        self.counts.fetch_add(1, Ordering::Relaxed);

        let matching = self
            .rows(&handle.table)?
            .iter()
            .filter(|record| handle.matches(record))
            .count();

        Ok(matching
            .saturating_sub(handle.offset)
            .min(handle.limit.unwrap_or(usize::MAX)))
    }

    fn narrow(&self, handle: &TableQuery, offset: usize, limit: usize) -> TableQuery {
        TableQuery {
            offset: handle.offset.saturating_add(offset),
            limit: Some(match handle.limit {
                Some(existing) => existing.saturating_sub(offset).min(limit),
                None => limit,
            }),
            ..handle.clone()
        }
    }
}

impl SearchEngine for InMemoryStore {
    fn search(&self, query: &SearchQuery) -> StoreResult<Vec<Value>> {
        self.searches.fetch_add(1, Ordering::Relaxed);

        let term = query.term().to_lowercase();
        let mut hits: Vec<Value> = self
            .rows(query.index())?
            .iter()
            .filter(|record| {
                query
                    .filters()
                    .iter()
                    .all(|(field, expected)| record.get(field) == Some(expected))
            })
            .filter(|record| term.is_empty() || contains_term(record, &term))
            .cloned()
            .collect();

        RecordSorter::sort(&mut hits, query.orders())?;

        if let Some(limit) = query.limit() {
            hits.truncate(limit);
        }

        Ok(hits)
    }
}

/// Whether any string field of the record contains the (lowercased) term
fn contains_term(record: &Value, term: &str) -> bool {
    match record {
        Value::String(s) => s.to_lowercase().contains(term),
        Value::Object(fields) => fields.values().any(|v| contains_term(v, term)),
        Value::Array(items) => items.iter().any(|v| contains_term(v, term)),
        _ => false,
    }
}
