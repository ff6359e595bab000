//! Unexecuted search-engine query

use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::SearchEngine;
use crate::query::errors::QueryResult;
use crate::query::source::ItemTransform;
use crate::response::{PageResult, DEFAULT_PATH_KEY};
use crate::store::OrderBy;

/// Search scoped to one index and term, built before execution
#[derive(Clone)]
pub struct SearchQuery {
    index: String,
    term: String,
    filters: Vec<(String, Value)>,
    orders: Vec<OrderBy>,
    limit: Option<usize>,
    transform: Option<ItemTransform>,
}

impl SearchQuery {
    pub fn new(index: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            term: term.into(),
            filters: Vec::new(),
            orders: Vec::new(),
            limit: None,
            transform: None,
        }
    }

    /// Attach the per-record transform applied to hits
    pub fn with_transform(mut self, transform: Option<ItemTransform>) -> Self {
        self.transform = transform;
        self
    }

    /// Restrict hits to records whose field equals the value
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: impl Into<String>) -> Self {
        self.orders.push(OrderBy::new(column, direction));
        self
    }

    /// Cap the number of hits
    pub fn take(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    pub fn orders(&self) -> &[OrderBy] {
        &self.orders
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn transform(&self) -> Option<&ItemTransform> {
        self.transform.as_ref()
    }

    /// Execute and map every hit
    pub fn get<E: SearchEngine>(&self, engine: &E) -> QueryResult<Vec<Value>> {
        let hits = engine.search(self)?;
        Ok(self.map_hits(hits))
    }

    /// Execute and return one page, mapping only that page's hits
    pub fn paginate<E: SearchEngine>(
        &self,
        engine: &E,
        page: usize,
        per_page: usize,
        path: &str,
    ) -> QueryResult<PageResult> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let hits = engine.search(self)?;
        let total = hits.len();
        let window: Vec<Value> = hits
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        debug!(
            index = %self.index,
            page,
            per_page,
            total,
            "paginated search"
        );

        Ok(PageResult::new(self.map_hits(window), total, per_page, page)
            .with_path(DEFAULT_PATH_KEY, path))
    }

    fn map_hits(&self, hits: Vec<Value>) -> Vec<Value> {
        match &self.transform {
            Some(map) => hits.into_iter().map(|hit| map(hit)).collect(),
            None => hits,
        }
    }
}

impl fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("index", &self.index)
            .field("term", &self.term)
            .field("filters", &self.filters)
            .field("orders", &self.orders)
            .field("limit", &self.limit)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}
