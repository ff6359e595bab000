//! # Query Declaration
//!
//! A query declares where its records come from and how they are shaped;
//! the executor does the rest. Implementors embed a `QueryState` and may
//! carry any scoping fields of their own (a parent record, a tenant id).

use serde_json::Value;

use super::config::QueryConfig;
use super::errors::QueryResult;
use super::executor::{self, QueryExecutor};
use super::source::{CollectionTransform, DataSource, ItemTransform, PaginationMode};
use crate::request::RequestParams;
use crate::response::PageResult;
use crate::search::{SearchEngine, SearchQuery};
use crate::store::DataStore;

/// Sort column and direction as read from the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: String,
    direction: String,
}

impl SortState {
    pub fn new(column: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: direction.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn direction(&self) -> &str {
        &self.direction
    }

    /// Sorting is active only when both column and direction are set
    pub fn is_active(&self) -> bool {
        !self.column.is_empty() && !self.direction.is_empty()
    }
}

/// Per-request state every query carries
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    request: RequestParams,
    sort: SortState,
    config: QueryConfig,
}

impl QueryState {
    pub fn new(request: RequestParams) -> Self {
        Self {
            request,
            sort: SortState::default(),
            config: QueryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_results_per_page(mut self, results_per_page: usize) -> Self {
        self.config.results_per_page = results_per_page;
        self
    }

    pub fn request(&self) -> &RequestParams {
        &self.request
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Read the sort parameters, storing an empty string for absent ones
    pub fn configure_sort(&mut self, column_key: &str, direction_key: &str) {
        self.sort = SortState::new(
            self.request.get_or(column_key, ""),
            self.request.get_or(direction_key, ""),
        );
    }

    pub fn rebind(&mut self, request: RequestParams) {
        self.request = request;
    }
}

/// A declared HTTP query.
///
/// Only `state`, `state_mut` and `base` are required; the remaining hooks
/// default to no transforms and an unmodified search.
pub trait HttpQuery {
    /// Unexecuted handle type of the data store this query reads from
    type Handle: Clone;

    fn state(&self) -> &QueryState;

    fn state_mut(&mut self) -> &mut QueryState;

    /// Where results come from.
    ///
    /// Called once per fetch; calling it again with the same state must
    /// describe an equivalent source.
    fn base(&self) -> DataSource<Self::Handle>;

    /// Per-record mapping
    fn item_transform(&self) -> Option<ItemTransform> {
        None
    }

    /// Whole-result mapping, applied after item transforms
    fn collection_transform(&self) -> Option<CollectionTransform> {
        None
    }

    /// Attach filters or ordering to a search before it is returned
    fn with_search_adapter(&self, query: SearchQuery) -> SearchQuery {
        query
    }

    fn pagination_mode(&self) -> PaginationMode {
        PaginationMode::default()
    }

    // ==================
    // Provided
    // ==================

    fn request(&self) -> &RequestParams {
        self.state().request()
    }

    /// Replace the bound request
    fn rebind(&mut self, request: RequestParams) -> &mut Self
    where
        Self: Sized,
    {
        self.state_mut().rebind(request);
        self
    }

    /// Read sort column and direction from the named parameters
    fn configure_sort(&mut self, column_key: &str, direction_key: &str) -> &mut Self
    where
        Self: Sized,
    {
        self.state_mut().configure_sort(column_key, direction_key);
        self
    }

    /// `configure_sort` with the configured parameter names
    fn sort(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        let params = self.state().config().params.clone();
        self.configure_sort(&params.sort_column, &params.sort_direction)
    }

    fn should_sort(&self) -> bool {
        self.state().sort().is_active()
    }

    fn can_sort(&self) -> bool {
        self.should_sort()
    }

    fn sort_column(&self) -> &str {
        self.state().sort().column()
    }

    fn sort_direction(&self) -> &str {
        self.state().sort().direction()
    }

    /// Every record, transformed
    fn fetch<S>(&self, store: &S) -> QueryResult<Vec<Value>>
    where
        Self: Sized,
        S: DataStore<Handle = Self::Handle>,
    {
        QueryExecutor::new(self, store).fetch()
    }

    /// One page of records, using the configured parameter names
    fn paginate<S>(&self, store: &S) -> QueryResult<PageResult>
    where
        Self: Sized,
        S: DataStore<Handle = Self::Handle>,
    {
        let params = &self.state().config().params;
        QueryExecutor::new(self, store).paginate(&params.page, &params.per_page, &params.path)
    }

    /// Unexecuted search for the configured search parameter
    fn search(&self) -> QueryResult<SearchQuery>
    where
        Self: Sized,
    {
        executor::search(self, &self.state().config().params.search)
    }

    /// Run the search and return one page, using the configured parameter names
    fn paginate_search<E>(&self, engine: &E) -> QueryResult<PageResult>
    where
        Self: Sized,
        E: SearchEngine,
    {
        let params = &self.state().config().params;
        executor::paginate_search(
            self,
            engine,
            &params.search,
            &params.page,
            &params.per_page,
            &params.path,
        )
    }
}
