//! Query executor
//!
//! Resolves a declaration's data source and serves records from it.
//!
//! Pagination flow:
//! 1. Read page and per-page from the request
//! 2. Resolve the source, deferring execution of store handles
//! 3. Deferred handle: count, narrow to one page, execute, transform the page
//! 4. Materialized records (already transformed): count, slice one page
//! 5. Return the page with count/page/size/path metadata

use serde_json::Value;
use tracing::{debug, warn};

use super::declaration::HttpQuery;
use super::errors::{QueryError, QueryResult};
use super::source::{apply_transforms, DataSource, PaginationMode, Resolved};
use crate::request::RequestParams;
use crate::response::PageResult;
use crate::search::{SearchEngine, SearchQuery};
use crate::store::DataStore;

/// Executes a declared query against a data store
pub struct QueryExecutor<'a, Q, S>
where
    Q: HttpQuery,
    S: DataStore<Handle = Q::Handle>,
{
    query: &'a Q,
    store: &'a S,
}

impl<'a, Q, S> QueryExecutor<'a, Q, S>
where
    Q: HttpQuery,
    S: DataStore<Handle = Q::Handle>,
{
    pub fn new(query: &'a Q, store: &'a S) -> Self {
        Self { query, store }
    }

    /// Resolve the declared source.
    ///
    /// With `for_pagination`, store handles come back unexecuted. Materialized
    /// and executed records come back with transforms applied.
    pub fn resolve(&self, for_pagination: bool) -> QueryResult<Resolved<Q::Handle>> {
        self.resolve_source(self.query.base(), for_pagination)
    }

    fn resolve_source(
        &self,
        source: DataSource<Q::Handle>,
        for_pagination: bool,
    ) -> QueryResult<Resolved<Q::Handle>> {
        debug!(source = source.kind(), for_pagination, "resolving data source");

        let handle = match source {
            DataSource::Model(name) => match self.store.model(&name) {
                Some(handle) => handle,
                None => {
                    warn!(model = %name, "unknown model");
                    return Err(QueryError::Resolution(format!("unknown model `{}`", name)));
                }
            },
            DataSource::Unexecuted(handle) => handle,
            DataSource::Materialized(records) => {
                return Ok(Resolved::Items(self.transform(records)));
            }
            DataSource::Unrecognized(description) => {
                warn!(source = %description, "unrecognized data source");
                return Err(QueryError::Resolution(description));
            }
        };

        if for_pagination {
            return Ok(Resolved::Deferred(handle));
        }

        let records = self.store.execute(&handle)?;
        Ok(Resolved::Items(self.transform(records)))
    }

    /// Every record, transformed
    pub fn fetch(&self) -> QueryResult<Vec<Value>> {
        match self.resolve(false)? {
            Resolved::Items(items) => Ok(items),
            Resolved::Deferred(_) => Err(QueryError::Resolution(
                "source was not executed".to_string(),
            )),
        }
    }

    /// Unexecuted search for the term in `search_key`
    pub fn search(&self, search_key: &str) -> QueryResult<SearchQuery> {
        search(self.query, search_key)
    }

    /// One page of records, reading parameters from the named keys
    pub fn paginate(
        &self,
        page_key: &str,
        per_page_key: &str,
        path_key: &str,
    ) -> QueryResult<PageResult> {
        let request = self.query.request();
        let (page, per_page) = page_window(self.query, page_key, per_page_key)?;
        let offset = (page - 1).saturating_mul(per_page);
        let source = self.query.base();

        // Raw store rows cannot be mapped, so refuse before the store is touched
        let mode = self.query.pagination_mode();
        let reaches_store = matches!(source, DataSource::Model(_) | DataSource::Unexecuted(_));
        if reaches_store
            && mode == PaginationMode::Passthrough
            && self.query.item_transform().is_some()
        {
            warn!(
                %mode,
                source = source.kind(),
                "item transform declared on passthrough pagination"
            );
            return Err(QueryError::NotSupported(
                "cannot map results when paginating raw store handles; \
                 fetch the records in `base` or use transformed pagination"
                    .to_string(),
            ));
        }

        let (items, total) = match self.resolve_source(source, true)? {
            Resolved::Deferred(handle) => self.paginate_handle(&handle, offset, per_page)?,
            Resolved::Items(items) => {
                let total = items.len();
                let window = items.into_iter().skip(offset).take(per_page).collect();
                (window, total)
            }
        };

        debug!(page, per_page, total, "paginated query");

        Ok(PageResult::new(items, total, per_page, page)
            .with_page_name(page_key)
            .with_path(path_key, request.url()))
    }

    /// Serve one page from an unexecuted handle: one count, one narrowed fetch
    fn paginate_handle(
        &self,
        handle: &Q::Handle,
        offset: usize,
        per_page: usize,
    ) -> QueryResult<(Vec<Value>, usize)> {
        let total = self.store.count(handle)?;
        let narrowed = self.store.narrow(handle, offset, per_page);
        let rows = self.store.execute(&narrowed)?;

        let items = match self.query.pagination_mode() {
            PaginationMode::Transformed => self.transform(rows),
            PaginationMode::Passthrough => rows,
        };

        Ok((items, total))
    }

    fn transform(&self, records: Vec<Value>) -> Vec<Value> {
        apply_transforms(
            records,
            self.query.item_transform().as_ref(),
            self.query.collection_transform().as_ref(),
        )
    }
}

/// Build the declaration's search: searchable model from `base`, term from
/// the request, the item transform attached, then the declaration's adapter.
pub fn search<Q: HttpQuery>(query: &Q, search_key: &str) -> QueryResult<SearchQuery> {
    let index = match query.base() {
        DataSource::Model(name) => name,
        other => {
            warn!(source = other.kind(), "search requires a model source");
            return Err(QueryError::Resolution(format!(
                "cannot search a {} source",
                other.kind()
            )));
        }
    };

    let term = query.request().get_or(search_key, "");
    debug!(index = %index, term, "building search");

    let search = SearchQuery::new(index, term).with_transform(query.item_transform());
    Ok(query.with_search_adapter(search))
}

/// Build the declaration's search, run it, and return the requested page
pub fn paginate_search<Q, E>(
    query: &Q,
    engine: &E,
    search_key: &str,
    page_key: &str,
    per_page_key: &str,
    path_key: &str,
) -> QueryResult<PageResult>
where
    Q: HttpQuery,
    E: SearchEngine,
{
    let (page, per_page) = page_window(query, page_key, per_page_key)?;
    let url = query.request().url();

    let result = search(query, search_key)?.paginate(engine, page, per_page, url)?;

    Ok(result.with_page_name(page_key).with_path(path_key, url))
}

/// Page number and page size requested by the query's bound request
fn page_window<Q: HttpQuery>(
    query: &Q,
    page_key: &str,
    per_page_key: &str,
) -> QueryResult<(usize, usize)> {
    let request: &RequestParams = query.request();
    let config = query.state().config();

    let page = parse_page(request.get(page_key))?;
    let per_page = parse_per_page(
        request.get(per_page_key),
        config.results_per_page,
        config.max_per_page,
    )?;

    Ok((page, per_page))
}

/// Parse a page number; absent, empty or below 1 means the first page
fn parse_page(value: Option<&str>) -> QueryResult<usize> {
    let raw = match value.map(str::trim) {
        None | Some("") => return Ok(1),
        Some(raw) => raw,
    };

    let page: i64 = raw
        .parse()
        .map_err(|_| QueryError::InvalidParam(format!("Invalid page: {}", raw)))?;

    Ok(usize::try_from(page).map_or(1, |page| page.max(1)))
}

/// Parse a page size; absent, empty or zero means the default
fn parse_per_page(value: Option<&str>, default: usize, max: usize) -> QueryResult<usize> {
    let raw = match value.map(str::trim) {
        None | Some("") => return Ok(default.max(1)),
        Some(raw) => raw,
    };

    let per_page: usize = raw
        .parse()
        .map_err(|_| QueryError::InvalidParam(format!("Invalid per-page: {}", raw)))?;

    if per_page == 0 {
        return Ok(default.max(1));
    }
    if per_page > max {
        return Err(QueryError::LimitExceeded(per_page, max));
    }

    Ok(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::declaration::QueryState;
    use crate::query::source::ItemTransform;
    use crate::store::{InMemoryStore, TableQuery};
    use serde_json::json;
    use std::sync::Arc;

    /// Query over a fixed source with optional item mapping
    struct Fixed {
        state: QueryState,
        source: DataSource<TableQuery>,
        map: Option<ItemTransform>,
        mode: PaginationMode,
    }

    impl Fixed {
        fn new(source: DataSource<TableQuery>, request: RequestParams) -> Self {
            Self {
                state: QueryState::new(request),
                source,
                map: None,
                mode: PaginationMode::Transformed,
            }
        }
    }

    impl HttpQuery for Fixed {
        type Handle = TableQuery;

        fn state(&self) -> &QueryState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut QueryState {
            &mut self.state
        }

        fn base(&self) -> DataSource<TableQuery> {
            self.source.clone()
        }

        fn item_transform(&self) -> Option<ItemTransform> {
            self.map.clone()
        }

        fn pagination_mode(&self) -> PaginationMode {
            self.mode
        }
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new().with_table("users", (1..=7).map(|id| json!({"id": id})))
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("")).unwrap(), 1);
        assert_eq!(parse_page(Some("0")).unwrap(), 1);
        assert_eq!(parse_page(Some("-4")).unwrap(), 1);
        assert_eq!(parse_page(Some(" 3 ")).unwrap(), 3);
        assert!(matches!(parse_page(Some("two")), Err(QueryError::InvalidParam(_))));
    }

    #[test]
    fn test_parse_per_page() {
        assert_eq!(parse_per_page(None, 15, 1000).unwrap(), 15);
        assert_eq!(parse_per_page(Some("0"), 15, 1000).unwrap(), 15);
        assert_eq!(parse_per_page(Some("50"), 15, 1000).unwrap(), 50);
        assert_eq!(
            parse_per_page(Some("5000"), 15, 1000),
            Err(QueryError::LimitExceeded(5000, 1000))
        );
        assert!(matches!(
            parse_per_page(Some("-1"), 15, 1000),
            Err(QueryError::InvalidParam(_))
        ));
    }

    #[test]
    fn test_resolve_defers_handles_for_pagination() {
        let store = store();
        let query = Fixed::new(DataSource::Model("users".to_string()), RequestParams::new("/"));
        let executor = QueryExecutor::new(&query, &store);

        assert_eq!(
            executor.resolve(true).unwrap(),
            Resolved::Deferred(TableQuery::table("users"))
        );
        assert_eq!(store.stats().executes, 0);

        assert_eq!(executor.fetch().unwrap().len(), 7);
        assert_eq!(store.stats().executes, 1);
    }

    #[test]
    fn test_unknown_model_fails_resolution() {
        let store = store();
        let query = Fixed::new(DataSource::Model("posts".to_string()), RequestParams::new("/"));

        let err = query.fetch(&store).unwrap_err();
        assert!(matches!(err, QueryError::Resolution(_)));
    }

    #[test]
    fn test_paginate_handle_counts_then_narrows() {
        let store = store();
        let request = RequestParams::new("/users").with("page", "3").with("perPage", "3");
        let mut query = Fixed::new(DataSource::Unexecuted(TableQuery::table("users")), request);
        query.map = Some(Arc::new(|v: Value| v["id"].clone()));

        let page = query.paginate(&store).unwrap();

        assert_eq!(page.items(), &[json!(7)]);
        assert_eq!(page.total(), 7);
        assert_eq!(page.current_page(), 3);
        assert_eq!(store.stats().counts, 1);
        assert_eq!(store.stats().executes, 1);
    }

    #[test]
    fn test_passthrough_returns_raw_rows() {
        let store = store();
        let request = RequestParams::new("/users").with("perPage", "2");
        let mut query = Fixed::new(DataSource::Unexecuted(TableQuery::table("users")), request);
        query.mode = PaginationMode::Passthrough;

        let page = query.paginate(&store).unwrap();
        assert_eq!(page.items(), &[json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_custom_path_key_matches_across_pagination_paths() {
        let store = InMemoryStore::new()
            .with_table("users", (1..=4).map(|id| json!({"id": id, "name": "ann"})));
        let request = RequestParams::new("http://api.local/users")
            .with("perPage", "2")
            .with("search", "ann");
        let query = Fixed::new(DataSource::Model("users".to_string()), request);

        let listed = QueryExecutor::new(&query, &store)
            .paginate("page", "perPage", "url")
            .unwrap();
        let searched =
            paginate_search(&query, &store, "search", "page", "perPage", "url").unwrap();

        for page in [&listed, &searched] {
            assert_eq!(page.path(), Some("http://api.local/users"));
            assert_eq!(page.path_key(), "url");
            assert_eq!(
                page.next_page_url().as_deref(),
                Some("http://api.local/users?page=2")
            );
        }
        assert_eq!(
            serde_json::to_value(&listed).unwrap()["url"],
            serde_json::to_value(&searched).unwrap()["url"]
        );
    }

    #[test]
    fn test_search_requires_model_source() {
        let query = Fixed::new(DataSource::Materialized(vec![json!(1)]), RequestParams::new("/"));
        assert!(matches!(query.search(), Err(QueryError::Resolution(_))));
    }
}
