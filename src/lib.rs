//! http-query-builder - Declarative sortable, searchable, paginated HTTP queries
//!
//! A query declares where its records come from (a model, an unexecuted
//! store handle, or records already in memory) and how they are shaped.
//! The executor reads sort, search and paging parameters from the request
//! and turns the declaration into records, a search, or a page.

pub mod query;
pub mod request;
pub mod response;
pub mod search;
pub mod store;

pub use query::{
    CollectionTransform, DataSource, HttpQuery, ItemTransform, PaginationMode, QueryConfig,
    QueryError, QueryExecutor, QueryResult, QueryState,
};
pub use request::RequestParams;
pub use response::PageResult;
pub use search::{SearchEngine, SearchQuery};
pub use store::{DataStore, InMemoryStore, StoreError, TableQuery};
