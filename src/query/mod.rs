//! # Query Module
//!
//! Declarations state a data source and optional transforms; the executor
//! reads sort/page/search parameters from the bound request, resolves the
//! source, and produces records or a page of records.

pub mod config;
pub mod declaration;
pub mod errors;
pub mod executor;
pub mod source;

pub use config::{ParamNames, QueryConfig};
pub use declaration::{HttpQuery, QueryState, SortState};
pub use errors::{ErrorResponse, QueryError, QueryResult};
pub use executor::QueryExecutor;
pub use source::{
    apply_transforms, CollectionTransform, DataSource, ItemTransform, PaginationMode, Resolved,
};
