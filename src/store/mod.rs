//! # Data Store Collaborator
//!
//! Narrow interface the query executor needs from the underlying data store,
//! plus an in-memory implementation used for tests and embedding.

pub mod errors;
pub mod memory;
pub mod sorter;

use serde_json::Value;

pub use errors::{StoreError, StoreResult};
pub use memory::{InMemoryStore, StoreStats, TableQuery};
pub use sorter::{OrderBy, RecordSorter, SortDirection};

/// Data store operations used by the query executor.
///
/// `execute` and `count` are the only calls that reach the store;
/// `model` and `narrow` only build handles.
pub trait DataStore {
    /// Unexecuted reference describing how to obtain rows
    type Handle: Clone;

    /// Resolve a model/table identifier to an unexecuted handle
    fn model(&self, name: &str) -> Option<Self::Handle>;

    /// Execute a handle, fetching every row it matches
    fn execute(&self, handle: &Self::Handle) -> StoreResult<Vec<Value>>;

    /// Count the rows a handle matches without fetching them
    fn count(&self, handle: &Self::Handle) -> StoreResult<usize>;

    /// Narrow a handle to one window of rows
    fn narrow(&self, handle: &Self::Handle, offset: usize, limit: usize) -> Self::Handle;
}
