//! # Search Engine Collaborator
//!
//! Unexecuted search queries and the engine interface that runs them.

pub mod query;

use serde_json::Value;

use crate::store::StoreResult;

pub use query::SearchQuery;

/// Full-text search engine
pub trait SearchEngine {
    /// Run a search, returning raw hits in engine order.
    ///
    /// Filters, order clauses and the `take` limit are applied by the engine;
    /// the item transform is not.
    fn search(&self, query: &SearchQuery) -> StoreResult<Vec<Value>>;
}
