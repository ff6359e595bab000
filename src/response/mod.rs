//! # Response Formatting
//!
//! Paginated envelope returned to HTTP clients.

pub mod page;

pub use page::{PageResult, DEFAULT_PAGE_NAME, DEFAULT_PATH_KEY};
