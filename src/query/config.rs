//! Query Configuration
//!
//! Request parameter names and paging limits shared by every query.

use serde::{Deserialize, Serialize};

/// Names of the request parameters a query reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamNames {
    /// Sort column (default: "sortCol")
    #[serde(default = "default_sort_column")]
    pub sort_column: String,

    /// Sort direction (default: "sortDirection")
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,

    /// Search term (default: "search")
    #[serde(default = "default_search")]
    pub search: String,

    /// Page number (default: "page")
    #[serde(default = "default_page")]
    pub page: String,

    /// Page size (default: "perPage")
    #[serde(default = "default_per_page")]
    pub per_page: String,

    /// Key the request URL is stored under in page metadata (default: "path")
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_sort_column() -> String {
    "sortCol".to_string()
}

fn default_sort_direction() -> String {
    "sortDirection".to_string()
}

fn default_search() -> String {
    "search".to_string()
}

fn default_page() -> String {
    "page".to_string()
}

fn default_per_page() -> String {
    "perPage".to_string()
}

fn default_path() -> String {
    "path".to_string()
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            sort_column: default_sort_column(),
            sort_direction: default_sort_direction(),
            search: default_search(),
            page: default_page(),
            per_page: default_per_page(),
            path: default_path(),
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub params: ParamNames,

    /// Page size when the request does not name one (default: 15)
    #[serde(default = "default_results_per_page")]
    pub results_per_page: usize,

    /// Largest page size a request may ask for (default: 1000)
    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,
}

fn default_results_per_page() -> usize {
    15
}

fn default_max_per_page() -> usize {
    1000
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            params: ParamNames::default(),
            results_per_page: default_results_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}
