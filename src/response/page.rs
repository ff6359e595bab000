//! # Page Result
//!
//! One page of records plus the count/page/size/path metadata a client
//! needs to walk the rest, serialized as a length-aware paginator envelope.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Envelope key the request URL is serialized under, unless overridden
pub const DEFAULT_PATH_KEY: &str = "path";

/// Query parameter page links are built with, unless overridden
pub const DEFAULT_PAGE_NAME: &str = "page";

/// Keys the envelope always writes; a path key may not reuse them
const RESERVED_KEYS: [&str; 11] = [
    "current_page",
    "data",
    "first_page_url",
    "from",
    "last_page",
    "last_page_url",
    "next_page_url",
    "per_page",
    "prev_page_url",
    "to",
    "total",
];

/// A single page of results
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    items: Vec<Value>,
    total: usize,
    per_page: usize,
    current_page: usize,
    page_name: String,
    path: Option<String>,
    path_key: String,
}

impl PageResult {
    /// `per_page` and `current_page` are raised to at least 1
    pub fn new(items: Vec<Value>, total: usize, per_page: usize, current_page: usize) -> Self {
        Self {
            items,
            total,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            page_name: DEFAULT_PAGE_NAME.to_string(),
            path: None,
            path_key: DEFAULT_PATH_KEY.to_string(),
        }
    }

    /// Set the request URL links are built from, serialized under `key`.
    ///
    /// A key that collides with an envelope field falls back to `path`.
    /// Calling this again replaces both URL and key.
    pub fn with_path(mut self, key: &str, url: impl Into<String>) -> Self {
        self.path_key = if RESERVED_KEYS.contains(&key) {
            DEFAULT_PATH_KEY.to_string()
        } else {
            key.to_string()
        };
        self.path = Some(url.into());
        self
    }

    /// Query parameter used when building page links
    pub fn with_page_name(mut self, page_name: impl Into<String>) -> Self {
        self.page_name = page_name.into();
        self
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Envelope key the path is written under
    pub fn path_key(&self) -> &str {
        &self.path_key
    }

    /// Last page number, at least 1
    pub fn last_page(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// 1-based position of the first item on this page
    pub fn from(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.offset() + 1)
    }

    /// 1-based position of the last item on this page
    pub fn to(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.offset() + self.items.len())
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// Link to the given page
    pub fn url(&self, page: usize) -> String {
        let path = self.path().unwrap_or("");
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", path, separator, self.page_name, page.max(1))
    }

    pub fn next_page_url(&self) -> Option<String> {
        self.has_more_pages().then(|| self.url(self.current_page + 1))
    }

    pub fn previous_page_url(&self) -> Option<String> {
        (self.current_page > 1).then(|| self.url(self.current_page - 1))
    }

    fn offset(&self) -> usize {
        (self.current_page - 1).saturating_mul(self.per_page)
    }
}

impl Serialize for PageResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RESERVED_KEYS.len() + 1))?;
        map.serialize_entry("current_page", &self.current_page)?;
        map.serialize_entry("data", &self.items)?;
        map.serialize_entry("first_page_url", &self.url(1))?;
        map.serialize_entry("from", &self.from())?;
        map.serialize_entry("last_page", &self.last_page())?;
        map.serialize_entry("last_page_url", &self.url(self.last_page()))?;
        map.serialize_entry("next_page_url", &self.next_page_url())?;
        map.serialize_entry(self.path_key.as_str(), &self.path)?;
        map.serialize_entry("per_page", &self.per_page)?;
        map.serialize_entry("prev_page_url", &self.previous_page_url())?;
        map.serialize_entry("to", &self.to())?;
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

impl IntoResponse for PageResult {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
