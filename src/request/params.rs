//! # Request Parameters
//!
//! Snapshot of the query string and URL of an incoming request.

use std::collections::HashMap;

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::Uri;

use crate::query::errors::{QueryError, QueryResult};

/// Request parameters bound to a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    params: HashMap<String, String>,
    url: String,
}

impl RequestParams {
    /// Empty parameter set for the given request URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            params: HashMap::new(),
            url: url.into(),
        }
    }

    /// Build from key/value pairs
    pub fn from_pairs<I, K, V>(url: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            url: url.into(),
        }
    }

    /// Parse the query string of a request URI.
    ///
    /// `host` is used to complete the URL when the URI is origin-form.
    pub fn from_uri(uri: &Uri, host: Option<&str>) -> QueryResult<Self> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map_err(|rejection| QueryError::InvalidParam(rejection.body_text()))?;

        Ok(Self {
            params,
            url: request_url(uri, host),
        })
    }

    /// Set a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Raw parameter value, verbatim
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Parameter value, or `default` when absent
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Request URL without the query string
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path component of the request URL
    pub fn path(&self) -> &str {
        match self.url.find("://") {
            Some(scheme_end) => {
                let rest = &self.url[scheme_end + 3..];
                rest.find('/').map_or("/", |slash| &rest[slash..])
            }
            None => &self.url,
        }
    }
}

/// Rebuild the request URL (scheme, host, path) without its query string
fn request_url(uri: &Uri, host: Option<&str>) -> String {
    let path = uri.path();

    match (uri.scheme_str(), uri.authority()) {
        (Some(scheme), Some(authority)) => format!("{}://{}{}", scheme, authority, path),
        _ => match host {
            Some(host) => format!("http://{}{}", host, path),
            None => path.to_string(),
        },
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = QueryError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts.headers.get(HOST).and_then(|value| value.to_str().ok());
        Self::from_uri(&parts.uri, host)
    }
}
