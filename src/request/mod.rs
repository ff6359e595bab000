//! # Request Module
//!
//! Request accessor consumed by queries: a string-keyed parameter lookup
//! plus the request URL, extractable from axum requests.

pub mod params;

pub use params::RequestParams;
