//! Shared utilities used across multiple handlers
//!
//! `query` holds the route-then-respond flow shared by `/prompt` and
//! `/search-and-route`; `text` holds UTF-8 safe string helpers.

pub mod query;
pub mod text;
