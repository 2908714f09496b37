//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch (or a compatible Elasticsearch) as the backend.

mod client;
pub mod queries;
pub mod responses;

pub use client::OpenSearchClient;
