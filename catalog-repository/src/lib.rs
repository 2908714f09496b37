//! # Catalog Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search service that stores employee documents. It includes definitions for
//! errors, the provider interface, connection configuration and a concrete
//! implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::ConnectionConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchClient;
pub use types::{BatchOperationResult, BatchOperationSummary, IdMatch};
