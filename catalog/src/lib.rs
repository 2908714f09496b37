//! # Catalog
//!
//! Main library for the employee catalog.
//!
//! This crate provides [`CatalogClient`], which loads employee CSV exports into
//! a search index and runs keyword search, count, delete and facet queries
//! against it, plus [`LenientCatalog`] for callers that expect failures to
//! collapse into empty results.

pub mod client;
pub mod config;
pub mod lenient;

#[cfg(test)]
mod testing;

pub use client::{CatalogClient, CollectionStatus};
pub use config::{CatalogSettings, Dependencies};
pub use lenient::LenientCatalog;

use catalog_ingest::IngestError;
use catalog_repository::SearchIndexError;
use thiserror::Error;

/// Errors returned by catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid caller input.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Reading or loading the CSV file failed.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),
}

impl CatalogError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
