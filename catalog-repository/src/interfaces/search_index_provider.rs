//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationSummary, IdMatch};
use catalog_shared::{EmployeeDocument, FacetBucket, SearchByColumnResult};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the catalog client to enable dependency
/// injection and easy testing with mock implementations. Every method maps to a
/// single request against the service; `index` is always an already-normalized
/// (lower-cased) index name.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an empty index with the service's default settings.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError::IndexCreationError)` - If the service refused, including
    ///   when the index already exists
    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Index multiple documents in one bulk request.
    ///
    /// Per-item outcomes are reported in the summary; the result positions match
    /// the positions in `documents`.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk request fails entirely
    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[EmployeeDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Run an analyzed `match` query on a single field.
    async fn search_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> Result<SearchByColumnResult, SearchIndexError>;

    /// Count the documents in an index.
    async fn count(&self, index: &str) -> Result<u64, SearchIndexError>;

    /// Delete every document whose `field` matches `value`.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of deleted documents
    /// * `Err(SearchIndexError)` - If the request fails
    async fn delete_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
        mode: IdMatch,
    ) -> Result<u64, SearchIndexError>;

    /// Run a zero-hit terms aggregation named `name` over `field`.
    async fn terms_facet(
        &self,
        index: &str,
        name: &str,
        field: &str,
    ) -> Result<Vec<FacetBucket>, SearchIndexError>;

    /// Check if the search service is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster status is green or yellow
    /// * `Ok(false)` - If the cluster status is red or unknown
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
