//! Catalog client implementation.
//!
//! This module provides the main client for the employee catalog. Every
//! operation normalizes the collection name, issues its requests through the
//! injected [`SearchIndexProvider`] and returns an explicit `Result`.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::CatalogSettings;
use crate::CatalogError;
use catalog_ingest::{BulkLoader, CsvSource, IndexReport, LoaderConfig, RowProcessor};
use catalog_repository::SearchIndexProvider;
use catalog_shared::{CollectionName, FacetBucket, SearchByColumnResult};

/// Name of the department aggregation in facet requests.
pub const DEPARTMENT_FACET: &str = "department_count";

/// Field the department facet buckets on.
pub const DEPARTMENT_FIELD: &str = "Department.keyword";

/// Outcome of [`CatalogClient::create_collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// The index did not exist and was created.
    Created,
    /// The index already existed; nothing was changed.
    AlreadyExists,
}

/// The main client for the employee catalog.
pub struct CatalogClient {
    provider: Arc<dyn SearchIndexProvider>,
    settings: CatalogSettings,
}

impl CatalogClient {
    /// Create a new client over the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>, settings: CatalogSettings) -> Self {
        Self { provider, settings }
    }

    /// The settings this client was built with.
    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// The index name a collection maps to: trimmed and lower-cased.
    pub fn collection_name(name: &str) -> Result<CollectionName, CatalogError> {
        CollectionName::new(name)
            .ok_or_else(|| CatalogError::validation("collection name must not be empty"))
    }

    fn require(value: &str, what: &str) -> Result<(), CatalogError> {
        if value.trim().is_empty() {
            return Err(CatalogError::validation(format!("{} must not be empty", what)));
        }
        Ok(())
    }

    /// Ensure the collection's index exists.
    ///
    /// Idempotent: calling it for an existing collection changes nothing and
    /// returns [`CollectionStatus::AlreadyExists`].
    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str) -> Result<CollectionStatus, CatalogError> {
        let collection = Self::collection_name(name)?;

        if self.provider.index_exists(collection.as_str()).await? {
            info!(collection = %collection, "Collection already exists");
            return Ok(CollectionStatus::AlreadyExists);
        }

        self.provider.create_index(collection.as_str()).await?;
        info!(collection = %collection, "Collection created");
        Ok(CollectionStatus::Created)
    }

    /// Load the configured CSV file into the collection.
    ///
    /// `exclude_column` is dropped from every row; if the file has no such
    /// column a warning is logged and all columns are kept. Rows with missing
    /// or infinite values are discarded. Re-running appends duplicates.
    pub async fn index_data(
        &self,
        name: &str,
        exclude_column: &str,
    ) -> Result<IndexReport, CatalogError> {
        let source = CsvSource::new(&self.settings.csv_path, &self.settings.csv_encoding)?;
        self.index_from(name, exclude_column, &source).await
    }

    /// Load a specific CSV file into the collection.
    pub async fn index_file(
        &self,
        name: &str,
        exclude_column: &str,
        path: &Path,
    ) -> Result<IndexReport, CatalogError> {
        let source = CsvSource::new(path, &self.settings.csv_encoding)?;
        self.index_from(name, exclude_column, &source).await
    }

    #[instrument(skip(self, source), fields(path = %source.path().display()))]
    async fn index_from(
        &self,
        name: &str,
        exclude_column: &str,
        source: &CsvSource,
    ) -> Result<IndexReport, CatalogError> {
        let collection = Self::collection_name(name)?;

        let table = source.read()?;
        let batch = RowProcessor::new(exclude_column).process(table);

        if batch.documents.is_empty() {
            info!(collection = %collection, "No data to index");
            return Ok(IndexReport {
                total_rows: batch.total_rows,
                dropped_rows: batch.dropped_rows,
                ..Default::default()
            });
        }

        let loader = BulkLoader::with_config(
            Arc::clone(&self.provider),
            LoaderConfig {
                batch_size: self.settings.batch_size,
            },
        );
        let mut report = loader.load(collection.as_str(), &batch.documents).await;
        report.total_rows = batch.total_rows;
        report.dropped_rows = batch.dropped_rows;

        info!(
            collection = %collection,
            indexed = report.indexed,
            failed = report.failed,
            dropped = report.dropped_rows,
            "Indexed records"
        );
        Ok(report)
    }

    /// Find documents whose `column` matches `value` (analyzed match, not exact).
    #[instrument(skip(self))]
    pub async fn search_by_column(
        &self,
        name: &str,
        column: &str,
        value: &str,
    ) -> Result<SearchByColumnResult, CatalogError> {
        let collection = Self::collection_name(name)?;
        Self::require(column, "column name")?;

        let result = self
            .provider
            .search_by_field(collection.as_str(), column, value)
            .await?;
        info!(collection = %collection, count = result.count, "Search completed");
        Ok(result)
    }

    /// Total number of documents in the collection.
    #[instrument(skip(self))]
    pub async fn get_emp_count(&self, name: &str) -> Result<u64, CatalogError> {
        let collection = Self::collection_name(name)?;
        Ok(self.provider.count(collection.as_str()).await?)
    }

    /// Delete every document whose identifier field matches `employee_id`.
    ///
    /// The field and match mode come from the settings. Returns the number of
    /// deleted documents, which is zero when nothing matched.
    #[instrument(skip(self))]
    pub async fn del_emp_by_id(&self, name: &str, employee_id: &str) -> Result<u64, CatalogError> {
        let collection = Self::collection_name(name)?;
        Self::require(employee_id, "employee id")?;

        let deleted = self
            .provider
            .delete_by_field(
                collection.as_str(),
                &self.settings.id_field,
                employee_id,
                self.settings.id_match,
            )
            .await?;

        info!(
            collection = %collection,
            employee_id = %employee_id,
            deleted = deleted,
            "Delete by id completed"
        );
        Ok(deleted)
    }

    /// Document counts per department.
    #[instrument(skip(self))]
    pub async fn get_dep_facet(&self, name: &str) -> Result<Vec<FacetBucket>, CatalogError> {
        let collection = Self::collection_name(name)?;
        Ok(self
            .provider
            .terms_facet(collection.as_str(), DEPARTMENT_FACET, DEPARTMENT_FIELD)
            .await?)
    }

    /// Check whether the search service is reachable and healthy.
    pub async fn health_check(&self) -> Result<bool, CatalogError> {
        Ok(self.provider.health_check().await?)
    }
}
