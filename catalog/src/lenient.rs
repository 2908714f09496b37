//! Fire-and-forget facade over [`CatalogClient`].
//!
//! Every failure is logged and collapsed into a default value, so callers
//! cannot tell "nothing matched" from "the request failed". Prefer
//! [`CatalogClient`] unless that contract is required.

use tracing::{error, info};

use crate::client::{CatalogClient, CollectionStatus};
use crate::CatalogError;
use catalog_ingest::IngestError;
use catalog_shared::{FacetBucket, SearchByColumnResult};

pub struct LenientCatalog {
    client: CatalogClient,
}

impl LenientCatalog {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// The wrapped strict client.
    pub fn inner(&self) -> &CatalogClient {
        &self.client
    }

    pub async fn create_collection(&self, name: &str) {
        match self.client.create_collection(name).await {
            Ok(CollectionStatus::Created) => info!("Collection {} created successfully.", name),
            Ok(CollectionStatus::AlreadyExists) => info!("Collection {} already exists.", name),
            Err(e) => error!("Error creating collection: {}", e),
        }
    }

    pub async fn index_data(&self, name: &str, exclude_column: &str) {
        match self.client.index_data(name, exclude_column).await {
            Ok(report) if report.indexed == 0 && report.failed == 0 => info!("No data to index."),
            Ok(report) => {
                info!("Indexed {} records into {}.", report.indexed, name);
                if report.failed > 0 {
                    error!("Failed to index {} records into {}.", report.failed, name);
                    for failure in &report.failures {
                        if let Some(err) = &failure.error {
                            error!(position = failure.position, error = %err, "Record was not indexed");
                        }
                    }
                }
            }
            Err(e) => log_index_error(&e),
        }
    }

    pub async fn search_by_column(
        &self,
        name: &str,
        column: &str,
        value: &str,
    ) -> SearchByColumnResult {
        self.client
            .search_by_column(name, column, value)
            .await
            .unwrap_or_else(|e| {
                error!("Error searching collection {}: {}", name, e);
                SearchByColumnResult::empty()
            })
    }

    pub async fn get_emp_count(&self, name: &str) -> u64 {
        self.client.get_emp_count(name).await.unwrap_or_else(|e| {
            error!("Error getting employee count: {}", e);
            0
        })
    }

    pub async fn del_emp_by_id(&self, name: &str, employee_id: &str) {
        match self.client.del_emp_by_id(name, employee_id).await {
            Ok(_) => info!("Employee with ID {} deleted successfully.", employee_id),
            Err(e) => error!("Error deleting employee with ID {}: {}", employee_id, e),
        }
    }

    pub async fn get_dep_facet(&self, name: &str) -> Vec<FacetBucket> {
        self.client.get_dep_facet(name).await.unwrap_or_else(|e| {
            error!("Error getting department facets: {}", e);
            Vec::new()
        })
    }
}

fn log_index_error(err: &CatalogError) {
    match err {
        CatalogError::IngestError(IngestError::FileNotFound(path)) => {
            error!("Error: File '{}' not found.", path.display())
        }
        CatalogError::IngestError(IngestError::EmptyFile(path)) => {
            error!("Error: File '{}' is empty.", path.display())
        }
        CatalogError::IngestError(IngestError::ParseError(msg)) => {
            error!("Error: Could not parse CSV file: {}", msg)
        }
        CatalogError::IngestError(IngestError::DecodeError(msg)) => {
            error!("Error: Could not decode CSV file: {}. Try using a different encoding.", msg)
        }
        other => error!("Error indexing data: {}", other),
    }
}
