//! Loader module for the catalog ingest.
//!
//! Loads processed documents into the search index.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use catalog_repository::{BatchOperationResult, SearchIndexProvider};
use catalog_shared::EmployeeDocument;

/// Default number of documents per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents sent per bulk request.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Outcome of loading a CSV file into a collection.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    /// Data rows read from the file.
    pub total_rows: usize,
    /// Rows dropped for missing or infinite values.
    pub dropped_rows: usize,
    /// Documents accepted by the search service.
    pub indexed: usize,
    /// Documents the search service rejected.
    pub failed: usize,
    /// One entry per rejected document; `position` is the document's index
    /// among the documents submitted.
    pub failures: Vec<BatchOperationResult>,
}

impl IndexReport {
    /// Whether every submitted document was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Loader that pushes documents into the search service in bulk chunks.
///
/// A chunk that fails as a whole, including on a lost connection, is recorded
/// as a failure for each of its documents and loading continues with the next
/// chunk. Documents already accepted stay counted in the report.
pub struct BulkLoader {
    client: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new loader with the given client.
    pub fn new(client: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            client,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(client: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    /// Load documents into `index`.
    ///
    /// The returned report only fills `indexed`, `failed` and `failures`.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn load(&self, index: &str, documents: &[EmployeeDocument]) -> IndexReport {
        let mut report = IndexReport::default();
        let batch_size = self.config.batch_size.max(1);

        for (chunk_no, chunk) in documents.chunks(batch_size).enumerate() {
            let offset = chunk_no * batch_size;

            match self.client.bulk_index_documents(index, chunk).await {
                Ok(summary) => {
                    report.indexed += summary.succeeded;
                    report.failed += summary.failed;
                    for mut failure in summary.results.into_iter().filter(|r| !r.success) {
                        failure.position += offset;
                        warn!(
                            position = failure.position,
                            error = ?failure.error,
                            "Document rejected"
                        );
                        report.failures.push(failure);
                    }
                    debug!(chunk = chunk_no, size = chunk.len(), "Chunk loaded");
                }
                Err(e) => {
                    error!(chunk = chunk_no, error = %e, "Bulk request failed");
                    report.failed += chunk.len();
                    report.failures.extend(
                        (0..chunk.len())
                            .map(|i| BatchOperationResult::failed(offset + i, e.clone())),
                    );
                }
            }
        }

        info!(
            index = %index,
            indexed = report.indexed,
            failed = report.failed,
            "Load completed"
        );
        report
    }
}
