//! Dependency initialization and wiring for the catalog.

use std::sync::Arc;
use tracing::info;

use crate::client::CatalogClient;
use crate::config::CatalogSettings;
use crate::CatalogError;
use catalog_repository::{OpenSearchClient, SearchIndexProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The catalog client, connected to the configured search service.
    pub client: CatalogClient,
}

impl Dependencies {
    /// Build the search client and catalog client from settings.
    ///
    /// The connection is not verified here; the `health` command does that.
    pub async fn new(settings: CatalogSettings) -> Result<Self, CatalogError> {
        info!(
            host = %settings.connection.host,
            port = settings.connection.port,
            scheme = %settings.connection.scheme,
            csv_path = %settings.csv_path.display(),
            "Initializing dependencies"
        );

        let search_client = OpenSearchClient::new(&settings.connection)
            .await
            .map_err(|e| CatalogError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        let provider: Arc<dyn SearchIndexProvider> = Arc::new(search_client);
        let client = CatalogClient::new(provider, settings);

        Ok(Self { client })
    }
}
