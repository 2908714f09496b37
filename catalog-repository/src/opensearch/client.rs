//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client. The same REST surface is served by
//! Elasticsearch 7.x, so either engine can sit behind it.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    BulkParts, CountParts, DeleteByQueryParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};

use crate::config::ConnectionConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::queries::{
    build_bulk_body, build_id_query, build_match_query, build_terms_aggregation,
};
use crate::opensearch::responses::{
    error_from_response, parse_bulk_response, parse_count_response, parse_delete_response,
    parse_facet_response, parse_search_response,
};
use crate::types::{BatchOperationSummary, IdMatch};
use catalog_shared::{EmployeeDocument, FacetBucket, SearchByColumnResult};

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// use catalog_repository::{ConnectionConfig, OpenSearchClient, SearchIndexProvider};
///
/// let client = OpenSearchClient::new(&ConnectionConfig::default()).await?;
/// if !client.index_exists("hash_gowtham").await? {
///     client.create_index("hash_gowtham").await?;
/// }
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    refresh: bool,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client from connection parameters.
    ///
    /// No request is sent; use [`health_check`](SearchIndexProvider::health_check)
    /// to verify the service is reachable.
    pub async fn new(config: &ConnectionConfig) -> Result<Self, SearchIndexError> {
        let url = config.url()?;

        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(username) = &config.username {
            builder = builder.auth(Credentials::Basic(
                username.clone(),
                config.password.clone(),
            ));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            url = %url,
            authenticated = config.username.is_some(),
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            refresh: config.refresh,
        })
    }

    fn write_refresh(&self) -> Refresh {
        if self.refresh {
            Refresh::WaitFor
        } else {
            Refresh::False
        }
    }

    /// Read a JSON body from a response, converting failures into errors.
    ///
    /// A 404 carrying `index_not_found_exception` becomes `IndexNotFound`; any
    /// other non-2xx status is wrapped with `on_failure`.
    async fn read_json(
        response: Response,
        index: &str,
        on_failure: fn(String) -> SearchIndexError,
    ) -> Result<Value, SearchIndexError> {
        let status = response.status_code();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| SearchIndexError::parse(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let err = error_from_response(status.as_u16(), &text, index, on_failure);
        if !matches!(err, SearchIndexError::IndexNotFound(_)) {
            error!(index = %index, error = %err, "Request failed");
        }
        Err(err)
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchIndexError::query(format!(
                "Index existence check failed with status {}",
                status
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(json!({}))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Self::read_json(response, index, SearchIndexError::IndexCreationError).await?;
        debug!(index = %index, "Index created");
        Ok(())
    }

    /// Index documents with a single `_bulk` request.
    ///
    /// Each document is sent as a bare `index` action so the service assigns ids.
    /// Item-level rejections (mapping conflicts and the like) do not fail the call;
    /// they are reported in the returned summary.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[EmployeeDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        let body: Vec<JsonBody<Value>> = build_bulk_body(documents)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .refresh(self.write_refresh())
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        let body = Self::read_json(response, index, SearchIndexError::BulkOperationError).await?;
        let summary = parse_bulk_response(&body, documents.len());

        debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk request completed"
        );
        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn search_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> Result<SearchByColumnResult, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(build_match_query(field, value))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = Self::read_json(response, index, SearchIndexError::QueryError).await?;
        parse_search_response(&body)
    }

    #[instrument(skip(self))]
    async fn count(&self, index: &str) -> Result<u64, SearchIndexError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = Self::read_json(response, index, SearchIndexError::QueryError).await?;
        parse_count_response(&body)
    }

    #[instrument(skip(self))]
    async fn delete_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
        mode: IdMatch,
    ) -> Result<u64, SearchIndexError> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .refresh(self.refresh)
            .body(build_id_query(field, value, mode))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = Self::read_json(response, index, SearchIndexError::DeleteError).await?;
        let deleted = parse_delete_response(&body)?;
        debug!(deleted = deleted, "Delete by query completed");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn terms_facet(
        &self,
        index: &str,
        name: &str,
        field: &str,
    ) -> Result<Vec<FacetBucket>, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(build_terms_aggregation(name, field))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = Self::read_json(response, index, SearchIndexError::QueryError).await?;
        parse_facet_response(&body, name)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let body = Self::read_json(response, "_cluster", SearchIndexError::ConnectionError).await?;
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        info!(status = %status, "Cluster health");
        Ok(status == "green" || status == "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_does_not_connect() {
        let config = ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Default::default()
        };
        assert!(OpenSearchClient::new(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_new_without_credentials() {
        let config = ConnectionConfig {
            username: None,
            refresh: false,
            ..Default::default()
        };
        let client = OpenSearchClient::new(&config).await.unwrap();
        assert!(matches!(client.write_refresh(), Refresh::False));
    }

    #[tokio::test]
    async fn test_refresh_waits_for_writes_by_default() {
        let client = OpenSearchClient::new(&ConnectionConfig::default()).await.unwrap();
        assert!(client.refresh);
        assert!(matches!(client.write_refresh(), Refresh::WaitFor));
    }

    #[tokio::test]
    async fn test_new_rejects_bad_scheme() {
        let config = ConnectionConfig {
            scheme: "gopher".to_string(),
            ..Default::default()
        };
        assert!(OpenSearchClient::new(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_error() {
        let config = ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Default::default()
        };
        let client = OpenSearchClient::new(&config).await.unwrap();

        let result = client.count("staff").await;
        assert!(matches!(result, Err(SearchIndexError::ConnectionError(_))));
    }
}
