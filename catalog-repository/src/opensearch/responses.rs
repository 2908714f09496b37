//! Parsing of OpenSearch response bodies.

use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationResult, BatchOperationSummary};
use catalog_shared::{FacetBucket, SearchByColumnResult};

/// Read `hits.total` and `hits.hits` from a search response.
///
/// `hits.total` is an object (`{"value": n, "relation": "eq"}`) on current
/// versions and a bare number on older ones; both are accepted.
pub fn parse_search_response(body: &Value) -> Result<SearchByColumnResult, SearchIndexError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| SearchIndexError::parse("search response has no 'hits'"))?;

    let total = hits.get("total");
    let count = total
        .and_then(|t| t.get("value"))
        .or(total)
        .and_then(Value::as_u64)
        .ok_or_else(|| SearchIndexError::parse("search response has no 'hits.total'"))?;

    let documents = hits
        .get("hits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(SearchByColumnResult { count, documents })
}

/// Read `count` from a `_count` response.
pub fn parse_count_response(body: &Value) -> Result<u64, SearchIndexError> {
    body.get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| SearchIndexError::parse("count response has no 'count'"))
}

/// Read `deleted` from a `_delete_by_query` response.
pub fn parse_delete_response(body: &Value) -> Result<u64, SearchIndexError> {
    body.get("deleted")
        .and_then(Value::as_u64)
        .ok_or_else(|| SearchIndexError::parse("delete response has no 'deleted'"))
}

/// Read the buckets of the aggregation called `name`.
pub fn parse_facet_response(body: &Value, name: &str) -> Result<Vec<FacetBucket>, SearchIndexError> {
    let buckets = body
        .get("aggregations")
        .and_then(|a| a.get(name))
        .and_then(|a| a.get("buckets"))
        .ok_or_else(|| {
            SearchIndexError::parse(format!("aggregation '{}' missing from response", name))
        })?;

    serde_json::from_value(buckets.clone())
        .map_err(|e| SearchIndexError::parse(format!("invalid buckets: {}", e)))
}

/// Turn a `_bulk` response into per-item results.
///
/// Items are matched to submitted documents by position. Missing items are
/// counted as failures so the summary always covers `expected` documents.
pub fn parse_bulk_response(body: &Value, expected: usize) -> BatchOperationSummary {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let results = (0..expected)
        .map(|position| match items.get(position) {
            Some(item) => parse_bulk_item(position, item),
            None => BatchOperationResult::failed(
                position,
                SearchIndexError::bulk_operation("no result returned for item"),
            ),
        })
        .collect();

    BatchOperationSummary::from_results(results)
}

fn parse_bulk_item(position: usize, item: &Value) -> BatchOperationResult {
    let action = item
        .get("index")
        .or_else(|| item.get("create"))
        .unwrap_or(item);

    if let Some(error) = action.get("error") {
        return BatchOperationResult::failed(position, SearchIndexError::index(describe_error(error)));
    }

    let status = action.get("status").and_then(Value::as_u64).unwrap_or(0);
    if !(200..300).contains(&status) {
        return BatchOperationResult::failed(
            position,
            SearchIndexError::index(format!("item rejected with status {}", status)),
        );
    }

    let document_id = action
        .get("_id")
        .and_then(Value::as_str)
        .map(str::to_string);
    BatchOperationResult::succeeded(position, document_id)
}

/// Whether an error body reports a missing index.
pub fn is_index_not_found(body: &Value) -> bool {
    body.get("error")
        .and_then(|e| e.get("type"))
        .and_then(Value::as_str)
        .map(|t| t == "index_not_found_exception")
        .unwrap_or(false)
}

/// Convert a non-2xx response into an error.
///
/// A 404 carrying `index_not_found_exception` becomes `IndexNotFound`; any
/// other failure is wrapped with `on_failure`.
pub fn error_from_response(
    status: u16,
    text: &str,
    index: &str,
    on_failure: fn(String) -> SearchIndexError,
) -> SearchIndexError {
    let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);
    if status == 404 && is_index_not_found(&body) {
        return SearchIndexError::index_not_found(index);
    }

    let detail = body
        .get("error")
        .map(describe_error)
        .unwrap_or_else(|| text.to_string());
    on_failure(format!("Request failed with status {}: {}", status, detail))
}

/// Render an OpenSearch error object as `type: reason`.
pub fn describe_error(error: &Value) -> String {
    match (
        error.get("type").and_then(Value::as_str),
        error.get("reason").and_then(Value::as_str),
    ) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (Some(kind), None) => kind.to_string(),
        _ => error.to_string(),
    }
}
