//! OpenSearch query builders.
//!
//! This module provides functions to build the JSON request bodies sent to the
//! search service. They are pure so their shape can be checked without a cluster.

use serde_json::{json, Value};

use crate::types::IdMatch;
use catalog_shared::EmployeeDocument;

/// Build a single-field analyzed match query.
///
/// `match` tokenizes `value` with the field's analyzer, so `"Human Resources"`
/// also finds documents containing only `"Resources"`.
pub fn build_match_query(field: &str, value: &str) -> Value {
    json!({
        "query": {
            "match": {
                field: value
            }
        }
    })
}

/// Build a query selecting documents by identifier.
///
/// In exact mode a document field is matched through its `.keyword` sub-field,
/// which dynamic mapping only creates for strings. Numeric identifiers are
/// also matched on the field itself, where a numeric mapping stores them.
pub fn build_id_query(field: &str, value: &str, mode: IdMatch) -> Value {
    if mode == IdMatch::Analyzed {
        return build_match_query(field, value);
    }

    if field.starts_with('_') || field.ends_with(".keyword") {
        return json!({"query": {"term": {field: value}}});
    }

    let keyword = format!("{}.keyword", field);
    let mut should = vec![json!({"term": {keyword: value}})];
    if let Some(number) = numeric_value(value) {
        should.push(json!({"term": {field: number}}));
    }

    json!({
        "query": {
            "bool": {
                "should": should,
                "minimum_should_match": 1
            }
        }
    })
}

fn numeric_value(value: &str) -> Option<Value> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(Value::from(n));
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// Build a zero-hit terms aggregation named `name` over `field`.
pub fn build_terms_aggregation(name: &str, field: &str) -> Value {
    json!({
        "size": 0,
        "aggs": {
            name: {
                "terms": {
                    "field": field
                }
            }
        }
    })
}

/// Build the NDJSON lines of a `_bulk` request.
///
/// Every document gets a bare `index` action so the service assigns its id.
pub fn build_bulk_body(documents: &[EmployeeDocument]) -> Vec<Value> {
    documents
        .iter()
        .flat_map(|doc| [json!({"index": {}}), Value::Object(doc.as_map().clone())])
        .collect()
}
