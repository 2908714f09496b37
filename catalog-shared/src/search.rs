//! Search result types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a single-field match search.
///
/// `documents` holds the raw hits as returned by the search service, including
/// metadata such as `_id`, `_index` and `_score` next to `_source`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchByColumnResult {
    /// Total number of matching documents reported by the service.
    pub count: u64,
    /// The returned hits.
    pub documents: Vec<Value>,
}

impl SearchByColumnResult {
    /// The empty result: zero count, no documents.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One bucket of a terms aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    /// The distinct field value.
    pub key: String,
    /// Number of documents carrying that value.
    pub doc_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_deserializes_from_service_shape() {
        let bucket: FacetBucket =
            serde_json::from_value(json!({"key": "IT", "doc_count": 12})).unwrap();
        assert_eq!(bucket.key, "IT");
        assert_eq!(bucket.doc_count, 12);
    }

    #[test]
    fn test_empty_result() {
        let result = SearchByColumnResult::empty();
        assert_eq!(result.count, 0);
        assert!(result.documents.is_empty());
    }
}
