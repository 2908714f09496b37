//! Employee document type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat employee record, one per CSV row.
///
/// Keys are column names and keep the column order of the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeDocument(Map<String, Value>);

impl EmployeeDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value.into());
        self
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the document carries the given field.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterate over fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the document, returning the underlying JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for EmployeeDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_flat_object() {
        let doc = EmployeeDocument::new()
            .with_field("EmpID", "E02002")
            .with_field("Age", 34);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"EmpID": "E02002", "Age": 34}));
    }

    #[test]
    fn test_field_order_preserved() {
        let doc = EmployeeDocument::new()
            .with_field("Zeta", 1)
            .with_field("Alpha", 2);

        let keys: Vec<&String> = doc.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
    }
}
