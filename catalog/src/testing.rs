//! In-memory search provider for catalog tests.
//!
//! Behaves like a single-node search service closely enough for the catalog
//! operations: indexing auto-creates the index, reads against a missing
//! index fail with `IndexNotFound`, and analyzed matching is token overlap
//! on lower-cased alphanumeric runs. Like dynamic mapping, only string values
//! are reachable through a `.keyword` sub-field.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::config::CatalogSettings;
use catalog_repository::{
    BatchOperationResult, BatchOperationSummary, IdMatch, SearchIndexError, SearchIndexProvider,
};
use catalog_shared::{EmployeeDocument, FacetBucket, SearchByColumnResult};

type Index = Vec<(String, EmployeeDocument)>;

pub struct InMemoryProvider {
    indices: Mutex<BTreeMap<String, Index>>,
    next_id: AtomicUsize,
    bulk_calls: AtomicUsize,
    rejected_emp_id: Option<String>,
    down: bool,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self {
            indices: Mutex::new(BTreeMap::new()),
            next_id: AtomicUsize::new(0),
            bulk_calls: AtomicUsize::new(0),
            rejected_emp_id: None,
            down: false,
        }
    }

    /// A provider whose every call fails as if the service were offline.
    pub fn unreachable() -> Self {
        Self {
            down: true,
            ..Self::new()
        }
    }

    /// A provider that rejects every document whose `EmpID` is `emp_id`.
    pub fn rejecting(emp_id: &str) -> Self {
        Self {
            rejected_emp_id: Some(emp_id.to_string()),
            ..Self::new()
        }
    }

    pub async fn index_names(&self) -> Vec<String> {
        self.indices.lock().await.keys().cloned().collect()
    }

    pub async fn documents(&self, index: &str) -> Vec<EmployeeDocument> {
        self.indices
            .lock()
            .await
            .get(index)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default()
    }

    pub async fn ids(&self, index: &str) -> Vec<String> {
        self.indices
            .lock()
            .await
            .get(index)
            .map(|docs| docs.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    fn check_up(&self) -> Result<(), SearchIndexError> {
        if self.down {
            return Err(SearchIndexError::connection("connection refused"));
        }
        Ok(())
    }

    fn assign_id(&self) -> String {
        format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

/// Settings pointing at `csv_path`, otherwise defaults.
pub fn settings_for(csv_path: &Path) -> CatalogSettings {
    CatalogSettings {
        csv_path: csv_path.to_path_buf(),
        csv_encoding: "utf-8".to_string(),
        ..CatalogSettings::default()
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field_value(id: &str, doc: &EmployeeDocument, field: &str) -> Option<Value> {
    if field == "_id" {
        return Some(Value::String(id.to_string()));
    }
    match field.strip_suffix(".keyword") {
        Some(base) => doc.get(base).filter(|v| v.is_string()).cloned(),
        None => doc.get(field).cloned(),
    }
}

/// Whole-value comparison: strings through `.keyword`, numbers numerically.
fn exact_match(candidate: &Value, query: &str) -> bool {
    match candidate {
        Value::String(s) => s == query,
        Value::Number(n) => match (n.as_f64(), query.trim().parse::<f64>()) {
            (Some(a), Ok(b)) => a == b,
            _ => false,
        },
        other => text_of(other) == query,
    }
}

fn analyzed_match(candidate: &str, query: &str) -> bool {
    let wanted = tokens(query);
    tokens(candidate).iter().any(|t| wanted.contains(t))
}

#[async_trait]
impl SearchIndexProvider for InMemoryProvider {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        self.check_up()?;
        Ok(self.indices.lock().await.contains_key(index))
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.check_up()?;
        let mut indices = self.indices.lock().await;
        if indices.contains_key(index) {
            return Err(SearchIndexError::index_creation(format!(
                "resource_already_exists_exception: index [{}] already exists",
                index
            )));
        }
        indices.insert(index.to_string(), Vec::new());
        Ok(())
    }

    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[EmployeeDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        self.check_up()?;
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);

        let mut indices = self.indices.lock().await;
        let docs = indices.entry(index.to_string()).or_default();
        let results = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| {
                let emp_id = doc.get("EmpID").and_then(Value::as_str);
                if emp_id.is_some() && emp_id == self.rejected_emp_id.as_deref() {
                    return BatchOperationResult::failed(
                        position,
                        SearchIndexError::index("mapper_parsing_exception: rejected"),
                    );
                }
                let id = self.assign_id();
                docs.push((id.clone(), doc.clone()));
                BatchOperationResult::succeeded(position, Some(id))
            })
            .collect();

        Ok(BatchOperationSummary::from_results(results))
    }

    async fn search_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> Result<SearchByColumnResult, SearchIndexError> {
        self.check_up()?;
        let indices = self.indices.lock().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        let documents: Vec<Value> = docs
            .iter()
            .filter(|(id, doc)| {
                field_value(id, doc, field).is_some_and(|v| analyzed_match(&text_of(&v), value))
            })
            .map(|(id, doc)| {
                json!({"_index": index, "_id": id, "_score": 1.0, "_source": doc})
            })
            .collect();

        Ok(SearchByColumnResult {
            count: documents.len() as u64,
            documents,
        })
    }

    async fn count(&self, index: &str) -> Result<u64, SearchIndexError> {
        self.check_up()?;
        self.indices
            .lock()
            .await
            .get(index)
            .map(|docs| docs.len() as u64)
            .ok_or_else(|| SearchIndexError::index_not_found(index))
    }

    async fn delete_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
        mode: IdMatch,
    ) -> Result<u64, SearchIndexError> {
        self.check_up()?;
        let mut indices = self.indices.lock().await;
        let docs = indices
            .get_mut(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        let before = docs.len();
        docs.retain(|(id, doc)| {
            let matched = field_value(id, doc, field).is_some_and(|v| match mode {
                IdMatch::Exact => exact_match(&v, value),
                IdMatch::Analyzed => analyzed_match(&text_of(&v), value),
            });
            !matched
        });
        Ok((before - docs.len()) as u64)
    }

    async fn terms_facet(
        &self,
        index: &str,
        _name: &str,
        field: &str,
    ) -> Result<Vec<FacetBucket>, SearchIndexError> {
        self.check_up()?;
        let indices = self.indices.lock().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for (id, doc) in docs {
            if let Some(value) = field_value(id, doc, field) {
                *counts.entry(text_of(&value)).or_default() += 1;
            }
        }

        let mut buckets: Vec<FacetBucket> = counts
            .into_iter()
            .map(|(key, doc_count)| FacetBucket { key, doc_count })
            .collect();
        buckets.sort_by(|a, b| b.doc_count.cmp(&a.doc_count).then_with(|| a.key.cmp(&b.key)));
        Ok(buckets)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.check_up()?;
        Ok(true)
    }
}
