//! Request and response types for search index operations.

use std::fmt;
use std::str::FromStr;

use crate::errors::SearchIndexError;

/// How an identifier lookup is matched against the identifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdMatch {
    /// Exact `term` lookup. Non-metadata fields are matched on the field itself
    /// or its `.keyword` sub-field, so both numeric and text ids compare whole values.
    #[default]
    Exact,
    /// Analyzed `match` query. Tokenizes the identifier, so it may match
    /// more documents than intended on text fields.
    Analyzed,
}

impl FromStr for IdMatch {
    type Err = SearchIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "term" => Ok(Self::Exact),
            "analyzed" | "match" => Ok(Self::Analyzed),
            other => Err(SearchIndexError::validation(format!(
                "Unknown id match mode '{}', expected 'exact' or 'analyzed'",
                other
            ))),
        }
    }
}

impl fmt::Display for IdMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Analyzed => f.write_str("analyzed"),
        }
    }
}

/// Result of a batch operation for a single item.
///
/// `position` is the item's index within the submitted batch, so failures can
/// be traced back to the source row even when the service assigned no id.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// Position of the item within the batch.
    pub position: usize,
    /// Document id assigned by the service, if the item was accepted.
    pub document_id: Option<String>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

impl BatchOperationResult {
    /// A successful item.
    pub fn succeeded(position: usize, document_id: Option<String>) -> Self {
        Self {
            position,
            document_id,
            success: true,
            error: None,
        }
    }

    /// A failed item.
    pub fn failed(position: usize, error: SearchIndexError) -> Self {
        Self {
            position,
            document_id: None,
            success: false,
            error: Some(error),
        }
    }
}

/// Summary of a batch operation containing aggregate statistics and individual results.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from per-item results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}
