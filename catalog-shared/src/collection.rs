//! Collection naming.

use std::fmt;

/// Name of a collection as it exists in the search service.
///
/// Collection names are case-insensitive: the caller-supplied name is always
/// lower-cased before it is used as an index name, so `Hash_Gowtham` and
/// `hash_gowtham` refer to the same index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    /// Normalize a caller-supplied collection name.
    ///
    /// Returns `None` if the name is empty or whitespace only.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    /// The index name to send to the search service.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
