//! # Catalog Shared
//!
//! Types shared between the catalog crates: collection names, employee
//! documents and the result shapes returned by search operations.

mod collection;
mod document;
mod search;

pub use collection::CollectionName;
pub use document::EmployeeDocument;
pub use search::{FacetBucket, SearchByColumnResult};
