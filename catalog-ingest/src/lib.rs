//! # Catalog Ingest
//!
//! This crate turns a CSV export of employee records into search documents
//! and pushes them into the search service.
//!
//! ## Architecture
//!
//! The ingest follows a Reader-Processor-Loader pattern:
//!
//! 1. **Reader**: Reads and decodes the CSV file into a raw table
//! 2. **Processor**: Drops the excluded column, infers column types and
//!    discards rows with missing values
//! 3. **Loader**: Bulk-indexes the surviving documents with per-item accounting

pub mod errors;
pub mod loader;
pub mod processor;
pub mod reader;

pub use errors::IngestError;
pub use loader::{BulkLoader, IndexReport, LoaderConfig};
pub use processor::{ProcessedBatch, RowProcessor};
pub use reader::{CsvSource, RawTable};
