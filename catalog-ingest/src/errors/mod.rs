//! Error types for the catalog ingest.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading employee records.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The CSV file does not exist.
    #[error("CSV file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The CSV file has no content or no header row.
    #[error("CSV file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    /// The CSV content is malformed.
    #[error("CSV parse error: {0}")]
    ParseError(String),

    /// The bytes could not be decoded with the configured encoding.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Any other I/O failure while reading the file.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IngestError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        match line {
            Some(line) => Self::ParseError(format!("line {}: {}", line, err)),
            None => Self::ParseError(err.to_string()),
        }
    }
}
