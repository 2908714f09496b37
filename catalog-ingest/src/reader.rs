//! CSV reader.
//!
//! Reads an employee export from disk, decodes it with a configurable text
//! encoding and splits it into a header row plus string cells.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, info};

use crate::errors::IngestError;

/// Default location of the employee export.
pub const DEFAULT_CSV_PATH: &str = "./Employee Sample Data 1.csv";

/// Default encoding of the employee export.
pub const DEFAULT_ENCODING: &str = "ISO-8859-1";

/// A decoded CSV file: headers plus rows of raw cells.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty cells, which the processor treats as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names, de-duplicated.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<String>>,
}

/// A CSV file on disk together with the encoding used to read it.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    encoding: &'static Encoding,
}

impl CsvSource {
    /// Create a source for `path` decoded with the encoding named by `encoding_label`.
    ///
    /// Labels follow the WHATWG encoding standard (`ISO-8859-1`, `latin1`,
    /// `utf-8`, `windows-1252`, ...).
    pub fn new(path: impl Into<PathBuf>, encoding_label: &str) -> Result<Self, IngestError> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes()).ok_or_else(|| {
            IngestError::decode(format!("unknown encoding '{}'", encoding_label))
        })?;

        Ok(Self {
            path: path.into(),
            encoding,
        })
    }

    /// Path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file.
    pub fn read(&self) -> Result<RawTable, IngestError> {
        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IngestError::FileNotFound(self.path.clone()),
            _ => IngestError::IoError(e),
        })?;

        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            encoding = self.encoding.name(),
            "Read CSV file"
        );

        let table = self.parse_bytes(&bytes)?;
        info!(
            path = %self.path.display(),
            columns = table.headers.len(),
            rows = table.rows.len(),
            "Parsed CSV file"
        );
        Ok(table)
    }

    /// Parse already-loaded bytes as this source.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RawTable, IngestError> {
        if bytes.is_empty() {
            return Err(IngestError::EmptyFile(self.path.clone()));
        }

        let text = self.decode(bytes)?;
        if text.trim().is_empty() {
            return Err(IngestError::EmptyFile(self.path.clone()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(IngestError::EmptyFile(self.path.clone()));
        }
        let headers = dedupe_headers(headers);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(IngestError::parse(format!(
                    "expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(RawTable { headers, rows })
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, IngestError> {
        let text = self
            .encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| {
                IngestError::decode(format!(
                    "{} is not valid {}; try a different encoding",
                    self.path.display(),
                    self.encoding.name()
                ))
            })?;

        if self.encoding == UTF_8 {
            if let Some(stripped) = text.strip_prefix('\u{feff}') {
                return Ok(Cow::Owned(stripped.to_string()));
            }
        }
        Ok(text)
    }
}

/// Give blank headers a positional name and suffix repeated ones with `.1`, `.2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    headers
        .into_iter()
        .enumerate()
        .map(|(i, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                header
            };

            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}
