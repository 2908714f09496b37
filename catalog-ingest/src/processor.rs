//! Row processor.
//!
//! Turns a raw table into employee documents: drops the excluded column,
//! infers a type per column, treats infinite numbers as missing and discards
//! every row that still has a missing cell.

use serde_json::{Number, Value};
use tracing::{debug, info, warn};

use crate::reader::RawTable;
use catalog_shared::EmployeeDocument;

/// Cell contents treated as missing values.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_VALUES: &[&str] = &["True", "TRUE", "true"];
const FALSE_VALUES: &[&str] = &["False", "FALSE", "false"];

/// Type inferred for a column from all of its non-missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Every non-missing value is a boolean literal.
    Bool,
    /// Every value parses as a 64-bit integer and none is missing.
    Integer,
    /// Every value parses as a float (integers with gaps land here too).
    Float,
    /// Anything else.
    Text,
}

/// Output of [`RowProcessor::process`].
#[derive(Debug, Clone, Default)]
pub struct ProcessedBatch {
    /// Documents that survived filtering, in file order.
    pub documents: Vec<EmployeeDocument>,
    /// Number of data rows in the input.
    pub total_rows: usize,
    /// Number of rows dropped for missing or infinite values.
    pub dropped_rows: usize,
    /// Whether the excluded column existed in the input.
    pub excluded_column_found: bool,
}

/// Converts raw CSV rows into employee documents.
#[derive(Debug, Clone)]
pub struct RowProcessor {
    exclude_column: String,
}

impl RowProcessor {
    /// Create a processor that drops `exclude_column` from every row.
    pub fn new(exclude_column: impl Into<String>) -> Self {
        Self {
            exclude_column: exclude_column.into(),
        }
    }

    /// Process a table.
    ///
    /// If the excluded column does not exist a warning is logged and all
    /// columns are kept.
    pub fn process(&self, table: RawTable) -> ProcessedBatch {
        let RawTable { headers, rows } = table;
        let total_rows = rows.len();

        let excluded = headers.iter().position(|h| *h == self.exclude_column);
        if excluded.is_none() {
            warn!(
                column = %self.exclude_column,
                "Column not found in the CSV headers, skipping exclusion"
            );
        }

        let kept: Vec<usize> = (0..headers.len()).filter(|i| Some(*i) != excluded).collect();
        let types: Vec<ColumnType> = kept
            .iter()
            .map(|&col| infer_column_type(rows.iter().map(|row| row[col].as_str())))
            .collect();

        debug!(
            columns = ?kept
                .iter()
                .zip(&types)
                .map(|(&col, ty)| format!("{}:{:?}", headers[col], ty))
                .collect::<Vec<_>>(),
            "Inferred column types"
        );

        let documents: Vec<EmployeeDocument> = rows
            .iter()
            .filter_map(|row| {
                let mut doc = EmployeeDocument::new();
                for (&col, &ty) in kept.iter().zip(&types) {
                    let value = convert_cell(&row[col], ty)?;
                    doc.insert(headers[col].clone(), value);
                }
                Some(doc)
            })
            .collect();

        let dropped_rows = total_rows - documents.len();
        info!(
            total = total_rows,
            kept = documents.len(),
            dropped = dropped_rows,
            "Processed rows"
        );

        ProcessedBatch {
            documents,
            total_rows,
            dropped_rows,
            excluded_column_found: excluded.is_some(),
        }
    }
}

/// Whether a raw cell counts as a missing value.
pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Infer the type of a column from its cells.
pub fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut all_bool = true;
    let mut all_int = true;
    let mut all_float = true;
    let mut has_missing = false;
    let mut has_value = false;

    for cell in cells {
        if is_missing(cell) {
            has_missing = true;
            continue;
        }
        has_value = true;

        let cell = cell.trim();
        all_bool &= parse_bool(cell).is_some();
        all_int &= cell.parse::<i64>().is_ok();
        all_float &= cell.parse::<f64>().is_ok();

        if !all_bool && !all_float {
            return ColumnType::Text;
        }
    }

    if all_int && !has_missing {
        ColumnType::Integer
    } else if all_bool && has_value {
        ColumnType::Bool
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

/// Convert a cell to JSON. Returns `None` for missing or non-finite values.
fn convert_cell(cell: &str, ty: ColumnType) -> Option<Value> {
    if is_missing(cell) {
        return None;
    }

    let trimmed = cell.trim();
    match ty {
        ColumnType::Bool => parse_bool(trimmed).map(Value::Bool),
        ColumnType::Integer => trimmed.parse::<i64>().ok().map(Value::from),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        ColumnType::Text => Some(Value::String(cell.to_string())),
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&cell) {
        Some(true)
    } else if FALSE_VALUES.contains(&cell) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_exclude_column_and_drop_missing() {
        let input = table(
            &["EmpID", "Department", "Gender"],
            &[
                &["E1", "IT", "Male"],
                &["E2", "Finance", "NaN"],
                &["E3", "HR", "Female"],
            ],
        );

        let batch = RowProcessor::new("Department").process(input);

        assert!(batch.excluded_column_found);
        assert_eq!(batch.total_rows, 3);
        assert_eq!(batch.dropped_rows, 1);
        assert_eq!(batch.documents.len(), 2);
        assert!(batch
            .documents
            .iter()
            .all(|d| !d.contains_field("Department")));
        assert_eq!(batch.documents[1].get("EmpID"), Some(&json!("E3")));
    }

    #[test]
    fn test_missing_in_excluded_column_does_not_drop_row() {
        let input = table(&["EmpID", "Exit Date"], &[&["E1", ""], &["E2", "2021-01-01"]]);

        let batch = RowProcessor::new("Exit Date").process(input);

        assert_eq!(batch.documents.len(), 2);
        assert_eq!(batch.dropped_rows, 0);
    }

    #[test]
    fn test_unknown_exclusion_column_keeps_everything() {
        let input = table(&["EmpID", "Gender"], &[&["E1", "Male"]]);

        let batch = RowProcessor::new("Salary").process(input);

        assert!(!batch.excluded_column_found);
        assert_eq!(batch.documents[0].len(), 2);
    }

    #[test]
    fn test_infinite_values_dropped() {
        let input = table(
            &["EmpID", "Bonus"],
            &[&["E1", "1.5"], &["E2", "inf"], &["E3", "-inf"], &["E4", "2"]],
        );

        let batch = RowProcessor::new("none").process(input);

        assert_eq!(batch.documents.len(), 2);
        assert_eq!(batch.documents[0].get("Bonus"), Some(&json!(1.5)));
        assert_eq!(batch.documents[1].get("Bonus"), Some(&json!(2.0)));
    }

    #[test]
    fn test_column_type_inference() {
        assert_eq!(infer_column_type(["1", "2", "-3"].into_iter()), ColumnType::Integer);
        assert_eq!(infer_column_type(["1", "2.5"].into_iter()), ColumnType::Float);
        assert_eq!(infer_column_type(["1", ""].into_iter()), ColumnType::Float);
        assert_eq!(infer_column_type(["True", "false"].into_iter()), ColumnType::Bool);
        assert_eq!(infer_column_type(["E1", "2"].into_iter()), ColumnType::Text);
        assert_eq!(infer_column_type(["", "NaN"].into_iter()), ColumnType::Float);
    }

    #[test]
    fn test_values_typed_in_documents() {
        let input = table(
            &["EmpID", "Age", "Rating", "Active"],
            &[&["E02002", "34", "4.5", "True"]],
        );

        let batch = RowProcessor::new("none").process(input);
        let doc = &batch.documents[0];

        assert_eq!(doc.get("EmpID"), Some(&json!("E02002")));
        assert_eq!(doc.get("Age"), Some(&json!(34)));
        assert_eq!(doc.get("Rating"), Some(&json!(4.5)));
        assert_eq!(doc.get("Active"), Some(&json!(true)));
    }

    #[test]
    fn test_integer_column_with_gap_becomes_float() {
        let input = table(&["EmpID", "Age"], &[&["E1", "34"], &["E2", ""]]);

        let batch = RowProcessor::new("none").process(input);

        assert_eq!(batch.documents.len(), 1);
        assert_eq!(batch.documents[0].get("Age"), Some(&json!(34.0)));
    }

    #[test]
    fn test_bool_column_with_gap_stays_bool() {
        let input = table(
            &["EmpID", "Active"],
            &[&["E1", "True"], &["E2", ""], &["E3", "false"]],
        );

        let batch = RowProcessor::new("none").process(input);

        assert_eq!(batch.documents.len(), 2);
        assert_eq!(batch.documents[0].get("Active"), Some(&json!(true)));
        assert_eq!(batch.documents[1].get("Active"), Some(&json!(false)));
        assert_eq!(
            infer_column_type(["True", "NaN"].into_iter()),
            ColumnType::Bool
        );
    }

    #[test]
    fn test_missing_markers() {
        for marker in ["", " ", "NaN", "nan", "NA", "N/A", "null", "NULL", "None", "<NA>"] {
            assert!(is_missing(marker), "{:?} should be missing", marker);
        }
        assert!(!is_missing("0"));
        assert!(!is_missing("Nancy"));
    }

    #[test]
    fn test_text_kept_verbatim() {
        let input = table(&["Job Title"], &[&[" Sr. Manager "]]);
        let batch = RowProcessor::new("none").process(input);
        assert_eq!(batch.documents[0].get("Job Title"), Some(&json!(" Sr. Manager ")));
    }

    #[test]
    fn test_indexed_never_exceeds_input() {
        let input = table(
            &["A", "B"],
            &[&["1", ""], &["", "2"], &["3", "4"], &["NaN", "NaN"]],
        );

        let batch = RowProcessor::new("none").process(input);

        assert!(batch.documents.len() <= batch.total_rows);
        assert_eq!(batch.documents.len() + batch.dropped_rows, batch.total_rows);
        assert_eq!(batch.documents.len(), 1);
    }
}
