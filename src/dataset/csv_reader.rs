use super::table::{LabeledTable, Table};
use crate::error::{IoError, ModelError};
use log::debug;
use ndarray::{Array1, Array2};
use std::io::Read;
use std::path::Path;

/// Reads a comma separated file with a header row into a labeled table.
///
/// Every column except `label_column` becomes a feature. Cells must be numbers
/// or booleans (`True`/`False`, any case), which map to 1.0 and 0.0.
///
/// # Errors
///
/// - `IoError::StdIoError` / `IoError::CsvError` - If the file cannot be read
/// - `IoError::ModelError(ModelError::SchemaMismatch)` - If `label_column` is absent
/// - `IoError::ModelError(ModelError::InputValidationError)` - If a cell cannot be parsed
pub fn read_csv<P: AsRef<Path>>(path: P, label_column: &str) -> Result<LabeledTable, IoError> {
    let reader = IoError::load_in_buf_reader(&path)?;
    let table = read_csv_from_reader(reader, label_column)?;
    debug!(
        "Read {} rows and {} feature columns from {}",
        table.len(),
        table.features.ncols(),
        path.as_ref().display()
    );
    Ok(table)
}

/// Same as [`read_csv`] but from any reader.
pub fn read_csv_from_reader<R: Read>(reader: R, label_column: &str) -> Result<LabeledTable, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| {
            ModelError::SchemaMismatch(format!("Label column '{}' not found in header", label_column))
        })?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_idx)
        .map(|(_, h)| h.to_string())
        .collect();
    let n_features = feature_names.len();

    let mut values = Vec::new();
    let mut labels = Vec::new();
    let mut n_rows = 0;

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(ModelError::InputValidationError(format!(
                "Row {} has {} fields, expected {}",
                row_idx + 1,
                record.len(),
                headers.len()
            ))
            .into());
        }

        for (col_idx, cell) in record.iter().enumerate() {
            let value = parse_cell(cell).ok_or_else(|| {
                ModelError::InputValidationError(format!(
                    "Row {}, column '{}': cannot parse '{}' as a number",
                    row_idx + 1,
                    &headers[col_idx],
                    cell
                ))
            })?;
            if col_idx == label_idx {
                labels.push(value);
            } else {
                values.push(value);
            }
        }
        n_rows += 1;
    }

    let matrix = Array2::from_shape_vec((n_rows, n_features), values)
        .map_err(|e| ModelError::ProcessingError(e.to_string()))?;
    let features = Table::new(feature_names, matrix)?;

    Ok(LabeledTable::new(features, Array1::from_vec(labels))?)
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    cell.parse::<f64>().ok()
}
