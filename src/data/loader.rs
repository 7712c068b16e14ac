use std::path::Path;

use crate::config::DataSource;
use crate::error::{RegressionError, Result};

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited table described by `source`.
///
/// * With `has_header` the first record names the columns; otherwise columns
///   are named by position (`"0"`, `"1"`, …).
/// * Every record must have the same number of fields.
/// * Cells are parsed as numbers where possible; see [`CellValue::parse`].
pub fn load_file(source: &DataSource) -> Result<Dataset> {
    let path = source.path.as_path();
    if !path.exists() {
        return Err(RegressionError::data_access(path, "file not found"));
    }

    let reader = csv::ReaderBuilder::new()
        .has_headers(source.has_header)
        .delimiter(source.delimiter_byte()?)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| RegressionError::data_access(path, e))?;

    let dataset = read_records(reader, path, source.has_header)?;
    log::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.width(),
        path.display()
    );
    Ok(dataset)
}

/// Load a table from any reader, e.g. an in-memory string.
pub fn load_reader<R: std::io::Read>(rdr: R, source: &DataSource) -> Result<Dataset> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(source.has_header)
        .delimiter(source.delimiter_byte()?)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);
    read_records(reader, &source.path, source.has_header)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

fn read_records<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
    has_header: bool,
) -> Result<Dataset> {
    let mut column_names: Option<Vec<String>> = if has_header {
        let headers = reader
            .headers()
            .map_err(|e| RegressionError::data_access(path, format!("reading header: {e}")))?;
        Some(headers.iter().map(|h| h.to_string()).collect())
    } else {
        None
    };

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| RegressionError::data_access(path, format!("row {row_no}: {e}")))?;

        let names = column_names
            .get_or_insert_with(|| (0..record.len()).map(|i| i.to_string()).collect());
        if record.len() != names.len() {
            return Err(RegressionError::data_access(
                path,
                format!(
                    "row {row_no} has {} fields but the table has {} columns",
                    record.len(),
                    names.len()
                ),
            ));
        }

        rows.push(record.iter().map(CellValue::parse).collect());
    }

    let column_names = column_names.unwrap_or_default();
    if rows.is_empty() {
        return Err(RegressionError::data_access(path, "no data rows"));
    }

    Ok(Dataset {
        column_names,
        rows,
        has_header,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(has_header: bool) -> DataSource {
        DataSource::csv("inline.csv", has_header)
    }

    #[test]
    fn reads_headerless_table() {
        let text = "1,2,3\n4,5,6\n";
        let ds = load_reader(text.as_bytes(), &source(false)).unwrap();
        assert_eq!(ds.column_names, vec!["0", "1", "2"]);
        assert_eq!(ds.shape(), (2, 3));
        assert_eq!(ds.rows[1][2], CellValue::Number(6.0));
    }

    #[test]
    fn reads_named_columns() {
        let text = "a, b\n1.5, x\n2.5,\n";
        let ds = load_reader(text.as_bytes(), &source(true)).unwrap();
        assert_eq!(ds.column_names, vec!["a", "b"]);
        assert_eq!(ds.rows[0][1], CellValue::Text("x".to_string()));
        assert_eq!(ds.rows[1][1], CellValue::Missing);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let text = "1,2,3\n4,5\n";
        let err = load_reader(text.as_bytes(), &source(false)).unwrap_err();
        assert!(matches!(err, RegressionError::DataAccess { .. }));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let err = load_reader("x,y\n".as_bytes(), &source(true)).unwrap_err();
        assert!(matches!(err, RegressionError::DataAccess { .. }));
    }

    #[test]
    fn missing_file_is_data_access_error() {
        let err = load_file(&DataSource::csv("/definitely/not/here.csv", false)).unwrap_err();
        assert!(matches!(err, RegressionError::DataAccess { .. }));
    }
}
