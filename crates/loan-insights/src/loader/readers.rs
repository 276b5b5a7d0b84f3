//! Readers for the delimited, JSON and Parquet formats.

use crate::error::{InsightsError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

fn parse_error(path: &Path, err: impl std::fmt::Display) -> InsightsError {
    InsightsError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Read a CSV file with a header row, inferring the schema from the first
/// `infer_schema_length` rows and attempting date parsing.
///
/// Empty fields and any field equal to one of `null_values` are missing.
pub fn read_csv(
    path: &Path,
    infer_schema_length: usize,
    null_values: &[String],
) -> Result<DataFrame> {
    let null_values = (!null_values.is_empty()).then(|| {
        NullValues::AllColumns(null_values.iter().map(|v| v.as_str().into()).collect())
    });

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_schema_length))
        .map_parse_options(|opts| {
            opts.with_try_parse_dates(true)
                .with_null_values(null_values.clone())
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| parse_error(path, e))
}

/// Read a JSON array of records, or one record per line for `JsonLines`.
pub fn read_json(path: &Path, format: JsonFormat) -> Result<DataFrame> {
    let file = File::open(path)?;
    JsonReader::new(file)
        .with_json_format(format)
        .finish()
        .map_err(|e| parse_error(path, e))
}

pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| parse_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_csv_parses_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "id,applied_on,amount").unwrap();
        writeln!(file, "1,2024-01-01,1500.5").unwrap();
        writeln!(file, "2,2024-02-15,980.0").unwrap();
        drop(file);

        let df = read_csv(&path, 100, &[]).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("applied_on").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("amount").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_read_csv_null_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("income.csv");
        std::fs::write(&path, "INCOME,CITY\n100,Lagos\nNA,N/A\n300,\n").unwrap();

        let markers = vec!["NA".to_string(), "N/A".to_string()];
        let df = read_csv(&path, 100, &markers).unwrap();
        assert_eq!(df.column("INCOME").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("INCOME").unwrap().null_count(), 1);
        assert_eq!(df.column("CITY").unwrap().null_count(), 2);
    }

    #[test]
    fn test_read_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        std::fs::write(&path, "{\"a\":1,\"b\":\"x\"}\n{\"a\":2,\"b\":\"y\"}\n").unwrap();

        let df = read_json(&path, JsonFormat::JsonLines).unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"a\": 1,").unwrap();

        let err = read_json(&path, JsonFormat::Json).unwrap_err();
        assert!(matches!(err, InsightsError::Parse { .. }));
    }
}
