//! Writers for the delimited, JSON and Parquet formats.
//!
//! Every writer creates missing parent directories and overwrites an
//! existing file.

use crate::error::{InsightsError, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

pub(crate) fn write_error(path: &Path, err: impl std::fmt::Display) -> InsightsError {
    InsightsError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    ensure_parent_dir(path)?;
    File::create(path).map_err(|e| write_error(path, e))
}

pub fn write_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut file = create_file(path)?;
    let mut frame = frame.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut frame)
        .map_err(|e| write_error(path, e))
}

/// Write a JSON array of records, or one record per line for `JsonLines`.
pub fn write_json(frame: &DataFrame, path: &Path, format: JsonFormat) -> Result<()> {
    let mut file = create_file(path)?;
    let mut frame = frame.clone();
    JsonWriter::new(&mut file)
        .with_json_format(format)
        .finish(&mut frame)
        .map_err(|e| write_error(path, e))
}

pub fn write_parquet(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut file = create_file(path)?;
    let mut frame = frame.clone();
    ParquetWriter::new(&mut file)
        .finish(&mut frame)
        .map(|_| ())
        .map_err(|e| write_error(path, e))
}
