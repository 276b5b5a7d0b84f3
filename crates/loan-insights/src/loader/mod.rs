//! Tabular data loader: files in and out of [`Table`], plus describe, clean,
//! sample and synthetic generation.
//!
//! # Example
//!
//! ```rust,no_run
//! use loan_insights::{CleanOptions, DataLoader, LoadOptions};
//!
//! let loader = DataLoader::default();
//! let table = loader.load("loans.csv", &LoadOptions::default())?;
//! let cleaned = loader.clean(&table, &CleanOptions::default())?;
//! println!("{} rows after cleaning", cleaned.height());
//! # Ok::<(), loan_insights::InsightsError>(())
//! ```

mod format;
mod readers;
mod sampling;
mod spreadsheet;
mod writers;

pub use crate::profiler::{ColumnInfo, TableInfo};
pub use format::{FileFormat, LoadOptions, SaveOptions};

use crate::cleaner::DataCleaner;
use crate::config::{CleanOptions, LoaderConfig, SampleOptions, SyntheticOptions};
use crate::error::{InsightsError, Result};
use crate::profiler::DataProfiler;
use crate::table::Table;
use polars::prelude::JsonFormat;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Loads, saves and prepares tables.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    config: LoaderConfig,
}

impl DataLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Resolve relative paths against the configured data directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match &self.config.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Load a table from disk.
    ///
    /// The format comes from `options.format` or else from the file
    /// extension. A missing file is reported before the format is checked.
    pub fn load(&self, path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table> {
        let path = self.resolve_path(path);
        if !path.exists() {
            return Err(InsightsError::NotFound(path));
        }
        let format = match options.format {
            Some(format) => format,
            None => FileFormat::from_path(&path)?,
        };

        let start = Instant::now();
        let table = match format {
            FileFormat::Csv => Table::from_frame(readers::read_csv(
                &path,
                self.config.infer_schema_length,
                &self.config.null_values,
            )?)?,
            FileFormat::Spreadsheet => {
                spreadsheet::read_spreadsheet(&path, options.sheet.as_deref())?
            }
            FileFormat::Json => {
                Table::from_frame_inferring_dates(readers::read_json(&path, JsonFormat::Json)?)?
            }
            FileFormat::JsonLines => Table::from_frame_inferring_dates(readers::read_json(
                &path,
                JsonFormat::JsonLines,
            )?)?,
            FileFormat::Parquet => Table::from_frame(readers::read_parquet(&path)?)?,
        };

        info!(
            "Loaded {} ({}): {} rows x {} columns in {:.2?}",
            path.display(),
            format,
            table.height(),
            table.width(),
            start.elapsed()
        );
        Ok(table)
    }

    /// Write a table to disk, creating parent directories and overwriting
    /// any existing file.
    pub fn save(&self, table: &Table, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let path = self.resolve_path(path);
        let format = match options.format {
            Some(format) => format,
            None => FileFormat::from_path(&path)?,
        };

        match format {
            FileFormat::Csv => writers::write_csv(table.frame(), &path)?,
            FileFormat::Spreadsheet => spreadsheet::write_spreadsheet(table, &path)?,
            FileFormat::Json => writers::write_json(table.frame(), &path, JsonFormat::Json)?,
            FileFormat::JsonLines => {
                writers::write_json(table.frame(), &path, JsonFormat::JsonLines)?
            }
            FileFormat::Parquet => writers::write_parquet(table.frame(), &path)?,
        }

        info!(
            "Saved {} rows to {} ({})",
            table.height(),
            path.display(),
            format
        );
        Ok(())
    }

    /// Describe a table's shape, memory use, duplicates and missing data.
    pub fn describe(&self, table: &Table) -> Result<TableInfo> {
        DataProfiler::describe(table)
    }

    /// Return a cleaned copy of `table`.
    pub fn clean(&self, table: &Table, options: &CleanOptions) -> Result<Table> {
        DataCleaner::new(self.config.missing_text_token.clone()).clean(table, options)
    }

    /// Draw a seeded random sample of rows without replacement.
    pub fn sample(&self, table: &Table, options: &SampleOptions) -> Result<Table> {
        let sampled = sampling::sample_rows(table, options)?;
        debug!(
            "Sampled {} of {} rows (seed {})",
            sampled.height(),
            table.height(),
            options.seed
        );
        Ok(sampled)
    }

    /// Generate a random table for demos and tests.
    pub fn generate_synthetic(&self, options: &SyntheticOptions) -> Result<Table> {
        let table = sampling::synthetic_table(options)?;
        info!(
            "Generated synthetic table: {} rows x {} columns",
            table.height(),
            table.width()
        );
        Ok(table)
    }
}
