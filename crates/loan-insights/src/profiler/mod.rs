//! Table profiling: shape, memory, duplicates and per-column missing counts.

use crate::cleaner::duplicate_count;
use crate::error::Result;
use crate::table::{ColumnKind, Table};
use crate::utils::percentage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-column profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    /// Share of missing entries, 0-100, rounded to two decimals
    pub missing_pct: f64,
    /// Number of distinct non-missing values
    pub distinct: usize,
}

/// Summary of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: usize,
    pub memory_bytes: usize,
    pub duplicate_rows: usize,
    pub total_missing: usize,
    pub column_info: Vec<ColumnInfo>,
    pub numeric_columns: Vec<String>,
    pub text_columns: Vec<String>,
    pub date_columns: Vec<String>,
    pub boolean_columns: Vec<String>,
}

/// Profiles tables without modifying them.
pub struct DataProfiler;

impl DataProfiler {
    /// Describe the structure and missing data of a table.
    pub fn describe(table: &Table) -> Result<TableInfo> {
        let mut column_info = Vec::with_capacity(table.width());

        for (name, kind) in table.columns() {
            let series = table.series(name)?;
            let missing = series.null_count();
            let distinct = series.drop_nulls().n_unique()?;
            column_info.push(ColumnInfo {
                name: name.to_string(),
                kind,
                missing,
                missing_pct: percentage(missing, table.height()),
                distinct,
            });
        }

        let duplicate_rows = duplicate_count(table.frame())?;
        debug!(
            "Profiled {} columns, {} duplicate rows",
            column_info.len(),
            duplicate_rows
        );

        Ok(TableInfo {
            rows: table.height(),
            columns: table.width(),
            memory_bytes: table.memory_bytes(),
            duplicate_rows,
            total_missing: table.missing_count(),
            column_info,
            numeric_columns: table.columns_where(|k| k.is_numeric()),
            text_columns: table.columns_where(|k| k == ColumnKind::Text),
            date_columns: table.columns_where(|k| k == ColumnKind::Date),
            boolean_columns: table.columns_where(|k| k == ColumnKind::Boolean),
        })
    }
}
