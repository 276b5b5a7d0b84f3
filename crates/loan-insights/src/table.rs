//! The in-memory table shared by the loader and the analyzer.
//!
//! A [`Table`] wraps a Polars `DataFrame` and carries one [`ColumnKind`] tag
//! per column. Kinds are resolved once, when the table is built, and every
//! downstream operation dispatches on the tag instead of re-inspecting values.
//!
//! Tables are values: cleaning and sampling return new tables and nothing in
//! this crate mutates a table in place, so a loaded table can be shared across
//! threads for read-only analysis.

use crate::error::{InsightsError, Result};
use crate::utils::{is_float_dtype, is_integer_dtype, is_temporal_dtype, strings_as_dates};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use std::fmt;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
}

impl ColumnKind {
    /// Integer or float.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered collection of named, typed columns.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    kinds: Vec<ColumnKind>,
}

assert_impl_all!(Table: Send, Sync, Clone);

impl Table {
    /// Build a table from a DataFrame, normalizing physical types.
    ///
    /// All integer widths become `Int64`, `Float32` becomes `Float64`,
    /// dates and datetimes are kept, and any other type is cast to text.
    /// Float `NaN` entries become missing.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        Self::build(frame, false)
    }

    /// Like [`Table::from_frame`], but text columns whose every value is an
    /// ISO date are converted to dates. Used for formats that carry no date
    /// type of their own.
    pub fn from_frame_inferring_dates(frame: DataFrame) -> Result<Self> {
        Self::build(frame, true)
    }

    fn build(frame: DataFrame, infer_dates: bool) -> Result<Self> {
        let mut frame = frame;
        let names = column_name_list(&frame);
        let mut kinds = Vec::with_capacity(names.len());

        for name in &names {
            let series = frame.column(name)?.as_materialized_series().clone();
            let (normalized, kind) = normalize_series(&series, infer_dates)?;
            if normalized.dtype() != series.dtype()
                || normalized.null_count() != series.null_count()
            {
                frame.replace(name, normalized)?;
            }
            kinds.push(kind);
        }

        Ok(Self { frame, kinds })
    }

    /// The underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Estimated heap size in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.frame.estimated_size()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        column_name_list(&self.frame)
    }

    /// Iterate `(name, kind)` pairs in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnKind)> + '_ {
        self.frame
            .get_columns()
            .iter()
            .zip(self.kinds.iter().copied())
            .map(|(col, kind)| (col.name().as_str(), kind))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Kind of a column, if present.
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.position(name).map(|idx| self.kinds[idx])
    }

    /// Kind of a column, or `ColumnNotFound`.
    pub fn require_kind(&self, name: &str) -> Result<ColumnKind> {
        self.kind(name)
            .ok_or_else(|| InsightsError::ColumnNotFound(name.to_string()))
    }

    /// Borrow a column as a Series, or `ColumnNotFound`.
    pub fn series(&self, name: &str) -> Result<&Series> {
        self.position(name)
            .map(|idx| self.frame.get_columns()[idx].as_materialized_series())
            .ok_or_else(|| InsightsError::ColumnNotFound(name.to_string()))
    }

    /// Resolve a column name exactly, falling back to a case-insensitive match.
    pub fn resolve_column(&self, name: &str) -> Option<String> {
        if self.has_column(name) {
            return Some(name.to_string());
        }
        self.columns()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(candidate, _)| candidate.to_string())
    }

    /// Names of the columns whose kind satisfies `predicate`.
    pub fn columns_where(&self, predicate: impl Fn(ColumnKind) -> bool) -> Vec<String> {
        self.columns()
            .filter(|(_, kind)| predicate(*kind))
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Total number of missing entries.
    pub fn missing_count(&self) -> usize {
        self.frame
            .get_columns()
            .iter()
            .map(|col| col.null_count())
            .sum()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.frame
            .get_columns()
            .iter()
            .position(|col| col.name().as_str() == name)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.kinds == other.kinds && self.frame.equals_missing(&other.frame)
    }
}

fn column_name_list(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Map a Series onto its normalized physical type and semantic kind.
fn normalize_series(series: &Series, infer_dates: bool) -> Result<(Series, ColumnKind)> {
    let dtype = series.dtype();

    let normalized = if is_integer_dtype(dtype) {
        let series = if dtype == &DataType::Int64 {
            series.clone()
        } else {
            series.cast(&DataType::Int64)?
        };
        (series, ColumnKind::Integer)
    } else if is_float_dtype(dtype) {
        let series = if dtype == &DataType::Float64 {
            series.clone()
        } else {
            series.cast(&DataType::Float64)?
        };
        (nan_as_missing(series)?, ColumnKind::Float)
    } else if dtype == &DataType::Boolean {
        (series.clone(), ColumnKind::Boolean)
    } else if is_temporal_dtype(dtype) {
        (series.clone(), ColumnKind::Date)
    } else if dtype == &DataType::String {
        match infer_dates.then(|| strings_as_dates(series)).transpose()? {
            Some(Some(dates)) => (dates, ColumnKind::Date),
            _ => (series.clone(), ColumnKind::Text),
        }
    } else {
        (series.cast(&DataType::String)?, ColumnKind::Text)
    };

    Ok(normalized)
}

/// Replace `NaN` entries of a `Float64` Series with nulls.
fn nan_as_missing(series: Series) -> PolarsResult<Series> {
    let ca = series.f64()?;
    if !ca.into_iter().flatten().any(f64::is_nan) {
        return Ok(series);
    }
    let values: Vec<Option<f64>> = ca
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}
