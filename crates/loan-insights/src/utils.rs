//! Shared utilities for tables, loaders and analysis views.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a date or datetime type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

// =============================================================================
// Date Parsing Utilities
// =============================================================================

/// Days between 0001-01-01 and the Unix epoch, as used by `NaiveDate::num_days_from_ce`.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Format used when datetimes are written as text.
pub const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse an ISO-style date or datetime string into a date.
///
/// Only the date part is kept; `2024-01-05T10:30:00` becomes `2024-01-05`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    parse_iso_datetime(s).map(|dt| dt.date())
}

/// Parse an ISO-style date or datetime string. A bare date is midnight.
pub fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", DATETIME_TEXT_FORMAT];
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Convert the physical value of a Polars `Datetime` into a naive datetime.
pub fn datetime_from_physical(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    utc.map(|dt| dt.naive_utc())
}

/// Convert a naive datetime into the physical value of a Polars `Datetime`.
pub fn datetime_to_physical(datetime: NaiveDateTime, unit: TimeUnit) -> Option<i64> {
    let utc = datetime.and_utc();
    match unit {
        TimeUnit::Nanoseconds => utc.timestamp_nanos_opt(),
        TimeUnit::Microseconds => Some(utc.timestamp_micros()),
        TimeUnit::Milliseconds => Some(utc.timestamp_millis()),
    }
}

/// Convert a date to the physical representation of Polars' `Date` type.
#[inline]
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Build a `Date` Series from optional dates.
pub fn date_series(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Series> {
    let days: Vec<Option<i32>> = dates
        .iter()
        .map(|d| d.map(date_to_epoch_days))
        .collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

/// Try to reinterpret a string Series as dates.
///
/// Returns `None` unless the Series has at least one non-null value and every
/// non-null value parses as an ISO date.
pub fn strings_as_dates(series: &Series) -> PolarsResult<Option<Series>> {
    let ca = series.str()?;
    let mut parsed = Vec::with_capacity(ca.len());
    let mut any_value = false;

    for value in ca.into_iter() {
        match value {
            Some(s) => match parse_iso_date(s) {
                Some(date) => {
                    any_value = true;
                    parsed.push(Some(date));
                }
                None => return Ok(None),
            },
            None => parsed.push(None),
        }
    }

    if !any_value {
        return Ok(None);
    }
    date_series(series.name().as_str(), &parsed).map(Some)
}

// =============================================================================
// Value Formatting Utilities
// =============================================================================

/// Render every entry of a Series as an optional display label.
///
/// Missing entries stay `None`. Non-text columns use Polars' string cast, so
/// booleans become `true`/`false` and dates become `YYYY-MM-DD`.
pub fn series_labels(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let as_text = series.cast(&DataType::String)?;
    let ca = as_text.str()?;
    Ok(ca
        .into_iter()
        .map(|value| value.map(|s| s.to_string()))
        .collect())
}

/// Collect the non-null values of a numeric Series as `f64`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    let ca = float_series.f64()?;
    Ok(ca.into_iter().flatten().collect())
}

/// Round to two decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `count` over `total`, rounded to two decimals. Zero when
/// `total` is zero.
#[inline]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(count as f64 / total as f64 * 100.0)
    }
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// Quantile of an already sorted slice using linear interpolation between
/// the two nearest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

// =============================================================================
// Tests
// =============================================================================
