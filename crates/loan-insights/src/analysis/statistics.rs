//! Numeric summaries of single columns and keyword-selected column groups.

use super::LoanAnalyzer;
use crate::error::{InsightsError, Result};
use crate::table::Table;
use crate::utils::{numeric_values, quantile_sorted, sample_std};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Distribution summary of a numeric column. Missing entries are excluded
/// from every statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); zero for a single value
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub sum: f64,
}

impl NumericSummary {
    /// Summarize `values`. `None` when there are no values.
    pub fn from_values(values: &[f64], missing: usize) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let sum: f64 = sorted.iter().sum();

        // Constant columns report their value exactly
        let (mean, std) = if min == max {
            (min, 0.0)
        } else {
            (sum / sorted.len() as f64, sample_std(&sorted))
        };

        Some(Self {
            count: sorted.len(),
            missing,
            mean,
            median: quantile_sorted(&sorted, 0.5)?,
            std,
            min,
            max,
            q1: quantile_sorted(&sorted, 0.25)?,
            q3: quantile_sorted(&sorted, 0.75)?,
            sum,
        })
    }
}

impl LoanAnalyzer {
    /// Summary statistics of a numeric column.
    ///
    /// Fails with `NonNumericColumn` for non-numeric columns and with
    /// `NoValidValues` when every entry is missing.
    pub fn numeric_distribution(&self, table: &Table, column: &str) -> Result<NumericSummary> {
        let kind = table.require_kind(column)?;
        if !kind.is_numeric() {
            return Err(InsightsError::NonNumericColumn {
                column: column.to_string(),
                kind: kind.to_string(),
            });
        }

        let series = table.series(column)?;
        let values = numeric_values(series)?;
        NumericSummary::from_values(&values, series.null_count())
            .ok_or_else(|| InsightsError::NoValidValues(column.to_string()))
    }

    /// Summaries of every numeric column whose upper-cased name contains
    /// `keyword`. Columns without any value are skipped.
    pub fn keyword_numeric_stats(
        &self,
        table: &Table,
        keyword: &str,
    ) -> Result<BTreeMap<String, NumericSummary>> {
        let keyword = keyword.to_uppercase();
        let mut stats = BTreeMap::new();

        for (name, kind) in table.columns() {
            if !kind.is_numeric() || !name.to_uppercase().contains(&keyword) {
                continue;
            }
            match self.numeric_distribution(table, name) {
                Ok(summary) => {
                    stats.insert(name.to_string(), summary);
                }
                Err(InsightsError::NoValidValues(_)) => {
                    debug!("Skipping '{}': no values", name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(stats)
    }
}
