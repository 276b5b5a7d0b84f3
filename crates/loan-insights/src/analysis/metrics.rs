//! Flat dashboard metrics built from the default columns.

use super::distribution::Distribution;
use super::LoanAnalyzer;
use crate::error::{InsightsError, Result};
use crate::table::Table;
use crate::utils::{numeric_values, percentage, round2};
use serde::Serialize;
use tracing::warn;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Display-ready scalars for a dashboard header.
///
/// Views that depend on an absent or unusable default column are `null` and
/// the reason is listed in `warnings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_rows: usize,
    pub total_columns: usize,
    pub data_size_mb: f64,
    pub missing_data_percentage: f64,

    pub category_column: Option<String>,
    pub category_distribution: Option<Distribution>,

    pub numeric_column: Option<String>,
    pub numeric_mean: Option<f64>,

    pub status_column: Option<String>,
    pub top_status: Option<String>,
    /// Share of the approved label among non-missing statuses
    pub approval_rate: Option<f64>,

    /// Sum over numeric columns matching the amount keyword
    pub total_amount: Option<f64>,

    pub warnings: Vec<String>,
}

impl LoanAnalyzer {
    /// Build the dashboard metrics. Never fails because a default column is
    /// missing.
    pub fn summary_metrics(&self, table: &Table) -> Result<DashboardMetrics> {
        let mut warnings = Vec::new();
        let cells = table.height() * table.width();

        let mut metrics = DashboardMetrics {
            total_rows: table.height(),
            total_columns: table.width(),
            data_size_mb: round2(table.memory_bytes() as f64 / BYTES_PER_MB),
            missing_data_percentage: percentage(table.missing_count(), cells),
            category_column: None,
            category_distribution: None,
            numeric_column: None,
            numeric_mean: None,
            status_column: None,
            top_status: None,
            approval_rate: None,
            total_amount: None,
            warnings: Vec::new(),
        };

        match table.resolve_column(&self.config.categorical_column) {
            Some(column) => {
                metrics.category_distribution =
                    Some(self.categorical_distribution(table, &column)?);
                metrics.category_column = Some(column);
            }
            None => warnings.push(format!(
                "categorical column '{}' not found",
                self.config.categorical_column
            )),
        }

        match table.resolve_column(&self.config.numeric_column) {
            Some(column) => {
                match self.numeric_distribution(table, &column) {
                    Ok(summary) => metrics.numeric_mean = Some(round2(summary.mean)),
                    Err(e @ InsightsError::NonNumericColumn { .. })
                    | Err(e @ InsightsError::NoValidValues(_)) => warnings.push(e.to_string()),
                    Err(e) => return Err(e),
                }
                metrics.numeric_column = Some(column);
            }
            None => warnings.push(format!(
                "numeric column '{}' not found",
                self.config.numeric_column
            )),
        }

        match table.resolve_column(&self.config.status_column) {
            Some(column) => {
                let statuses = self.status_counts(table, &column)?;
                metrics.top_status = statuses.mode().map(str::to_string);
                let approved = statuses
                    .entries()
                    .iter()
                    .filter(|(label, _)| label.eq_ignore_ascii_case(&self.config.approved_label))
                    .map(|(_, share)| share.count)
                    .sum();
                metrics.approval_rate = Some(percentage(approved, statuses.total()));
                if statuses.is_empty() {
                    warnings.push(format!("status column '{}' has no values", column));
                }
                metrics.status_column = Some(column);
            }
            None => warnings.push(format!(
                "status column '{}' not found",
                self.config.status_column
            )),
        }

        metrics.total_amount = self.total_amount(table)?;

        for warning in &warnings {
            warn!("Dashboard metrics: {}", warning);
        }
        metrics.warnings = warnings;
        Ok(metrics)
    }

    /// Sum of every numeric column whose name contains the amount keyword.
    /// `None` when there is no such column.
    fn total_amount(&self, table: &Table) -> Result<Option<f64>> {
        let keyword = self.config.amount_keyword.to_uppercase();
        let columns: Vec<String> = table
            .columns()
            .filter(|(name, kind)| kind.is_numeric() && name.to_uppercase().contains(&keyword))
            .map(|(name, _)| name.to_string())
            .collect();
        if columns.is_empty() {
            return Ok(None);
        }

        let mut total = 0.0;
        for column in &columns {
            total += numeric_values(table.series(column)?)?.iter().sum::<f64>();
        }
        Ok(Some(round2(total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use polars::prelude::*;

    fn loans() -> Table {
        Table::from_frame(
            df![
                "GENDER" => ["Male", "Female", "Male", "Male"],
                "INCOME" => [Some(1000.0f64), Some(2000.0), None, Some(3000.0)],
                "STATUS" => ["Approved", "Rejected", "Approved", "approved"],
                "LOAN_AMOUNT" => [100i64, 200, 300, 400],
                "AMOUNT_PAID" => [Some(10.5f64), None, Some(0.25), Some(1.0)],
            ]
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_summary_metrics() {
        let metrics = LoanAnalyzer::default().summary_metrics(&loans()).unwrap();

        assert_eq!(metrics.total_rows, 4);
        assert_eq!(metrics.total_columns, 5);
        assert_eq!(metrics.missing_data_percentage, 10.0);
        assert_eq!(metrics.category_column.as_deref(), Some("GENDER"));
        assert_eq!(metrics.category_distribution.as_ref().unwrap().mode(), Some("Male"));
        assert_eq!(metrics.numeric_mean, Some(2000.0));
        assert_eq!(metrics.top_status.as_deref(), Some("Approved"));
        assert_eq!(metrics.approval_rate, Some(75.0));
        assert_eq!(metrics.total_amount, Some(1011.75));
        assert!(metrics.warnings.is_empty());
    }

    #[test]
    fn test_missing_default_columns_become_warnings() {
        let table = Table::from_frame(df!["x" => [1i64, 2]].unwrap()).unwrap();
        let metrics = LoanAnalyzer::default().summary_metrics(&table).unwrap();

        assert_eq!(metrics.total_rows, 2);
        assert!(metrics.category_distribution.is_none());
        assert!(metrics.numeric_mean.is_none());
        assert!(metrics.top_status.is_none());
        assert!(metrics.total_amount.is_none());
        assert_eq!(metrics.warnings.len(), 3);
    }

    #[test]
    fn test_default_columns_resolve_case_insensitively() {
        let frame = df!["Gender" => ["Female"], "Income" => [5.0f64]].unwrap();
        let table = Table::from_frame(frame).unwrap();
        let metrics = LoanAnalyzer::default().summary_metrics(&table).unwrap();
        assert_eq!(metrics.category_column.as_deref(), Some("Gender"));
        assert_eq!(metrics.numeric_mean, Some(5.0));
    }

    #[test]
    fn test_text_numeric_default_is_a_warning() {
        let config = AnalyzerConfig::builder()
            .numeric_column("GENDER")
            .build()
            .unwrap();
        let metrics = LoanAnalyzer::new(config).summary_metrics(&loans()).unwrap();
        assert!(metrics.numeric_mean.is_none());
        assert!(metrics.warnings.iter().any(|w| w.contains("not numeric")));
    }

    #[test]
    fn test_metrics_serialize_absent_as_null() {
        let table = Table::from_frame(df!["x" => [1i64]].unwrap()).unwrap();
        let metrics = LoanAnalyzer::default().summary_metrics(&table).unwrap();
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json["numeric_mean"].is_null());
        assert_eq!(json["warnings"].as_array().unwrap().len(), 3);
    }
}
