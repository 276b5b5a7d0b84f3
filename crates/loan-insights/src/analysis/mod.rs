//! Domain summarizer for loan-application tables.
//!
//! [`LoanAnalyzer`] computes named aggregate views over a loaded [`Table`](crate::Table):
//! categorical and numeric distributions, cross-tabulations, status counts,
//! and the flat [`DashboardMetrics`] used by dashboard headers. Every view is
//! a pure function of the table and returns a serializable value.
//!
//! Explicitly requested columns must match exactly. The configured default
//! columns are matched exactly first and then case-insensitively.
//!
//! # Example
//!
//! ```rust,no_run
//! use loan_insights::{DataLoader, LoadOptions, LoanAnalyzer};
//!
//! let table = DataLoader::default().load("loans.csv", &LoadOptions::default())?;
//! let analyzer = LoanAnalyzer::default();
//!
//! let genders = analyzer.categorical_distribution(&table, "GENDER")?;
//! let metrics = analyzer.summary_metrics(&table)?;
//! println!("{}", serde_json::to_string_pretty(&metrics)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod distribution;
mod metrics;
mod statistics;
mod views;

pub use distribution::{CrossTable, Distribution, LabelShare};
pub use metrics::DashboardMetrics;
pub use statistics::NumericSummary;
pub use views::{
    AnalysisReport, ChartData, ColumnGroups, ColumnSummary, GeographicDistribution,
    LabeledSeries, LocationCounts, ValueSeries,
};

use crate::config::AnalyzerConfig;

/// Computes summary views over loan-application tables.
#[derive(Debug, Clone, Default)]
pub struct LoanAnalyzer {
    config: AnalyzerConfig,
}

impl LoanAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}
