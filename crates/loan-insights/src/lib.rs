//! Loan Application Insights Library
//!
//! The data core of a loan-application analytics dashboard, built with Rust
//! and Polars.
//!
//! # Overview
//!
//! The library has two halves:
//!
//! - **Tabular Data Loader** ([`DataLoader`]): reads CSV, Excel, JSON, JSON
//!   Lines and Parquet files into a typed [`Table`], writes them back, and
//!   prepares them with describe, clean, sample and synthetic generation
//! - **Domain Summarizer** ([`LoanAnalyzer`]): named aggregate views over a
//!   loaded table (categorical and numeric distributions, cross-tabulation,
//!   status counts) and a flat [`DashboardMetrics`] record for display
//!
//! Every result type implements `serde::Serialize`, so dashboards and HTTP
//! layers can pass results straight to JSON.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use loan_insights::{
//!     CleanOptions, DataLoader, LoadOptions, LoanAnalyzer, MissingPolicy, SampleOptions,
//! };
//!
//! let loader = DataLoader::default();
//! let table = loader.load("data/loan_applications.csv", &LoadOptions::default())?;
//!
//! // Fill gaps instead of dropping rows, then keep a reproducible 10% sample
//! let cleaned = loader.clean(&table, &CleanOptions::new(true, MissingPolicy::Fill))?;
//! let sample = loader.sample(&cleaned, &SampleOptions::fraction(0.1).with_seed(7))?;
//!
//! let analyzer = LoanAnalyzer::default();
//! let genders = analyzer.categorical_distribution(&sample, "GENDER")?;
//! for (label, share) in genders.entries() {
//!     println!("{label}: {} ({:.2}%)", share.count, share.pct);
//! }
//! # Ok::<(), loan_insights::InsightsError>(())
//! ```
//!
//! # Configuration
//!
//! [`LoaderConfig`] and [`AnalyzerConfig`] carry the long-lived settings.
//! Both have builders that validate on `build()`:
//!
//! ```rust
//! use loan_insights::{AnalyzerConfig, LoaderConfig};
//!
//! let loader_config = LoaderConfig::builder()
//!     .data_dir("data")
//!     .missing_text_token("N/A")
//!     .build()?;
//!
//! let analyzer_config = AnalyzerConfig::builder()
//!     .categorical_column("SEX")
//!     .status_column("APPLICATION_STATUS")
//!     .top_n(5)
//!     .build()?;
//! # Ok::<(), loan_insights::ConfigValidationError>(())
//! ```
//!
//! # Errors
//!
//! All operations return [`InsightsError`]. Each variant has a stable
//! [`error_code`](InsightsError::error_code) and an
//! [`http_status`](InsightsError::http_status) hint for API layers.

pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod profiler;
pub mod table;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{
    AnalysisReport, ChartData, ColumnGroups, ColumnSummary, CrossTable, DashboardMetrics,
    Distribution, GeographicDistribution, LabelShare, LoanAnalyzer, NumericSummary,
};
pub use cleaner::DataCleaner;
pub use config::{
    AnalyzerConfig, AnalyzerConfigBuilder, CleanOptions, ConfigValidationError,
    DEFAULT_NULL_VALUES, DEFAULT_SEED, LoaderConfig, LoaderConfigBuilder, MissingPolicy,
    SampleOptions, SyntheticOptions,
};
pub use error::{InsightsError, Result, ResultExt};
pub use loader::{ColumnInfo, DataLoader, FileFormat, LoadOptions, SaveOptions, TableInfo};
pub use profiler::DataProfiler;
pub use table::{ColumnKind, Table};
