//! Configuration and option types for the loader and the analyzer.
//!
//! Long-lived settings (`LoaderConfig`, `AnalyzerConfig`) use the builder
//! pattern and are validated on `build()`. Per-call options (`CleanOptions`,
//! `SampleOptions`, `SyntheticOptions`) are validated at the call boundary,
//! before any computation begins.

use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Seed used by sampling and synthetic generation unless the caller picks one.
pub const DEFAULT_SEED: u64 = 42;

// =============================================================================
// Cleaning Options
// =============================================================================

/// Strategy for handling missing values during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Remove rows containing any missing value
    #[default]
    Drop,
    /// Numeric → column mean, text → placeholder token, boolean → mode,
    /// date → forward then backward fill
    Fill,
    /// Linear interpolation of numeric gaps along row order
    Interpolate,
}

impl MissingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Fill => "fill",
            Self::Interpolate => "interpolate",
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingPolicy {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "fill" => Ok(Self::Fill),
            "interpolate" => Ok(Self::Interpolate),
            other => Err(InsightsError::InvalidArgument(format!(
                "unknown missing-value policy '{}' (expected drop, fill or interpolate)",
                other
            ))),
        }
    }
}

/// Options for [`crate::DataLoader::clean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Whether to remove duplicate rows (first occurrence is kept).
    /// Default: true
    pub remove_duplicates: bool,

    /// How missing values are handled.
    /// Default: Drop
    pub missing_policy: MissingPolicy,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            missing_policy: MissingPolicy::default(),
        }
    }
}

impl CleanOptions {
    pub fn new(remove_duplicates: bool, missing_policy: MissingPolicy) -> Self {
        Self {
            remove_duplicates,
            missing_policy,
        }
    }
}

// =============================================================================
// Sampling Options
// =============================================================================

/// Options for [`crate::DataLoader::sample`].
///
/// Exactly one of `size` and `fraction` must be set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleOptions {
    /// Number of rows to draw.
    pub size: Option<usize>,
    /// Fraction of rows to draw, in (0, 1].
    pub fraction: Option<f64>,
    /// Seed of the row selection.
    /// Default: 42
    pub seed: u64,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            size: None,
            fraction: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl SampleOptions {
    /// Sample a fixed number of rows.
    pub fn size(size: usize) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Sample a fraction of the rows.
    pub fn fraction(fraction: f64) -> Self {
        Self {
            fraction: Some(fraction),
            ..Self::default()
        }
    }

    /// Override the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate against a table of `rows` rows and return the number of rows
    /// to draw.
    pub fn resolve_count(&self, rows: usize) -> Result<usize> {
        match (self.size, self.fraction) {
            (Some(_), Some(_)) => Err(InsightsError::InvalidArgument(
                "sample size and fraction are mutually exclusive".to_string(),
            )),
            (None, None) => Err(InsightsError::InvalidArgument(
                "one of sample size or fraction is required".to_string(),
            )),
            (Some(size), None) => {
                if size > rows {
                    Err(InsightsError::InvalidArgument(format!(
                        "sample size {} exceeds row count {}",
                        size, rows
                    )))
                } else {
                    Ok(size)
                }
            }
            (None, Some(fraction)) => {
                if !(fraction > 0.0 && fraction <= 1.0) {
                    Err(InsightsError::InvalidArgument(format!(
                        "sample fraction {} is outside (0, 1]",
                        fraction
                    )))
                } else {
                    Ok(((fraction * rows as f64).round() as usize).min(rows))
                }
            }
        }
    }
}

// =============================================================================
// Synthetic Data Options
// =============================================================================

/// Options for [`crate::DataLoader::generate_synthetic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticOptions {
    /// Number of rows. Default: 1000
    pub rows: usize,
    /// Number of columns excluding the optional date column. Default: 5
    pub columns: usize,
    /// Whether to append a `date` column. Default: true
    pub include_dates: bool,
    /// Default: 42
    pub seed: u64,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            rows: 1000,
            columns: 5,
            include_dates: true,
            seed: DEFAULT_SEED,
        }
    }
}

impl SyntheticOptions {
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(InsightsError::InvalidArgument(
                "synthetic tables need at least one column".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Loader Configuration
// =============================================================================

/// Configuration for [`crate::DataLoader`].
///
/// Use [`LoaderConfig::builder()`] for a fluent setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory that relative paths are resolved against.
    /// If None, relative paths are resolved against the working directory.
    /// Default: None
    pub data_dir: Option<PathBuf>,

    /// Number of rows used for CSV schema inference.
    /// Default: 1000
    pub infer_schema_length: usize,

    /// Row chunk size hint. Loading is always eager; this is kept for callers
    /// that batch their own work.
    /// Default: 10000
    pub chunk_size: usize,

    /// Placeholder written into missing text entries by the fill policy.
    /// Default: "Unknown"
    pub missing_text_token: String,

    /// CSV field values read as missing, in addition to empty fields.
    /// Default: [`DEFAULT_NULL_VALUES`]
    pub null_values: Vec<String>,
}

/// Field values that mark a missing entry in delimited files.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "NA", "N/A", "n/a", "#N/A", "#NA", "<NA>", "NaN", "nan", "-NaN", "-nan", "null", "NULL",
    "None",
];

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            infer_schema_length: 1000,
            chunk_size: 10_000,
            missing_text_token: "Unknown".to_string(),
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LoaderConfig {
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.infer_schema_length == 0 {
            return Err(ConfigValidationError::ZeroValue(
                "infer_schema_length".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ConfigValidationError::ZeroValue("chunk_size".to_string()));
        }
        if self.missing_text_token.is_empty() {
            return Err(ConfigValidationError::EmptyName(
                "missing_text_token".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`LoaderConfig`].
#[derive(Debug, Default)]
pub struct LoaderConfigBuilder {
    data_dir: Option<PathBuf>,
    infer_schema_length: Option<usize>,
    chunk_size: Option<usize>,
    missing_text_token: Option<String>,
    null_values: Option<Vec<String>>,
}

impl LoaderConfigBuilder {
    /// Set the directory relative paths are resolved against.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the number of rows sampled for CSV type inference.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    pub fn chunk_size(mut self, rows: usize) -> Self {
        self.chunk_size = Some(rows);
        self
    }

    /// Set the placeholder used when filling missing text entries.
    pub fn missing_text_token(mut self, token: impl Into<String>) -> Self {
        self.missing_text_token = Some(token.into());
        self
    }

    /// Replace the CSV field values that are read as missing.
    pub fn null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> std::result::Result<LoaderConfig, ConfigValidationError> {
        let defaults = LoaderConfig::default();
        let config = LoaderConfig {
            data_dir: self.data_dir,
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            missing_text_token: self
                .missing_text_token
                .unwrap_or(defaults.missing_text_token),
            null_values: self.null_values.unwrap_or(defaults.null_values),
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Analyzer Configuration
// =============================================================================

/// Configuration for [`crate::LoanAnalyzer`]: the default columns and keywords
/// of the loan-application schema.
///
/// None of the columns are required to exist; views that depend on an absent
/// default column are skipped and reported as warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Default categorical column for the dashboard distribution.
    /// Default: "GENDER"
    pub categorical_column: String,

    /// Default numeric column for the dashboard mean.
    /// Default: "INCOME"
    pub numeric_column: String,

    /// Default application status column.
    /// Default: "STATUS"
    pub status_column: String,

    /// Status label counted as an approval.
    /// Default: "Approved"
    pub approved_label: String,

    /// Keyword selecting income columns.
    /// Default: "INCOME"
    pub income_keyword: String,

    /// Keyword selecting loan amount columns.
    /// Default: "AMOUNT"
    pub amount_keyword: String,

    /// Column holding the applicant's state code.
    /// Default: "ADDRESS_STATE_CODE"
    pub state_column: String,

    /// Column holding the applicant's city code.
    /// Default: "ADDRESS_CITY_CODE"
    pub city_column: String,

    /// Number of labels kept by top-N views.
    /// Default: 10
    pub top_n: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            categorical_column: "GENDER".to_string(),
            numeric_column: "INCOME".to_string(),
            status_column: "STATUS".to_string(),
            approved_label: "Approved".to_string(),
            income_keyword: "INCOME".to_string(),
            amount_keyword: "AMOUNT".to_string(),
            state_column: "ADDRESS_STATE_CODE".to_string(),
            city_column: "ADDRESS_CITY_CODE".to_string(),
            top_n: 10,
        }
    }
}

impl AnalyzerConfig {
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        let names = [
            ("categorical_column", &self.categorical_column),
            ("numeric_column", &self.numeric_column),
            ("status_column", &self.status_column),
            ("income_keyword", &self.income_keyword),
            ("amount_keyword", &self.amount_keyword),
            ("state_column", &self.state_column),
            ("city_column", &self.city_column),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyName(field.to_string()));
            }
        }
        if self.top_n == 0 {
            return Err(ConfigValidationError::ZeroValue("top_n".to_string()));
        }
        Ok(())
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    categorical_column: Option<String>,
    numeric_column: Option<String>,
    status_column: Option<String>,
    approved_label: Option<String>,
    income_keyword: Option<String>,
    amount_keyword: Option<String>,
    state_column: Option<String>,
    city_column: Option<String>,
    top_n: Option<usize>,
}

impl AnalyzerConfigBuilder {
    pub fn categorical_column(mut self, column: impl Into<String>) -> Self {
        self.categorical_column = Some(column.into());
        self
    }

    pub fn numeric_column(mut self, column: impl Into<String>) -> Self {
        self.numeric_column = Some(column.into());
        self
    }

    pub fn status_column(mut self, column: impl Into<String>) -> Self {
        self.status_column = Some(column.into());
        self
    }

    /// Set the status label counted towards the approval rate.
    pub fn approved_label(mut self, label: impl Into<String>) -> Self {
        self.approved_label = Some(label.into());
        self
    }

    pub fn income_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.income_keyword = Some(keyword.into());
        self
    }

    pub fn amount_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.amount_keyword = Some(keyword.into());
        self
    }

    pub fn state_column(mut self, column: impl Into<String>) -> Self {
        self.state_column = Some(column.into());
        self
    }

    pub fn city_column(mut self, column: impl Into<String>) -> Self {
        self.city_column = Some(column.into());
        self
    }

    /// Set how many labels the top-N views keep.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn build(self) -> std::result::Result<AnalyzerConfig, ConfigValidationError> {
        let defaults = AnalyzerConfig::default();
        let config = AnalyzerConfig {
            categorical_column: self
                .categorical_column
                .unwrap_or(defaults.categorical_column),
            numeric_column: self.numeric_column.unwrap_or(defaults.numeric_column),
            status_column: self.status_column.unwrap_or(defaults.status_column),
            approved_label: self.approved_label.unwrap_or(defaults.approved_label),
            income_keyword: self.income_keyword.unwrap_or(defaults.income_keyword),
            amount_keyword: self.amount_keyword.unwrap_or(defaults.amount_keyword),
            state_column: self.state_column.unwrap_or(defaults.state_column),
            city_column: self.city_column.unwrap_or(defaults.city_column),
            top_n: self.top_n.unwrap_or(defaults.top_n),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{0}': must be greater than zero")]
    ZeroValue(String),

    #[error("Invalid value for '{0}': must not be empty")]
    EmptyName(String),
}

impl From<ConfigValidationError> for InsightsError {
    fn from(err: ConfigValidationError) -> Self {
        InsightsError::InvalidArgument(err.to_string())
    }
}
