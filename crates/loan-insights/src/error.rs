//! Error types for loading, cleaning and summarizing tables.
//!
//! Every failure surfaces as a distinct variant so dashboards and API layers
//! can present a specific message. Errors are serializable as
//! `{ "code": ..., "message": ... }` for JSON front ends.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the loader and the analyzer.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Requested path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File extension or format hint is not in the supported set.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// File exists with a supported format but its content could not be parsed.
    #[error("Failed to parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Numeric operation requested on a non-numeric column.
    #[error("Column '{column}' is not numeric (inferred type: {kind})")]
    NonNumericColumn { column: String, kind: String },

    /// Mutually exclusive or out-of-range arguments.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No non-missing values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Writing a table to disk failed.
    #[error("Failed to write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InsightsError>,
    },
}

impl InsightsError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        InsightsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NonNumericColumn { .. } => "NON_NUMERIC_COLUMN",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::Write { .. } => "WRITE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// HTTP status an API layer should answer with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::ColumnNotFound(_) => 404,
            Self::UnsupportedFormat(_)
            | Self::InvalidArgument(_)
            | Self::NonNumericColumn { .. }
            | Self::NoValidValues(_) => 400,
            Self::Parse { .. }
            | Self::Write { .. }
            | Self::Io(_)
            | Self::Polars(_)
            | Self::Json(_) => 500,
            Self::WithContext { source, .. } => source.http_status(),
        }
    }

    /// Check if this error is caused by the caller's input rather than a
    /// failure inside the library.
    pub fn is_recoverable(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for InsightsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InsightsError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for loader and analyzer operations.
pub type Result<T> = std::result::Result<T, InsightsError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightsError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            InsightsError::NotFound(PathBuf::from("missing.csv")).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            InsightsError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            InsightsError::NotFound(PathBuf::from("x.csv")).http_status(),
            404
        );
        assert_eq!(
            InsightsError::InvalidArgument("size".to_string()).http_status(),
            400
        );
        assert_eq!(
            InsightsError::Parse {
                path: PathBuf::from("bad.csv"),
                message: "unexpected eof".to_string(),
            }
            .http_status(),
            500
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(InsightsError::ColumnNotFound("Age".to_string()).is_recoverable());
        assert!(InsightsError::UnsupportedFormat(".txt".to_string()).is_recoverable());
        assert!(
            !InsightsError::Write {
                path: PathBuf::from("out.csv"),
                message: "disk full".to_string(),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = InsightsError::NonNumericColumn {
            column: "Gender".to_string(),
            kind: "text".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("NON_NUMERIC_COLUMN"));
        assert!(json.contains("Gender"));
    }

    #[test]
    fn test_with_context() {
        let error =
            InsightsError::ColumnNotFound("test".to_string()).with_context("During analysis");
        assert!(error.to_string().contains("During analysis"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(error.http_status(), 404);
    }

    #[test]
    fn test_parse_error_carries_parser_message() {
        let error = InsightsError::Parse {
            path: PathBuf::from("data.csv"),
            message: "found more fields than defined in 'Schema'".to_string(),
        };
        assert!(error.to_string().contains("more fields"));
        assert!(error.to_string().contains("data.csv"));
    }
}
