//! Supported file formats and per-call load/save options.

use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// On-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Excel workbook (`.xlsx`, `.xlsm`, `.xls`)
    Spreadsheet,
    /// A JSON array of records
    Json,
    /// One JSON record per line
    JsonLines,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| {
                InsightsError::UnsupportedFormat(format!(
                    "'{}' has no file extension",
                    path.display()
                ))
            })?;

        Self::from_extension(&extension)
            .ok_or_else(|| InsightsError::UnsupportedFormat(format!(".{}", extension)))
    }

    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" => Some(Self::Spreadsheet),
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "excel",
            Self::Json => "json",
            Self::JsonLines => "jsonl",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a format hint such as `"csv"`, `"excel"` or `"ndjson"`.
impl FromStr for FileFormat {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        let hint = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match hint.as_str() {
            "excel" | "spreadsheet" => Ok(Self::Spreadsheet),
            "jsonlines" | "json_lines" => Ok(Self::JsonLines),
            other => Self::from_extension(other)
                .ok_or_else(|| InsightsError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Options for [`crate::DataLoader::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Overrides extension-based detection.
    pub format: Option<FileFormat>,
    /// Worksheet name or 0-based index. Spreadsheets only; defaults to the
    /// first sheet.
    pub sheet: Option<String>,
}

impl LoadOptions {
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Options for [`crate::DataLoader::save`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Overrides extension-based detection.
    pub format: Option<FileFormat>,
}

impl SaveOptions {
    pub fn with_format(format: FileFormat) -> Self {
        Self {
            format: Some(format),
        }
    }
}
