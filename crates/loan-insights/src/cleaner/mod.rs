//! Table cleaning: missing value handling and duplicate removal.
//!
//! Missing values are handled first and duplicates are removed afterwards,
//! so rows that only become identical once their gaps are filled collapse in
//! the same pass. Cleaning an already clean table returns an equal table.

mod duplicates;
mod imputation;

pub use duplicates::{duplicate_count, first_occurrence_mask, remove_duplicates};
pub use imputation::{drop_missing_rows, fill_missing, interpolate_missing};

use crate::config::{CleanOptions, MissingPolicy};
use crate::error::{Result, ResultExt};
use crate::table::Table;
use tracing::{debug, info};

/// Applies [`CleanOptions`] to a table.
#[derive(Debug, Clone)]
pub struct DataCleaner {
    missing_text_token: String,
}

impl DataCleaner {
    /// Create a cleaner that fills missing text entries with `missing_text_token`.
    pub fn new(missing_text_token: impl Into<String>) -> Self {
        Self {
            missing_text_token: missing_text_token.into(),
        }
    }

    /// Return a cleaned copy of `table`.
    pub fn clean(&self, table: &Table, options: &CleanOptions) -> Result<Table> {
        info!(
            "Cleaning {} rows (missing policy: {}, remove duplicates: {})",
            table.height(),
            options.missing_policy,
            options.remove_duplicates
        );

        let missing_before = table.missing_count();
        let frame = match options.missing_policy {
            MissingPolicy::Drop => drop_missing_rows(table.frame()),
            MissingPolicy::Fill => fill_missing(table, &self.missing_text_token),
            MissingPolicy::Interpolate => interpolate_missing(table),
        }
        .context("Failed to handle missing values")?;

        let after_missing = Table::from_frame(frame)?;
        if options.missing_policy == MissingPolicy::Drop {
            let dropped = table.height() - after_missing.height();
            debug!("Dropped {} rows with missing values", dropped);
        } else {
            let remaining = after_missing.missing_count();
            debug!(
                "Filled {} of {} missing values",
                missing_before - remaining,
                missing_before
            );
        }

        if !options.remove_duplicates {
            return Ok(after_missing);
        }

        let before = after_missing.height();
        let deduplicated = remove_duplicates(after_missing.frame())
            .context("Failed to remove duplicate rows")?;
        let removed = before - deduplicated.height();
        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }

        let cleaned = Table::from_frame(deduplicated)?;
        info!(
            "Cleaning finished: {} -> {} rows",
            table.height(),
            cleaned.height()
        );
        Ok(cleaned)
    }
}
