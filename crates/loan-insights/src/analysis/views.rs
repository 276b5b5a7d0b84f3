//! Composite views: column groups, geography, per-column summaries, chart
//! series and the bundled analysis report.

use super::distribution::Distribution;
use super::statistics::NumericSummary;
use super::LoanAnalyzer;
use crate::error::{InsightsError, Result};
use crate::table::{ColumnKind, Table};
use crate::utils::{numeric_values, percentage};
use serde::Serialize;
use std::collections::BTreeMap;

const PERSONAL_KEYWORDS: &[&str] = &[
    "NAME",
    "GENDER",
    "AGE",
    "BIRTH",
    "MARITAL",
    "EDUCATION",
    "QUALIFICATION",
];
const FINANCIAL_KEYWORDS: &[&str] = &[
    "INCOME", "SALARY", "AMOUNT", "VALUE", "WORTH", "BANK", "ACCOUNT",
];
const ADDRESS_KEYWORDS: &[&str] = &[
    "ADDRESS",
    "CITY",
    "STATE",
    "PIN",
    "LOCATION",
    "LATITUDE",
    "LONGITUDE",
];
const EMPLOYMENT_KEYWORDS: &[&str] = &[
    "EMPLOYMENT",
    "EMPLOYER",
    "EXPERIENCE",
    "DESIGNATION",
    "BUSINESS",
    "OCCUPATION",
];
const LOAN_KEYWORDS: &[&str] = &[
    "LOAN",
    "APPLICATION",
    "DISBURSED",
    "AMOUNT",
    "RATE",
    "STATUS",
    "APPROVED",
];

/// Labels kept per column by [`LoanAnalyzer::column_summary`].
const SUMMARY_TOP_VALUES: usize = 5;

/// Columns grouped by subject. A column can belong to several groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnGroups {
    pub personal: Vec<String>,
    pub financial: Vec<String>,
    pub address: Vec<String>,
    pub employment: Vec<String>,
    pub loan: Vec<String>,
}

/// Top labels of one location column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCounts {
    pub column: String,
    pub top: Distribution,
    /// Distinct non-missing labels in the whole column
    pub distinct: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeographicDistribution {
    pub states: Option<LocationCounts>,
    pub cities: Option<LocationCounts>,
}

/// Profile of one column. Numeric columns carry `stats`, the others carry
/// their most frequent values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub missing_pct: f64,
    pub distinct: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_values: Option<Distribution>,
}

/// Labels and values for a bar or pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeries {
    pub column: String,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl LabeledSeries {
    fn from_distribution(column: String, distribution: &Distribution) -> Self {
        Self {
            column,
            labels: distribution.labels().into_iter().map(String::from).collect(),
            values: distribution.counts(),
        }
    }
}

/// Raw values for a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueSeries {
    pub column: String,
    pub values: Vec<f64>,
}

/// Series for the dashboard charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub category_distribution: Option<LabeledSeries>,
    pub income_distribution: Option<ValueSeries>,
    pub application_status: Option<LabeledSeries>,
}

/// The named analysis views of a loan table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub gender_distribution: Option<Distribution>,
    pub income_stats: BTreeMap<String, NumericSummary>,
    pub loan_amount_stats: BTreeMap<String, NumericSummary>,
    pub status_counts: Option<Distribution>,
    pub geographic: GeographicDistribution,
    pub column_groups: ColumnGroups,
}

fn columns_matching(table: &Table, keywords: &[&str]) -> Vec<String> {
    table
        .columns()
        .map(|(name, _)| name)
        .filter(|name| {
            let upper = name.to_uppercase();
            keywords.iter().any(|keyword| upper.contains(keyword))
        })
        .map(String::from)
        .collect()
}

impl LoanAnalyzer {
    /// Group columns by subject using keywords on the upper-cased name.
    pub fn column_groups(&self, table: &Table) -> ColumnGroups {
        ColumnGroups {
            personal: columns_matching(table, PERSONAL_KEYWORDS),
            financial: columns_matching(table, FINANCIAL_KEYWORDS),
            address: columns_matching(table, ADDRESS_KEYWORDS),
            employment: columns_matching(table, EMPLOYMENT_KEYWORDS),
            loan: columns_matching(table, LOAN_KEYWORDS),
        }
    }

    /// Top state and city labels for the configured location columns.
    pub fn geographic_distribution(&self, table: &Table) -> Result<GeographicDistribution> {
        Ok(GeographicDistribution {
            states: self.location_counts(table, &self.config.state_column)?,
            cities: self.location_counts(table, &self.config.city_column)?,
        })
    }

    fn location_counts(&self, table: &Table, column: &str) -> Result<Option<LocationCounts>> {
        let Some(column) = table.resolve_column(column) else {
            return Ok(None);
        };
        let distribution = self.categorical_distribution(table, &column)?;
        Ok(Some(LocationCounts {
            distinct: distribution.len(),
            top: distribution.top(self.config.top_n),
            column,
        }))
    }

    /// Per-column kind, missing data and either numeric statistics or the
    /// most frequent values.
    pub fn column_summary(&self, table: &Table) -> Result<Vec<ColumnSummary>> {
        let mut summaries = Vec::with_capacity(table.width());

        for (name, kind) in table.columns() {
            let series = table.series(name)?;
            let missing = series.null_count();

            let (stats, top_values) = if kind.is_numeric() {
                match self.numeric_distribution(table, name) {
                    Ok(summary) => (Some(summary), None),
                    Err(InsightsError::NoValidValues(_)) => (None, None),
                    Err(e) => return Err(e),
                }
            } else {
                let distribution = self.categorical_distribution(table, name)?;
                (None, Some(distribution.top(SUMMARY_TOP_VALUES)))
            };

            summaries.push(ColumnSummary {
                name: name.to_string(),
                kind,
                missing,
                missing_pct: percentage(missing, table.height()),
                distinct: series.drop_nulls().n_unique()?,
                stats,
                top_values,
            });
        }

        Ok(summaries)
    }

    /// Label/value series for the default category, the first income column
    /// and the status column.
    pub fn chart_data(&self, table: &Table) -> Result<ChartData> {
        let mut charts = ChartData::default();

        if let Some(column) = table.resolve_column(&self.config.categorical_column) {
            let distribution = self.categorical_distribution(table, &column)?;
            charts.category_distribution =
                Some(LabeledSeries::from_distribution(column, &distribution));
        }

        let keyword = self.config.income_keyword.to_uppercase();
        let income_column = table
            .columns()
            .find(|(name, kind)| kind.is_numeric() && name.to_uppercase().contains(&keyword))
            .map(|(name, _)| name.to_string());
        if let Some(column) = income_column {
            let values = numeric_values(table.series(&column)?)?;
            charts.income_distribution = Some(ValueSeries { column, values });
        }

        if let Some(column) = table.resolve_column(&self.config.status_column) {
            let distribution = self.status_counts(table, &column)?.top(self.config.top_n);
            charts.application_status =
                Some(LabeledSeries::from_distribution(column, &distribution));
        }

        Ok(charts)
    }

    /// Run every named view. Views whose default column is absent are empty.
    pub fn analyze(&self, table: &Table) -> Result<AnalysisReport> {
        let gender_distribution = match table.resolve_column(&self.config.categorical_column) {
            Some(column) => Some(self.categorical_distribution(table, &column)?),
            None => None,
        };
        let status_counts = match table.resolve_column(&self.config.status_column) {
            Some(column) => Some(self.status_counts(table, &column)?),
            None => None,
        };

        Ok(AnalysisReport {
            gender_distribution,
            income_stats: self.keyword_numeric_stats(table, &self.config.income_keyword)?,
            loan_amount_stats: self.keyword_numeric_stats(table, &self.config.amount_keyword)?,
            status_counts,
            geographic: self.geographic_distribution(table)?,
            column_groups: self.column_groups(table),
        })
    }
}
