//! Categorical distributions, status counts and cross-tabulation.

use super::LoanAnalyzer;
use crate::error::Result;
use crate::table::Table;
use crate::utils::{percentage, series_labels};
use polars::prelude::*;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Count and share of one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub count: usize,
    /// Percentage of non-missing entries, rounded to two decimals
    pub pct: f64,
}

/// Label counts ranked by descending count, ties broken by label.
///
/// Serializes as a JSON object in ranking order:
/// `{"Male": {"count": 3, "pct": 75.0}, "Female": {"count": 1, "pct": 25.0}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    entries: Vec<(String, LabelShare)>,
    total: usize,
    missing: usize,
}

impl Distribution {
    /// Count every label of a Series. Missing entries are excluded from both
    /// the counts and the percentage denominator.
    pub fn from_series(series: &Series) -> PolarsResult<Self> {
        let labels = series_labels(series)?;
        let missing = labels.iter().filter(|l| l.is_none()).count();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for label in labels.into_iter().flatten() {
            *counts.entry(label).or_insert(0) += 1;
        }
        let total: usize = counts.values().sum();

        let mut entries: Vec<(String, LabelShare)> = counts
            .into_iter()
            .map(|(label, count)| {
                let share = LabelShare {
                    count,
                    pct: percentage(count, total),
                };
                (label, share)
            })
            .collect();
        entries.sort_by(|(la, a), (lb, b)| b.count.cmp(&a.count).then_with(|| la.cmp(lb)));

        Ok(Self {
            entries,
            total,
            missing,
        })
    }

    /// Keep the `n` highest ranked labels. Percentages stay relative to the
    /// full non-missing total.
    pub fn top(&self, n: usize) -> Self {
        Self {
            entries: self.entries.iter().take(n).cloned().collect(),
            total: self.total,
            missing: self.missing,
        }
    }

    /// Ranked `(label, share)` pairs.
    pub fn entries(&self) -> &[(String, LabelShare)] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&LabelShare> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, share)| share)
    }

    /// Highest ranked label.
    pub fn mode(&self) -> Option<&str> {
        self.entries.first().map(|(label, _)| label.as_str())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, s)| s.count).collect()
    }

    /// Number of non-missing entries counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of missing entries skipped.
    pub fn missing(&self) -> usize {
        self.missing
    }

    /// Number of labels kept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Distribution {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, share) in &self.entries {
            map.serialize_entry(label, share)?;
        }
        map.end()
    }
}

/// Contingency table: primary label -> secondary label -> count.
pub type CrossTable = BTreeMap<String, BTreeMap<String, usize>>;

impl LoanAnalyzer {
    /// Count and share of every label in `column`.
    pub fn categorical_distribution(&self, table: &Table, column: &str) -> Result<Distribution> {
        let series = table.series(column)?;
        Ok(Distribution::from_series(series)?)
    }

    /// Count and share of every status label over the full table.
    pub fn status_counts(&self, table: &Table, status_column: &str) -> Result<Distribution> {
        self.categorical_distribution(table, status_column)
    }

    /// Count rows per `(primary, secondary)` label pair.
    ///
    /// Pairs that never occur are absent rather than zero. Rows missing
    /// either value are skipped.
    pub fn cross_distribution(
        &self,
        table: &Table,
        primary: &str,
        secondary: &str,
    ) -> Result<CrossTable> {
        let primary_labels = series_labels(table.series(primary)?)?;
        let secondary_labels = series_labels(table.series(secondary)?)?;

        let mut cross = CrossTable::new();
        for (p, s) in primary_labels.into_iter().zip(secondary_labels) {
            if let (Some(p), Some(s)) = (p, s) {
                *cross.entry(p).or_default().entry(s).or_insert(0) += 1;
            }
        }
        Ok(cross)
    }
}
