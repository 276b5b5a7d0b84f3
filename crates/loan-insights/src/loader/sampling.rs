//! Seeded row sampling and synthetic table generation.

use crate::config::{SampleOptions, SyntheticOptions};
use crate::error::Result;
use crate::table::Table;
use crate::utils::date_series;
use chrono::{Days, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const CATEGORIES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Draw rows without replacement.
///
/// The selected rows keep their original relative order, so the same seed
/// on the same table always yields an identical table.
pub fn sample_rows(table: &Table, options: &SampleOptions) -> Result<Table> {
    let count = options.resolve_count(table.height())?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let indices: Vec<usize> = (0..table.height()).collect();
    let mut keep = vec![false; table.height()];
    for idx in indices.choose_multiple(&mut rng, count) {
        keep[*idx] = true;
    }

    let mask = BooleanChunked::from_slice("sample".into(), &keep);
    Table::from_frame(table.frame().filter(&mask)?)
}

/// Build a random table for demos and tests.
///
/// Columns are `feature_1` .. `feature_{columns - 1}` drawn from a standard
/// normal distribution, a `category` column drawn from `A`..`E`, and, when
/// requested, a `date` column counting days from 2024-01-01.
pub fn synthetic_table(options: &SyntheticOptions) -> Result<Table> {
    options.validate()?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut frame = DataFrame::empty();

    for feature in 1..options.columns {
        let values: Vec<f64> = (0..options.rows)
            .map(|_| standard_normal(&mut rng))
            .collect();
        frame.with_column(Series::new(format!("feature_{}", feature).into(), values))?;
    }

    let categories: Vec<&str> = (0..options.rows)
        .map(|_| CATEGORIES[rng.gen_range(0..CATEGORIES.len())])
        .collect();
    frame.with_column(Series::new("category".into(), categories))?;

    if options.include_dates {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1);
        let dates: Vec<Option<NaiveDate>> = (0..options.rows as u64)
            .map(|day| start.and_then(|d| d.checked_add_days(Days::new(day))))
            .collect();
        frame.with_column(date_series("date", &dates)?)?;
    }

    Table::from_frame(frame)
}

/// Box-Muller transform.
fn standard_normal(rng: &mut impl Rng) -> f64 {
    // gen() is in [0, 1); shift to (0, 1] so ln() stays finite
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;

    fn numbered_table(rows: i64) -> Table {
        let ids: Vec<i64> = (0..rows).collect();
        Table::from_frame(df!["id" => ids].unwrap()).unwrap()
    }

    #[test]
    fn test_sample_is_reproducible() {
        let table = numbered_table(50);
        let options = SampleOptions::size(10).with_seed(7);
        let a = sample_rows(&table, &options).unwrap();
        let b = sample_rows(&table, &options).unwrap();
        assert_eq!(a.height(), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_without_replacement() {
        let table = numbered_table(20);
        let sampled = sample_rows(&table, &SampleOptions::fraction(0.5)).unwrap();
        assert_eq!(sampled.height(), 10);
        assert_eq!(sampled.series("id").unwrap().n_unique().unwrap(), 10);
    }

    #[test]
    fn test_sample_full_table() {
        let table = numbered_table(5);
        let sampled = sample_rows(&table, &SampleOptions::size(5)).unwrap();
        assert_eq!(sampled, table);
    }

    #[test]
    fn test_synthetic_shape() {
        let table = synthetic_table(&SyntheticOptions::default()).unwrap();
        assert_eq!(table.shape(), (1000, 6));
        assert_eq!(table.kind("feature_1"), Some(ColumnKind::Float));
        assert_eq!(table.kind("feature_4"), Some(ColumnKind::Float));
        assert_eq!(table.kind("category"), Some(ColumnKind::Text));
        assert_eq!(table.kind("date"), Some(ColumnKind::Date));
    }

    #[test]
    fn test_synthetic_single_column() {
        let options = SyntheticOptions {
            rows: 10,
            columns: 1,
            include_dates: false,
            ..SyntheticOptions::default()
        };
        let table = synthetic_table(&options).unwrap();
        assert_eq!(table.column_names(), vec!["category"]);
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let options = SyntheticOptions {
            rows: 100,
            ..SyntheticOptions::default()
        };
        assert_eq!(
            synthetic_table(&options).unwrap(),
            synthetic_table(&options).unwrap()
        );

        let other = SyntheticOptions { seed: 1, ..options };
        assert_ne!(
            synthetic_table(&options).unwrap(),
            synthetic_table(&other).unwrap()
        );
    }

    #[test]
    fn test_synthetic_features_look_normal() {
        let table = synthetic_table(&SyntheticOptions::default()).unwrap();
        let values = crate::utils::numeric_values(table.series("feature_1").unwrap()).unwrap();
        let mean = crate::utils::mean(&values).unwrap();
        let std = crate::utils::sample_std(&values);
        assert!(mean.abs() < 0.15, "mean {}", mean);
        assert!((std - 1.0).abs() < 0.15, "std {}", std);
    }
}
