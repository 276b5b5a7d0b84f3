//! Duplicate row detection.
//!
//! Rows are compared on the display form of their values. Missing entries
//! match each other.

use polars::prelude::*;
use std::collections::HashSet;

/// Mask that is `true` for the first occurrence of every distinct row.
pub fn first_occurrence_mask(frame: &DataFrame) -> PolarsResult<BooleanChunked> {
    let as_text: Vec<Series> = frame
        .get_columns()
        .iter()
        .map(|col| col.as_materialized_series().cast(&DataType::String))
        .collect::<PolarsResult<_>>()?;
    let chunked: Vec<&StringChunked> = as_text
        .iter()
        .map(|s| s.str())
        .collect::<PolarsResult<_>>()?;

    let mut seen: HashSet<Vec<Option<&str>>> = HashSet::with_capacity(frame.height());
    let keep: Vec<bool> = (0..frame.height())
        .map(|row| {
            let key: Vec<Option<&str>> = chunked.iter().map(|ca| ca.get(row)).collect();
            seen.insert(key)
        })
        .collect();

    Ok(BooleanChunked::from_slice("keep".into(), &keep))
}

/// Number of rows that repeat an earlier row.
pub fn duplicate_count(frame: &DataFrame) -> PolarsResult<usize> {
    let mask = first_occurrence_mask(frame)?;
    Ok(mask.into_iter().filter(|keep| *keep == Some(false)).count())
}

/// Remove repeated rows, keeping the first occurrence and the original row order.
pub fn remove_duplicates(frame: &DataFrame) -> PolarsResult<DataFrame> {
    let mask = first_occurrence_mask(frame)?;
    frame.filter(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_count() {
        let df = df![
            "a" => [1i64, 2, 1, 3, 2],
            "b" => ["x", "y", "x", "z", "q"],
        ]
        .unwrap();
        assert_eq!(duplicate_count(&df).unwrap(), 1);
    }

    #[test]
    fn test_remove_duplicates_keeps_first_in_order() {
        let df = df![
            "a" => [3i64, 1, 3, 2, 1],
            "b" => ["c", "a", "c", "b", "a"],
        ]
        .unwrap();
        let result = remove_duplicates(&df).unwrap();
        let values: Vec<Option<i64>> = result
            .column("a")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_missing_entries_compare_equal() {
        let df = df![
            "a" => [Some(1i64), None, None],
            "b" => [Some("x"), None, None],
        ]
        .unwrap();
        assert_eq!(duplicate_count(&df).unwrap(), 1);
        assert_eq!(remove_duplicates(&df).unwrap().height(), 2);
    }

    #[test]
    fn test_no_duplicates() {
        let df = df!["a" => [1i64, 2, 3]].unwrap();
        assert_eq!(duplicate_count(&df).unwrap(), 0);
        assert_eq!(remove_duplicates(&df).unwrap().height(), 3);
    }
}
