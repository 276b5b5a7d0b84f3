//! Missing value handling: row dropping, per-kind filling and linear
//! interpolation.

use crate::table::{ColumnKind, Table};
use crate::utils::mean;
use polars::prelude::*;
use tracing::debug;

/// Remove every row that has a missing entry in any column.
pub fn drop_missing_rows(frame: &DataFrame) -> PolarsResult<DataFrame> {
    let mut mask = BooleanChunked::full("keep".into(), true, frame.height());
    for col in frame.get_columns() {
        if col.null_count() > 0 {
            let present = col.as_materialized_series().is_not_null();
            mask = &mask & &present;
        }
    }
    frame.filter(&mask)
}

/// Fill missing entries according to each column's kind.
///
/// - Integer: rounded column mean
/// - Float: column mean
/// - Text: `text_token`
/// - Boolean: most frequent value, ties resolve to `false`
/// - Date: forward fill, then backward fill for leading gaps
///
/// Columns without any value are left as they are.
pub fn fill_missing(table: &Table, text_token: &str) -> PolarsResult<DataFrame> {
    let mut frame = table.frame().clone();

    for (name, kind) in table.columns() {
        let series = table.frame().column(name)?.as_materialized_series();
        let nulls = series.null_count();
        if nulls == 0 || nulls == series.len() {
            continue;
        }

        let filled = match kind {
            ColumnKind::Integer => fill_integer_mean(series)?,
            ColumnKind::Float => fill_float_mean(series)?,
            ColumnKind::Text => fill_text(series, text_token)?,
            ColumnKind::Boolean => fill_boolean_mode(series)?,
            ColumnKind::Date => series
                .fill_null(FillNullStrategy::Forward(None))?
                .fill_null(FillNullStrategy::Backward(None))?,
        };

        debug!("Filled {} missing values in '{}' ({})", nulls, name, kind);
        frame.replace(name, filled)?;
    }

    Ok(frame)
}

/// Linearly interpolate interior gaps of numeric columns.
///
/// Trailing gaps take the last valid value and leading gaps stay missing.
/// Integer columns that had a gap filled become float columns.
pub fn interpolate_missing(table: &Table) -> PolarsResult<DataFrame> {
    let mut frame = table.frame().clone();

    for (name, kind) in table.columns() {
        if !kind.is_numeric() {
            continue;
        }
        let series = table.frame().column(name)?.as_materialized_series();
        if series.null_count() == 0 {
            continue;
        }

        let as_float = series.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = as_float.f64()?.into_iter().collect();
        let interpolated = interpolate_values(&values);

        let filled = values
            .iter()
            .zip(&interpolated)
            .filter(|(before, after)| before.is_none() && after.is_some())
            .count();
        if filled == 0 {
            continue;
        }

        debug!("Interpolated {} missing values in '{}'", filled, name);
        frame.replace(name, Series::new(name.into(), interpolated))?;
    }

    Ok(frame)
}

fn interpolate_values(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut result = values.to_vec();
    let mut previous: Option<(usize, f64)> = None;

    for (idx, value) in values.iter().enumerate() {
        let Some(current) = *value else { continue };
        if let Some((start, start_value)) = previous
            && idx > start + 1
        {
            let span = (idx - start) as f64;
            for (offset, slot) in result[start + 1..idx].iter_mut().enumerate() {
                let t = (offset + 1) as f64 / span;
                *slot = Some(start_value + (current - start_value) * t);
            }
        }
        previous = Some((idx, current));
    }

    if let Some((last, last_value)) = previous {
        for slot in result[last + 1..].iter_mut() {
            *slot = Some(last_value);
        }
    }

    result
}

fn fill_integer_mean(series: &Series) -> PolarsResult<Series> {
    let ca = series.i64()?;
    let present: Vec<f64> = ca.into_iter().flatten().map(|v| v as f64).collect();
    let fill = mean(&present).map(|m| m.round() as i64);
    let values: Vec<Option<i64>> = ca.into_iter().map(|v| v.or(fill)).collect();
    Ok(Series::new(series.name().clone(), values))
}

fn fill_float_mean(series: &Series) -> PolarsResult<Series> {
    let ca = series.f64()?;
    let present: Vec<f64> = ca.into_iter().flatten().collect();
    let fill = mean(&present);
    let values: Vec<Option<f64>> = ca.into_iter().map(|v| v.or(fill)).collect();
    Ok(Series::new(series.name().clone(), values))
}

fn fill_text(series: &Series, token: &str) -> PolarsResult<Series> {
    let ca = series.str()?;
    let values: Vec<Option<&str>> = ca.into_iter().map(|v| v.or(Some(token))).collect();
    Ok(Series::new(series.name().clone(), values))
}

fn fill_boolean_mode(series: &Series) -> PolarsResult<Series> {
    let ca = series.bool()?;
    let (trues, falses) = ca.into_iter().flatten().fold((0usize, 0usize), |(t, f), v| {
        if v { (t + 1, f) } else { (t, f + 1) }
    });
    let mode = trues > falses;
    let values: Vec<Option<bool>> = ca.into_iter().map(|v| v.or(Some(mode))).collect();
    Ok(Series::new(series.name().clone(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(frame: DataFrame) -> Table {
        Table::from_frame(frame).unwrap()
    }

    #[test]
    fn test_drop_missing_rows() {
        let df = df![
            "a" => [Some(1i64), None, Some(3), Some(4)],
            "b" => [Some("x"), Some("y"), None, Some("w")],
        ]
        .unwrap();
        let result = drop_missing_rows(&df).unwrap();
        assert_eq!(result.height(), 2);
        let nulls: usize = result.get_columns().iter().map(|c| c.null_count()).sum();
        assert_eq!(nulls, 0);
    }

    #[test]
    fn test_drop_removes_rows_with_nan() {
        let t = table(
            df![
                "rate" => [Some(1.5f64), Some(f64::NAN), Some(2.5)],
                "id" => [1i64, 2, 3],
            ]
            .unwrap(),
        );
        let result = drop_missing_rows(t.frame()).unwrap();
        assert_eq!(result.height(), 2);
    }

    #[test]
    fn test_fill_numeric_with_mean() {
        let t = table(
            df![
                "int" => [Some(1i64), None, Some(4)],
                "float" => [Some(1.0f64), None, Some(2.0)],
            ]
            .unwrap(),
        );
        let result = fill_missing(&t, "Unknown").unwrap();

        let ints: Vec<Option<i64>> = result

            .column("int")

            .unwrap()

            .i64()

            .unwrap()

            .into_iter()

            .collect();
        assert_eq!(ints, vec![Some(1), Some(3), Some(4)]);

        let floats: Vec<Option<f64>> = result

            .column("float")

            .unwrap()

            .f64()

            .unwrap()

            .into_iter()

            .collect();
        assert_eq!(floats, vec![Some(1.0), Some(1.5), Some(2.0)]);
    }

    #[test]
    fn test_fill_text_with_token() {
        let t = table(df!["city" => [Some("Lagos"), None]].unwrap());
        let result = fill_missing(&t, "Unknown").unwrap();
        let values: Vec<Option<&str>> = result
            .column("city")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("Lagos"), Some("Unknown")]);
    }

    #[test]
    fn test_fill_boolean_mode_ties_to_false() {
        let t = table(
            df![
                "majority" => [Some(true), Some(true), Some(false), None],
                "tied" => [Some(true), Some(false), None, None],
            ]
            .unwrap(),
        );
        let result = fill_missing(&t, "Unknown").unwrap();
        let majority: Vec<Option<bool>> = result
            .column("majority")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(majority[3], Some(true));
        let tied: Vec<Option<bool>> = result
            .column("tied")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(tied[2], Some(false));
        assert_eq!(tied[3], Some(false));
    }

    #[test]
    fn test_fill_dates_forward_then_backward() {
        let raw = df!["d" => [None, Some("2024-01-01"), None, Some("2024-01-05")]].unwrap();
        let t = Table::from_frame_inferring_dates(raw).unwrap();
        let result = fill_missing(&t, "Unknown").unwrap();
        let days: Vec<Option<i32>> = result
            .column("d")
            .unwrap()
            .as_materialized_series()
            .to_physical_repr()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            days,
            vec![Some(19_723), Some(19_723), Some(19_723), Some(19_727)]
        );
    }

    #[test]
    fn test_fill_skips_all_missing_column() {
        let t = table(
            df![
                "empty" => [None::<f64>, None],
                "x" => [1i64, 2],
            ]
            .unwrap(),
        );
        let result = fill_missing(&t, "Unknown").unwrap();
        assert_eq!(result.column("empty").unwrap().null_count(), 2);
    }

    #[test]
    fn test_interpolate_values() {
        let values = [None, Some(1.0), None, None, Some(4.0), None];
        assert_eq!(
            interpolate_values(&values),
            vec![None, Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn test_interpolate_integer_becomes_float() {
        let t = table(
            df![
                "n" => [Some(10i64), None, Some(20)],
                "lead" => [None, Some(1i64), Some(2)],
                "text" => [Some("a"), None, Some("c")],
            ]
            .unwrap(),
        );
        let result = interpolate_missing(&t).unwrap();
        assert_eq!(result.column("n").unwrap().dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = result
            .column("n")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(10.0), Some(15.0), Some(20.0)]);

        // Only a leading gap: nothing filled, column keeps its type
        assert_eq!(result.column("lead").unwrap().dtype(), &DataType::Int64);
        assert_eq!(result.column("text").unwrap().null_count(), 1);
    }
}
