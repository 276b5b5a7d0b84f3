//! Excel workbook input (`calamine`) and `.xlsx` output (`rust_xlsxwriter`).
//!
//! The first row of a sheet holds the column names. Column types follow the
//! cell kinds found below the header:
//!
//! - only booleans: boolean
//! - only numbers, all whole: integer
//! - only numbers: float
//! - only date cells: date
//! - anything else: text
//!
//! Workbooks written by [`write_spreadsheet`] also carry a hidden
//! `__column_kinds` sheet with one `(column, kind)` row per column. When it
//! describes the sheet being read, those kinds win over the cell kinds, so a
//! float column of whole numbers stays float and datetimes keep their time
//! and unit. Dates and datetimes are stored as ISO text.

use super::writers::{ensure_parent_dir, write_error};
use crate::error::{InsightsError, Result};
use crate::table::{ColumnKind, Table};
use crate::utils::{
    DATETIME_TEXT_FORMAT, date_series, datetime_from_physical, datetime_to_physical,
    parse_iso_date, parse_iso_datetime, series_labels,
};
use calamine::{Data, DataType as _, Range, Reader, Sheets, open_workbook_auto};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Largest row index an `.xlsx` sheet can hold.
const MAX_ROWS: usize = 1_048_576;
/// Largest column count an `.xlsx` sheet can hold.
const MAX_COLUMNS: usize = 16_384;
/// Hidden worksheet that records the kind of every written column.
const KINDS_SHEET: &str = "__column_kinds";

/// Cell type of a spreadsheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellColumn {
    Integer,
    Float,
    Boolean,
    Date,
    Datetime(TimeUnit),
    Text,
}

impl CellColumn {
    fn from_tag(tag: &str) -> Option<Self> {
        let column = match tag {
            "integer" => Self::Integer,
            "float" => Self::Float,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime[ms]" => Self::Datetime(TimeUnit::Milliseconds),
            "datetime[us]" => Self::Datetime(TimeUnit::Microseconds),
            "datetime[ns]" => Self::Datetime(TimeUnit::Nanoseconds),
            "text" => Self::Text,
            _ => return None,
        };
        Some(column)
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime(TimeUnit::Milliseconds) => "datetime[ms]",
            Self::Datetime(TimeUnit::Microseconds) => "datetime[us]",
            Self::Datetime(TimeUnit::Nanoseconds) => "datetime[ns]",
            Self::Text => "text",
        }
    }

    /// Cell type used to store a table column.
    fn of_column(kind: ColumnKind, dtype: &DataType) -> Self {
        match (kind, dtype) {
            (ColumnKind::Date, DataType::Datetime(unit, _)) => Self::Datetime(*unit),
            (ColumnKind::Date, _) => Self::Date,
            (ColumnKind::Integer, _) => Self::Integer,
            (ColumnKind::Float, _) => Self::Float,
            (ColumnKind::Boolean, _) => Self::Boolean,
            (ColumnKind::Text, _) => Self::Text,
        }
    }
}

/// Read one worksheet into a table.
///
/// `sheet` selects a worksheet by name, or by 0-based index when it parses
/// as a number. The first sheet is used otherwise.
pub fn read_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let parse_error = |message: String| InsightsError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(selector) => match selector.parse::<usize>() {
            Ok(idx) => sheet_names
                .get(idx)
                .cloned()
                .ok_or_else(|| parse_error(format!("no worksheet at index {}", idx)))?,
            Err(_) => selector.to_string(),
        },
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| parse_error("workbook has no worksheets".to_string()))?,
    };

    let range: Range<Data> = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| parse_error(e.to_string()))?;
    let recorded = recorded_kinds(&mut workbook, &sheet_name);

    let rows: Vec<&[Data]> = range.rows().collect();
    let Some((header, body)) = rows.split_first() else {
        return Table::from_frame(DataFrame::empty());
    };

    let names = header_names(header);
    let mut frame = DataFrame::empty();
    for (idx, name) in names.iter().enumerate() {
        let cells: Vec<Option<&Data>> = body
            .iter()
            .map(|row| row.get(idx).filter(|cell| !cell.is_empty()))
            .collect();
        let column = recorded
            .as_ref()
            .and_then(|kinds| kinds.get(name).copied())
            .unwrap_or_else(|| infer_cell_column(&cells));
        frame.with_column(cells_to_series(name, &cells, column)?)?;
    }

    debug!(
        "Read worksheet '{}' with {} rows and {} columns",
        sheet_name,
        frame.height(),
        frame.width()
    );
    match recorded {
        Some(_) => Table::from_frame(frame),
        None => Table::from_frame_inferring_dates(frame),
    }
}

/// Column kinds recorded for `sheet` by [`write_spreadsheet`], if any.
fn recorded_kinds(
    workbook: &mut Sheets<BufReader<File>>,
    sheet: &str,
) -> Option<HashMap<String, CellColumn>> {
    if !workbook.sheet_names().iter().any(|name| name == KINDS_SHEET) {
        return None;
    }
    let range = workbook.worksheet_range(KINDS_SHEET).ok()?;
    let mut rows = range.rows();
    let header = rows.next()?;
    if header.get(1).and_then(|cell| cell.get_string()) != Some(sheet) {
        return None;
    }

    let kinds = rows
        .filter_map(|row| {
            let name = row.first()?.as_string()?;
            let column = CellColumn::from_tag(row.get(1)?.get_string()?)?;
            Some((name, column))
        })
        .collect();
    Some(kinds)
}

/// Column names from the header row. Blank headers become `column_N` and
/// repeated headers get a numeric suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell.as_string() {
                Some(s) if !s.trim().is_empty() => s.trim().to_string(),
                _ => format!("column_{}", idx + 1),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

fn infer_cell_column(cells: &[Option<&Data>]) -> CellColumn {
    let present: Vec<&Data> = cells.iter().flatten().copied().collect();
    if present.is_empty() {
        return CellColumn::Text;
    }

    if present.iter().all(|cell| matches!(cell, Data::Bool(_))) {
        return CellColumn::Boolean;
    }
    if present
        .iter()
        .all(|cell| matches!(cell, Data::DateTime(_) | Data::DateTimeIso(_)))
    {
        return CellColumn::Date;
    }
    if present
        .iter()
        .all(|cell| matches!(cell, Data::Int(_) | Data::Float(_)))
    {
        let all_whole = present.iter().all(|cell| match cell {
            Data::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => true,
        });
        return if all_whole {
            CellColumn::Integer
        } else {
            CellColumn::Float
        };
    }
    CellColumn::Text
}

fn cells_to_series(name: &str, cells: &[Option<&Data>], column: CellColumn) -> Result<Series> {
    let series = match column {
        CellColumn::Integer => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| {
                    c.and_then(|cell| cell.get_int().or_else(|| cell.as_f64().map(|f| f as i64)))
                })
                .collect();
            Series::new(name.into(), values)
        }
        CellColumn::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| c.and_then(|cell| cell.as_f64()))
                .collect();
            Series::new(name.into(), values)
        }
        CellColumn::Boolean => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| c.and_then(|cell| cell.get_bool()))
                .collect();
            Series::new(name.into(), values)
        }
        CellColumn::Date => {
            let dates: Vec<_> = cells
                .iter()
                .map(|c| {
                    c.and_then(|cell| {
                        cell.as_datetime()
                            .map(|dt| dt.date())
                            .or_else(|| cell.get_string().and_then(parse_iso_date))
                    })
                })
                .collect();
            date_series(name, &dates)?
        }
        CellColumn::Datetime(unit) => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| {
                    c.and_then(|cell| {
                        cell.as_datetime()
                            .or_else(|| cell.get_string().and_then(parse_iso_datetime))
                    })
                    .and_then(|dt| datetime_to_physical(dt, unit))
                })
                .collect();
            Series::new(name.into(), values).cast(&DataType::Datetime(unit, None))?
        }
        CellColumn::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| c.map(|cell| cell.as_string().unwrap_or_else(|| cell.to_string())))
                .collect();
            Series::new(name.into(), values)
        }
    };
    Ok(series)
}

/// Render a `Datetime` Series as ISO text with full sub-second precision.
fn datetime_labels(series: &Series, unit: TimeUnit) -> PolarsResult<Vec<Option<String>>> {
    let physical = series.to_physical_repr();
    let values = physical.i64()?;
    Ok(values
        .into_iter()
        .map(|value| {
            value
                .and_then(|v| datetime_from_physical(v, unit))
                .map(|dt| dt.format(DATETIME_TEXT_FORMAT).to_string())
        })
        .collect())
}

/// Write a table to a single-sheet `.xlsx` workbook.
///
/// Missing entries are left as empty cells. Dates and datetimes are written
/// as ISO strings. Time zones are not stored, so zone-aware datetimes come
/// back as naive UTC.
pub fn write_spreadsheet(table: &Table, path: &Path) -> Result<()> {
    let is_legacy = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xls"));
    if is_legacy {
        return Err(InsightsError::UnsupportedFormat(
            ".xls output (write .xlsx instead)".to_string(),
        ));
    }
    if table.height() + 1 > MAX_ROWS || table.width() > MAX_COLUMNS {
        return Err(write_error(
            path,
            format!(
                "{} rows x {} columns exceeds the worksheet limit",
                table.height(),
                table.width()
            ),
        ));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let data_sheet = worksheet.name();
    let mut kinds = Vec::with_capacity(table.width());

    for (col_idx, (name, kind)) in table.columns().enumerate() {
        let col = col_idx as u16;
        worksheet
            .write_string(0, col, name)
            .map_err(|e| write_error(path, e))?;

        let series = table.series(name)?;
        let column = CellColumn::of_column(kind, series.dtype());
        kinds.push((name, column));

        match column {
            CellColumn::Integer | CellColumn::Float => {
                let values = series.cast(&DataType::Float64)?;
                for (row_idx, value) in values.f64()?.into_iter().enumerate() {
                    if let Some(v) = value {
                        worksheet
                            .write_number(row_idx as u32 + 1, col, v)
                            .map_err(|e| write_error(path, e))?;
                    }
                }
            }
            CellColumn::Boolean => {
                for (row_idx, value) in series.bool()?.into_iter().enumerate() {
                    if let Some(v) = value {
                        worksheet
                            .write_boolean(row_idx as u32 + 1, col, v)
                            .map_err(|e| write_error(path, e))?;
                    }
                }
            }
            CellColumn::Date | CellColumn::Datetime(_) | CellColumn::Text => {
                let labels = match column {
                    CellColumn::Datetime(unit) => datetime_labels(series, unit)?,
                    _ => series_labels(series)?,
                };
                for (row_idx, value) in labels.into_iter().enumerate() {
                    if let Some(v) = value {
                        worksheet
                            .write_string(row_idx as u32 + 1, col, v)
                            .map_err(|e| write_error(path, e))?;
                    }
                }
            }
        }
    }

    let kinds_sheet = workbook.add_worksheet();
    kinds_sheet
        .set_name(KINDS_SHEET)
        .map_err(|e| write_error(path, e))?;
    kinds_sheet.set_hidden(true);
    kinds_sheet
        .write_string(0, 0, "sheet")
        .and_then(|sheet| sheet.write_string(0, 1, &data_sheet))
        .map_err(|e| write_error(path, e))?;
    for (idx, (name, column)) in kinds.into_iter().enumerate() {
        let row = idx as u32 + 1;
        kinds_sheet
            .write_string(row, 0, name)
            .and_then(|sheet| sheet.write_string(row, 1, column.tag()))
            .map_err(|e| write_error(path, e))?;
    }

    ensure_parent_dir(path)?;
    workbook.save(path).map_err(|e| write_error(path, e))?;
    Ok(())
}
