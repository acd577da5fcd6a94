//! First-sheet spreadsheet reader.
//!
//! The header row names the columns. Each column gets the narrowest dtype its
//! non-empty cells agree on: integers, floats, datetimes, otherwise text.
//! Workbooks store every number as a float, so whole floats count as
//! integers.

use crate::error::{EtlError, Result};
use calamine::{Data, DataType as CellType, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    DateTime,
    Text,
}

pub(crate) fn read_first_sheet(path: &Path) -> Result<DataFrame> {
    let workbook_error = |reason: String| EtlError::Workbook {
        path: path.display().to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(workbook_error("no worksheets".to_string()));
    };

    debug!("Reading sheet '{}' of {}", sheet_name, path.display());
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let names = header_names(header);
    let empty = Data::Empty;
    let mut columns = Vec::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(idx).unwrap_or(&empty))
            .collect();
        columns.push(Column::from(build_series(name, &cells)?));
    }

    Ok(DataFrame::new(columns)?)
}

/// Header labels as written, whitespace included. Blanks and repeats get a
/// positional suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match cell {
                Data::String(s) if !s.trim().is_empty() => s.clone(),
                _ => render_cell(cell).unwrap_or_else(|| format!("column_{}", idx)),
            };
            if seen.insert(name.clone()) {
                name
            } else {
                format!("{}_{}", name, idx)
            }
        })
        .collect()
}

fn is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Largest magnitude an `f64` holds as an exact integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn whole_number(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() <= MAX_EXACT_INT).then_some(value as i64)
}

fn cell_kind(cell: &Data) -> CellKind {
    match cell {
        Data::Int(_) => CellKind::Int,
        Data::Float(f) if whole_number(*f).is_some() => CellKind::Int,
        Data::Float(_) => CellKind::Float,
        Data::DateTime(_) | Data::DateTimeIso(_) => CellKind::DateTime,
        _ => CellKind::Text,
    }
}

fn column_kind(cells: &[&Data]) -> CellKind {
    let mut kind: Option<CellKind> = None;
    for cell in cells.iter().filter(|c| !is_empty(c)) {
        kind = Some(match (kind, cell_kind(cell)) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(CellKind::Int), CellKind::Float) | (Some(CellKind::Float), CellKind::Int) => {
                CellKind::Float
            }
            _ => return CellKind::Text,
        });
    }
    kind.unwrap_or(CellKind::Text)
}

fn as_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell.as_datetime(),
        _ => None,
    }
}

fn render_cell(cell: &Data) -> Option<String> {
    if is_empty(cell) {
        return None;
    }
    match cell {
        Data::String(s) => Some(s.trim().to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => {
            as_datetime(cell).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        other => Some(other.to_string()),
    }
}

fn build_series(name: &str, cells: &[&Data]) -> Result<Series> {
    let name: PlSmallStr = name.into();
    let series = match column_kind(cells) {
        CellKind::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Data::Int(i) => Some(*i),
                    Data::Float(f) => whole_number(*f),
                    _ => None,
                })
                .collect();
            Series::new(name, values)
        }
        CellKind::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| match c {
                    Data::Int(i) => Some(*i as f64),
                    Data::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            Series::new(name, values)
        }
        CellKind::DateTime => {
            let millis: Vec<Option<i64>> = cells
                .iter()
                .map(|c| as_datetime(c).map(|dt| dt.and_utc().timestamp_millis()))
                .collect();
            Series::new(name, millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
        CellKind::Text => {
            let values: Vec<Option<String>> = cells.iter().map(|c| render_cell(c)).collect();
            Series::new(name, values)
        }
    };
    Ok(series)
}
