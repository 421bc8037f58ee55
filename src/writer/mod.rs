//! Worksheet writer: the whole write pipeline for one invocation.
//!
//! An existing workbook is loaded values-only with calamine, the requested
//! worksheet is replaced wholesale (never merged), and the workbook is
//! rewritten with rust_xlsxwriter. Sibling worksheets keep their cell values
//! and their tables (names and extents, restyled to the default banded
//! medium style); formulas and cell formatting do not survive the
//! values-only round trip.

use crate::error::{XlsheetError, XlsheetResult};
use crate::types::{ColumnWidth, Record, WriteRequest};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Table, TableColumn, TableStyle, Workbook, Worksheet};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

const XLSX_EXTENSION: &str = ".xlsx";

/// Name openpyxl-style tooling gives the auto-provisioned placeholder sheet.
const PLACEHOLDER_SHEET: &str = "Sheet";

/// A cell carried over from an existing workbook, at its absolute position.
struct CarriedCell {
    row: u32,
    col: u16,
    value: Data,
}

/// Extent of a table on a carried-over worksheet, header row included.
struct CarriedTable {
    name: String,
    columns: Vec<String>,
    first_row: u32,
    first_col: u16,
    last_row: u32,
    last_col: u16,
}

/// Values-only snapshot of a worksheet that survives the rewrite.
struct CarriedSheet {
    name: String,
    cells: Vec<CarriedCell>,
    tables: Vec<CarriedTable>,
}

/// Executes one validated [`WriteRequest`] against the filesystem.
pub struct WorksheetWriter<'a> {
    request: &'a WriteRequest,
}

impl<'a> WorksheetWriter<'a> {
    pub fn new(request: &'a WriteRequest) -> Self {
        Self { request }
    }

    /// Run the write pipeline. Returns `true` on success: the worksheet is
    /// unconditionally replaced, so every successful invocation is a change.
    pub fn write(&self) -> XlsheetResult<bool> {
        let request = self.request;

        // Validation, in order, before any file I/O.
        let data = request.data.as_deref().ok_or(XlsheetError::MissingData)?;
        if !request.file.ends_with(XLSX_EXTENSION) {
            return Err(XlsheetError::UnsupportedFormat(request.file.clone()));
        }
        if !request.path.exists() {
            if !request.create {
                return Err(XlsheetError::PathMissing(request.path.clone()));
            }
            debug!(path = %request.path.display(), "creating missing directory");
            fs::create_dir_all(&request.path)?;
        }

        let file_path = request.path.join(&request.file);
        let (carried, existing_tables) = if file_path.is_file() {
            self.load_existing(&file_path)?
        } else if request.create {
            (Vec::new(), Vec::new())
        } else {
            return Err(XlsheetError::FileMissing(file_path));
        };

        // Tables on the replaced sheet die with it; any other sheet holding
        // the requested name is a conflict.
        if let Some(name) = &request.table_name {
            if existing_tables
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(name))
            {
                return Err(XlsheetError::DuplicateTableName(name.clone()));
            }
        }

        let mut workbook = Workbook::new();
        for sheet in &carried {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            write_carried_cells(worksheet, &sheet.cells)?;
            for table in &sheet.tables {
                register_carried_table(worksheet, table)?;
            }
        }

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&request.worksheet)?;
        let headers = headers_of(data);
        debug!(
            sheet = %request.worksheet,
            columns = headers.len(),
            rows = data.len(),
            "populating worksheet"
        );
        populate(worksheet, &headers, data)?;

        if let Some(table_name) = &request.table_name {
            register_table(worksheet, table_name, &headers, data.len())?;
        }
        apply_column_widths(worksheet, request.column_width, &headers, data)?;

        debug!(file = %file_path.display(), "saving workbook");
        workbook.save(&file_path)?;
        Ok(true)
    }

    /// Load every worksheet except the one being replaced, values only,
    /// along with the table names registered on the surviving sheets.
    fn load_existing(
        &self,
        file_path: &Path,
    ) -> XlsheetResult<(Vec<CarriedSheet>, Vec<String>)> {
        let mut workbook: Xlsx<BufReader<fs::File>> =
            open_workbook(file_path)
                .map_err(|e: calamine::XlsxError| XlsheetError::Load(e.to_string()))?;
        workbook
            .load_tables()
            .map_err(|e| XlsheetError::Load(e.to_string()))?;

        let table_names: Vec<String> = workbook
            .table_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let mut existing_tables = Vec::new();
        let mut tables_by_sheet: HashMap<String, Vec<CarriedTable>> = HashMap::new();
        for table_name in table_names {
            let table = workbook
                .table_by_name(&table_name)
                .map_err(|e| XlsheetError::Load(e.to_string()))?;
            if table.sheet_name() == self.request.worksheet {
                continue;
            }
            existing_tables.push(table_name.clone());
            // The header row sits directly above the table's data region.
            let data = table.data();
            if let (Some(start), Some(end)) = (data.start(), data.end()) {
                tables_by_sheet
                    .entry(table.sheet_name().to_string())
                    .or_default()
                    .push(CarriedTable {
                        name: table_name,
                        columns: table.columns().to_vec(),
                        first_row: start.0.saturating_sub(1),
                        first_col: start.1 as u16,
                        last_row: end.0,
                        last_col: end.1 as u16,
                    });
            }
        }

        let mut carried = Vec::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            if sheet_name == self.request.worksheet {
                debug!(sheet = %sheet_name, "replacing existing worksheet");
                continue;
            }
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| XlsheetError::Load(e.to_string()))?;
            let start = range.start().unwrap_or((0, 0));
            let cells: Vec<CarriedCell> = range
                .used_cells()
                .map(|(row, col, value)| CarriedCell {
                    row: start.0 + row as u32,
                    col: (start.1 as usize + col) as u16,
                    value: value.clone(),
                })
                .collect();
            if sheet_name == PLACEHOLDER_SHEET && cells.is_empty() {
                debug!("dropping empty placeholder sheet");
                continue;
            }
            let tables = tables_by_sheet.remove(&sheet_name).unwrap_or_default();
            carried.push(CarriedSheet {
                name: sheet_name,
                cells,
                tables,
            });
        }

        Ok((carried, existing_tables))
    }
}

/// Headers come from the first record's keys, in that record's key order.
fn headers_of(data: &[Record]) -> Vec<String> {
    data.first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

fn write_carried_cells(worksheet: &mut Worksheet, cells: &[CarriedCell]) -> XlsheetResult<()> {
    for cell in cells {
        match &cell.value {
            Data::Int(i) => {
                worksheet.write_number(cell.row, cell.col, *i as f64)?;
            }
            Data::Float(f) => {
                worksheet.write_number(cell.row, cell.col, *f)?;
            }
            Data::String(s) => {
                worksheet.write_string(cell.row, cell.col, s)?;
            }
            Data::Bool(b) => {
                worksheet.write_boolean(cell.row, cell.col, *b)?;
            }
            Data::DateTime(dt) => {
                worksheet.write_number(cell.row, cell.col, dt.as_f64())?;
            }
            Data::DateTimeIso(s) | Data::DurationIso(s) => {
                worksheet.write_string(cell.row, cell.col, s)?;
            }
            // Error cells keep their display text ("#DIV/0!" etc.).
            Data::Error(_) => {
                worksheet.write_string(cell.row, cell.col, cell.value.to_string())?;
            }
            Data::Empty => {}
        }
    }
    Ok(())
}

/// Re-register a carried-over table at its original extent. The style is
/// normalized to the default banded medium style; calamine's values-only
/// load does not expose the original style info.
fn register_carried_table(worksheet: &mut Worksheet, carried: &CarriedTable) -> XlsheetResult<()> {
    let columns: Vec<TableColumn> = carried
        .columns
        .iter()
        .map(|header| TableColumn::new().set_header(header))
        .collect();
    let table = Table::new()
        .set_name(&carried.name)
        .set_style(TableStyle::Medium9)
        .set_banded_rows(true)
        .set_columns(&columns);
    worksheet.add_table(
        carried.first_row,
        carried.first_col,
        carried.last_row,
        carried.last_col,
        &table,
    )?;
    Ok(())
}

/// Header row at row 0, then each record's values positionally below it.
/// Later records are aligned by position, not by key name.
fn populate(worksheet: &mut Worksheet, headers: &[String], data: &[Record]) -> XlsheetResult<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row, record) in data.iter().enumerate() {
        for (col, value) in record.values().enumerate() {
            write_json_value(worksheet, (row + 1) as u32, col as u16, value)?;
        }
    }
    Ok(())
}

fn write_json_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
) -> XlsheetResult<()> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write_number(row, col, f)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        // Nested structures are not tabular; keep their JSON text.
        other => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

/// Register a banded medium-style table over the occupied rectangle,
/// header row through the last data row. Name validity and uniqueness
/// within this workbook are enforced by rust_xlsxwriter at save time.
fn register_table(
    worksheet: &mut Worksheet,
    name: &str,
    headers: &[String],
    row_count: usize,
) -> XlsheetResult<()> {
    if headers.is_empty() || row_count == 0 {
        debug!(table = name, "no occupied range, skipping table registration");
        return Ok(());
    }
    let columns: Vec<TableColumn> = headers
        .iter()
        .map(|header| TableColumn::new().set_header(header))
        .collect();
    let table = Table::new()
        .set_name(name)
        .set_style(TableStyle::Medium9)
        .set_banded_rows(true)
        .set_columns(&columns);
    worksheet.add_table(0, 0, row_count as u32, (headers.len() - 1) as u16, &table)?;
    Ok(())
}

fn apply_column_widths(
    worksheet: &mut Worksheet,
    policy: ColumnWidth,
    headers: &[String],
    data: &[Record],
) -> XlsheetResult<()> {
    // Ragged records can occupy columns past the header row.
    let column_count = data
        .iter()
        .map(|record| record.len())
        .max()
        .unwrap_or(0)
        .max(headers.len());

    for col in 0..column_count {
        worksheet.set_column_width(col as u16, resolve_width(policy, headers, data, col))?;
    }
    Ok(())
}

fn resolve_width(policy: ColumnWidth, headers: &[String], data: &[Record], col: usize) -> f64 {
    match policy {
        ColumnWidth::Fixed(width) => f64::from(width),
        ColumnWidth::Auto => auto_width(headers, data, col),
        ColumnWidth::Capped(cap) => auto_width(headers, data, col).min(f64::from(cap)),
    }
}

/// Longest rendered cell in the column, padded: `round((max_len + 2) * 1.2)`.
fn auto_width(headers: &[String], data: &[Record], col: usize) -> f64 {
    let mut max_len = headers.get(col).map(|h| h.chars().count()).unwrap_or(0);
    for record in data {
        if let Some(len) = record.values().nth(col).and_then(rendered_len) {
            max_len = max_len.max(len);
        }
    }
    padded_width(max_len)
}

fn padded_width(max_len: usize) -> f64 {
    ((max_len + 2) as f64 * 1.2).round()
}

/// Display length of a cell value; `None` when the cell renders to nothing.
fn rendered_len(value: &Value) -> Option<usize> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.chars().count()),
        other => Some(other.to_string().chars().count()),
    }
}
