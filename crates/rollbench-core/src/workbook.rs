//! Workbook synchronisation
//!
//! The bound `.xlsx` file, once it exists on disk, is the authoritative
//! record store: saves append to it in place and exports/plots re-read it,
//! so rows the operator deletes by hand in a spreadsheet application stay
//! deleted. Until the file exists the in-memory list stands in (see
//! [`crate::source::RecordSource`]).
//!
//! Three operations, each a scoped open-modify-close:
//! - [`create_from`]: one-time bootstrap from the session list
//! - [`append_if_exists`]: in-place append with per-column style cloning
//! - [`read_all`]: the ordered non-empty data rows

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use thiserror::Error;
use tracing::debug;
use umya_spreadsheet::{reader, writer, Worksheet};

use crate::format;
use crate::record::{DerivedRecord, Field, SheetRow};

/// Name of the single data sheet.
pub const SHEET_NAME: &str = "Data";

const COLUMN_WIDTH: f64 = 18.0;
const HEADER_BG: u32 = 0xD9D9D9;

/// Errors from workbook operations
#[derive(Debug, Error)]
pub enum SheetError {
    /// Bootstrap was attempted with an empty record list
    #[error("no data to export; save a result first")]
    NoData,

    /// The workbook file could not be opened or parsed
    #[error("workbook could not be read: {0}")]
    Unreadable(String),

    /// The workbook file could not be created or saved
    #[error("workbook could not be written: {0}")]
    Unwritable(String),
}

fn read_err(e: impl std::fmt::Display) -> SheetError {
    SheetError::Unreadable(e.to_string())
}

fn write_err(e: impl std::fmt::Display) -> SheetError {
    SheetError::Unwritable(e.to_string())
}

/// Create the workbook from scratch with one formatted row per record.
///
/// One-time bootstrap for a path that does not exist yet; once the file is
/// on disk all further writes go through [`append_if_exists`]. Fails with
/// [`SheetError::NoData`] when there is nothing to write. Values are stored
/// as text cells holding the canonical rendering, not as native numbers.
pub fn create_from(path: &Path, records: &[DerivedRecord]) -> Result<(), SheetError> {
    if records.is_empty() {
        return Err(SheetError::NoData);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(write_err)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_BG))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    for (col, field) in Field::ALL.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, field.title(), &header_format)
            .map_err(write_err)?;
    }

    for (row, record) in records.iter().enumerate() {
        for (col, field) in Field::ALL.iter().enumerate() {
            let text = format::render(*field, record.value(*field));
            worksheet
                .write_string_with_format(row as u32 + 1, col as u16, &text, &cell_format)
                .map_err(write_err)?;
        }
    }

    for col in 0..Field::ALL.len() as u16 {
        worksheet.set_column_width(col, COLUMN_WIDTH).map_err(write_err)?;
    }

    workbook.save(path).map_err(write_err)?;
    debug!(path = %path.display(), rows = records.len(), "workbook created");
    Ok(())
}

/// Append one record to the workbook, if the file exists.
///
/// No-op when the file is absent (the record stays in the session list and
/// reaches the workbook at the next bootstrap). Otherwise the row is placed
/// one past the current last row; when the sheet already holds a data row,
/// that row's per-column cell styles are cloned onto the new one so operator
/// formatting carries forward. An empty sheet gets the header written first
/// and no style cloning.
pub fn append_if_exists(path: &Path, record: &DerivedRecord) -> Result<(), SheetError> {
    if !path.exists() {
        return Ok(());
    }

    let mut book = reader::xlsx::read(path).map_err(read_err)?;
    let use_named = book.get_sheet_by_name(SHEET_NAME).is_some();
    let sheet = if use_named {
        book.get_sheet_by_name_mut(SHEET_NAME)
            .ok_or_else(|| SheetError::Unreadable(format!("sheet '{SHEET_NAME}' not accessible")))?
    } else {
        book.get_active_sheet_mut()
    };

    // Only a truly empty sheet gets the header written; a blanked first row
    // above existing data must not reset the append position.
    let mut last_row = sheet.get_highest_row();
    if last_row == 0 || (last_row == 1 && row_is_empty(sheet, 1)) {
        for (col, field) in Field::ALL.iter().enumerate() {
            sheet
                .get_cell_mut((col as u32 + 1, 1))
                .set_value_string(field.title());
        }
        last_row = 1;
    }

    let new_row = last_row + 1;
    let template_row = (last_row >= 2).then_some(2u32);

    for (idx, field) in Field::ALL.iter().enumerate() {
        let col = idx as u32 + 1;
        let text = format::render(*field, record.value(*field));
        let template_style = template_row
            .and_then(|row| sheet.get_cell((col, row)))
            .map(|cell| cell.get_style().clone());

        let cell = sheet.get_cell_mut((col, new_row));
        cell.set_value_string(text);
        if let Some(style) = template_style {
            cell.set_style(style);
        }
    }

    writer::xlsx::write(&book, path).map_err(write_err)?;
    debug!(path = %path.display(), row = new_row, "record appended to workbook");
    Ok(())
}

/// Read the ordered non-empty data rows of the workbook.
///
/// Each row is a header-title to raw-cell-text mapping; values come back
/// exactly as stored, untouched by the formatter. A row whose cells are all
/// empty is skipped. An unreadable file is an error, never "no data".
pub fn read_all(path: &Path) -> Result<Vec<SheetRow>, SheetError> {
    let book = reader::xlsx::read(path).map_err(read_err)?;
    let sheet = match book.get_sheet_by_name(SHEET_NAME) {
        Some(sheet) => sheet,
        None => book.get_active_sheet(),
    };

    let highest_row = sheet.get_highest_row();
    let highest_col = sheet.get_highest_column();
    if highest_row == 0 {
        return Ok(Vec::new());
    }

    let header: Vec<String> = (1..=highest_col).map(|col| sheet.get_value((col, 1))).collect();

    let mut rows = Vec::new();
    for row_idx in 2..=highest_row {
        let mut row = SheetRow::default();
        let mut any_value = false;
        for (idx, title) in header.iter().enumerate() {
            if title.is_empty() {
                continue;
            }
            let value = sheet.get_value((idx as u32 + 1, row_idx));
            if !value.is_empty() {
                any_value = true;
            }
            row.insert(title.clone(), value);
        }
        if any_value {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn row_is_empty(sheet: &Worksheet, row: u32) -> bool {
    (1..=Field::ALL.len() as u32).all(|col| sheet.get_value((col, row)).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CellValue;
    use tempfile::tempdir;

    fn record(name: &str, pressure: &str, crr: f64) -> DerivedRecord {
        DerivedRecord {
            tire_name: name.to_string(),
            tire_pressure: pressure.to_string(),
            idle_currents: "0.5".to_string(),
            load_currents: "1.2".to_string(),
            mean_idle_current: 0.5,
            mean_load_current: 1.2,
            lever_weight: 2.0,
            effective_weight: 4.888,
            speed: 7.193,
            idle_power: 6.0,
            load_power: 14.4,
            rolling_power: 8.4,
            rolling_coefficient: crr,
        }
    }

    #[test]
    fn append_to_missing_file_is_a_no_op() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        append_if_exists(&path, &record("A", "2.0", 0.08)).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn create_from_nothing_fails_with_no_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        assert!(matches!(create_from(&path, &[]), Err(SheetError::NoData)));
        assert!(!path.exists());
    }

    #[test]
    fn created_workbook_reads_back_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        let records = vec![record("A", "2.0", 0.08), record("B", "2.5", 0.07)];
        create_from(&path, &records).unwrap();

        let rows = read_all(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(Field::TireName), Some("A"));
        assert_eq!(rows[1].get(Field::TireName), Some("B"));
        // stored as the formatter's canonical text
        assert_eq!(rows[0].get(Field::TirePressure), Some("2.0"));
        assert_eq!(rows[0].get(Field::RollingCoefficient), Some("0.080000"));
        assert_eq!(rows[0].get(Field::IdlePower), Some("6.00"));
    }

    #[test]
    fn append_extends_an_existing_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        create_from(&path, &[record("A", "2.0", 0.08)]).unwrap();

        append_if_exists(&path, &record("B", "2.5", 0.07)).unwrap();
        append_if_exists(&path, &record("A", "3.0", 0.06)).unwrap();

        let rows = read_all(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].get(Field::TireName), Some("B"));
        assert_eq!(rows[2].get(Field::TirePressure), Some("3.0"));
    }

    #[test]
    fn append_writes_header_into_an_empty_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.xlsx");
        // a workbook someone created empty, default sheet name
        let book = umya_spreadsheet::new_file();
        writer::xlsx::write(&book, &path).unwrap();

        append_if_exists(&path, &record("A", "2.0", 0.08)).unwrap();

        let rows = read_all(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Field::TireName), Some("A"));
    }

    #[test]
    fn append_below_a_cleared_header_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        create_from(&path, &[record("A", "2.0", 0.08)]).unwrap();
        append_if_exists(&path, &record("B", "2.5", 0.07)).unwrap();

        // operator blanks the header row by hand, data rows remain below
        let mut book = reader::xlsx::read(&path).unwrap();
        let sheet = book
            .get_sheet_by_name_mut(SHEET_NAME)
            .expect("data sheet exists");
        for col in 1..=Field::ALL.len() as u32 {
            sheet.get_cell_mut((col, 1)).set_value_string("");
        }
        writer::xlsx::write(&book, &path).unwrap();

        append_if_exists(&path, &record("C", "3.0", 0.06)).unwrap();

        // the new row lands below the data, nothing is overwritten
        let book = reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet_by_name(SHEET_NAME).expect("data sheet exists");
        assert_eq!(sheet.get_value((1u32, 2u32)), "A");
        assert_eq!(sheet.get_value((1u32, 3u32)), "B");
        assert_eq!(sheet.get_value((1u32, 4u32)), "C");
    }

    #[test]
    fn read_all_skips_rows_that_are_entirely_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gaps.xlsx");
        create_from(&path, &[record("A", "2.0", 0.08)]).unwrap();

        // blank out the data row by hand, leaving an empty row in the middle
        let mut book = reader::xlsx::read(&path).unwrap();
        let sheet = book
            .get_sheet_by_name_mut(SHEET_NAME)
            .expect("data sheet exists");
        for col in 1..=Field::ALL.len() as u32 {
            sheet.get_cell_mut((col, 2)).set_value_string("");
        }
        for (idx, field) in Field::ALL.iter().enumerate() {
            let text = format::render(*field, record("C", "1.8", 0.09).value(*field));
            sheet
                .get_cell_mut((idx as u32 + 1, 3))
                .set_value_string(text);
        }
        writer::xlsx::write(&book, &path).unwrap();

        let rows = read_all(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Field::TireName), Some("C"));
    }

    #[test]
    fn read_all_on_a_missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.xlsx");
        assert!(matches!(read_all(&path), Err(SheetError::Unreadable(_))));
    }

    #[test]
    fn empty_text_fields_round_trip_as_empty_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        let mut r = record("", "", 0.08);
        r.tire_name.clear();
        assert_eq!(r.value(Field::TireName), CellValue::Empty);
        create_from(&path, &[r]).unwrap();

        let rows = read_all(&path).unwrap();
        assert_eq!(rows[0].get(Field::TireName), Some(""));
        assert_eq!(rows[0].get(Field::RollingCoefficient), Some("0.080000"));
    }
}
