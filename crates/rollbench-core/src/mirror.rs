//! Text mirror of the workbook
//!
//! The `;`-delimited UTF-8 mirror is regenerated in full from the workbook on
//! every export, never patched incrementally, so it always reflects the
//! workbook's current content including rows deleted there by hand.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::format;
use crate::record::{CellValue, Field};
use crate::workbook::{self, SheetError};

/// Field delimiter of the mirror file.
pub const DELIMITER: char = ';';

/// Errors from mirror regeneration
#[derive(Debug, Error)]
pub enum ExportError {
    /// The workbook has not been created yet
    #[error("spreadsheet does not exist yet; export creates it first")]
    NoSpreadsheet,

    /// Reading the workbook failed
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// Writing the mirror file failed
    #[error("mirror could not be written: {0}")]
    Io(#[from] std::io::Error),
}

/// Rewrite the mirror from the workbook's current rows.
///
/// Returns the number of data rows written. The workbook is read in full
/// before the mirror is touched, so a failed read leaves the old mirror
/// intact. Values are not quoted or escaped; a tire name containing `;`
/// shifts that row's columns (the historical export format has no quoting).
pub fn regenerate(spreadsheet_path: &Path, mirror_path: &Path) -> Result<usize, ExportError> {
    if !spreadsheet_path.exists() {
        return Err(ExportError::NoSpreadsheet);
    }
    let rows = workbook::read_all(spreadsheet_path)?;

    let file = File::create(mirror_path)?;
    let mut writer = BufWriter::new(file);

    let header: Vec<&str> = Field::ALL.iter().map(|field| field.title()).collect();
    writeln!(writer, "{}", header.join(&DELIMITER.to_string()))?;

    for row in &rows {
        let mut line = String::new();
        for (idx, field) in Field::ALL.iter().enumerate() {
            if idx > 0 {
                line.push(DELIMITER);
            }
            let raw = row.get(*field).unwrap_or("");
            line.push_str(&format::render(*field, CellValue::Text(raw)));
        }
        writeln!(writer, "{line}")?;
    }

    writer.flush()?;
    debug!(path = %mirror_path.display(), rows = rows.len(), "mirror regenerated");
    Ok(rows.len())
}
