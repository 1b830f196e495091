//! Record source selection
//!
//! Three representations coexist (session list, workbook, mirror); which one
//! answers a read is decided here, by a single existence check per call,
//! instead of scattering filesystem checks through the call sites.

use std::path::{Path, PathBuf};

use crate::record::{RecordStore, SheetRow};
use crate::workbook::{self, SheetError};

/// The representation treated as ground truth for one export or plot call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// The bound workbook exists; it wins, including manual edits made in a
    /// spreadsheet application between runs.
    Spreadsheet(PathBuf),
    /// No workbook yet; the in-session list is all there is.
    InMemory,
}

impl RecordSource {
    /// Decide the source for the bound spreadsheet path, right now.
    pub fn select(spreadsheet_path: &Path) -> Self {
        if spreadsheet_path.exists() {
            RecordSource::Spreadsheet(spreadsheet_path.to_path_buf())
        } else {
            RecordSource::InMemory
        }
    }

    /// The authoritative row set at call time.
    pub fn rows(&self, store: &RecordStore) -> Result<Vec<SheetRow>, SheetError> {
        match self {
            RecordSource::Spreadsheet(path) => workbook::read_all(path),
            RecordSource::InMemory => Ok(store.rows()),
        }
    }
}
