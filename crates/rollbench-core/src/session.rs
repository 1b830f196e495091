//! Operator workflow
//!
//! One [`Session`] per process run. It binds the spreadsheet and mirror
//! paths once at startup (collision-free against earlier runs) and owns the
//! in-memory record list plus the last calculated result; the four operator
//! actions (calculate, save, export, plot) live here.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::fsutil;
use crate::measure::{self, MeasureError, MeasurementInput};
use crate::mirror::{self, ExportError};
use crate::plot::{self, PlotError, TireSeries};
use crate::record::{DerivedRecord, RecordStore};
use crate::rig::RigConfig;
use crate::source::RecordSource;
use crate::workbook::{self, SheetError};

/// Base name of the managed spreadsheet file.
pub const SPREADSHEET_BASE: &str = "rolling_resistance_data.xlsx";
/// Base name of the managed mirror file.
pub const MIRROR_BASE: &str = "rolling_resistance_data.csv";
/// Base name of rendered chart files.
pub const PLOT_BASE: &str = "rolling_resistance_plot.png";

/// Errors surfaced by the operator actions
#[derive(Debug, Error)]
pub enum SessionError {
    /// Save was requested before any successful Calculate
    #[error("nothing calculated yet; run Calculate before saving")]
    NothingToSave,

    /// Input parsing or the derivation failed
    #[error("input error: {0}")]
    Measure(#[from] MeasureError),

    /// Regenerating the mirror failed
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// Reading or writing the workbook failed
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Grouping or rendering the chart failed
    #[error("plot failed: {0}")]
    Plot(#[from] PlotError),
}

/// Outcome of a save action
///
/// A failed workbook append is reported here instead of failing the save:
/// the record is already safe in the session list.
#[derive(Debug)]
pub struct SaveReceipt {
    /// Total records in the session list after this save
    pub count: usize,
    /// Set when the workbook exists but appending to it failed
    pub sheet_error: Option<SheetError>,
}

/// One operator session: bound output files, record list, last result
#[derive(Debug)]
pub struct Session {
    rig: RigConfig,
    dir: PathBuf,
    spreadsheet_path: PathBuf,
    mirror_path: PathBuf,
    store: RecordStore,
    last: Option<DerivedRecord>,
}

impl Session {
    /// Bind a session to `dir`, resolving both managed file names once.
    ///
    /// The resolved paths never collide with files from earlier runs and
    /// stay fixed for the life of the session.
    pub fn new(dir: &Path, rig: RigConfig) -> Self {
        let spreadsheet_path = fsutil::unique_path(&dir.join(SPREADSHEET_BASE));
        let mirror_path = fsutil::unique_path(&dir.join(MIRROR_BASE));
        info!(
            spreadsheet = %spreadsheet_path.display(),
            mirror = %mirror_path.display(),
            "session bound"
        );
        Self {
            rig,
            dir: dir.to_path_buf(),
            spreadsheet_path,
            mirror_path,
            store: RecordStore::new(),
            last: None,
        }
    }

    /// The bound spreadsheet path.
    pub fn spreadsheet_path(&self) -> &Path {
        &self.spreadsheet_path
    }

    /// The bound mirror path.
    pub fn mirror_path(&self) -> &Path {
        &self.mirror_path
    }

    /// The rig constants in use.
    pub fn rig(&self) -> &RigConfig {
        &self.rig
    }

    /// Records saved to the session list so far.
    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    /// The last calculated record, if any.
    pub fn last_record(&self) -> Option<&DerivedRecord> {
        self.last.as_ref()
    }

    /// Derive a record from raw inputs.
    ///
    /// The result is held for display and a later save; nothing is stored or
    /// written yet.
    pub fn calculate(&mut self, input: &MeasurementInput) -> Result<&DerivedRecord, SessionError> {
        let record = measure::derive(input, &self.rig)?;
        Ok(self.last.insert(record))
    }

    /// Store the last calculated record.
    ///
    /// Always appends to the session list; additionally appends to the
    /// workbook when it already exists. A workbook failure does not undo the
    /// list append, it is carried in the receipt.
    pub fn save(&mut self) -> Result<SaveReceipt, SessionError> {
        let record = self.last.clone().ok_or(SessionError::NothingToSave)?;
        let count = self.store.append(record.clone());
        let sheet_error = match workbook::append_if_exists(&self.spreadsheet_path, &record) {
            Ok(()) => None,
            Err(e) => {
                warn!("workbook append failed, record kept in session list: {e}");
                Some(e)
            }
        };
        Ok(SaveReceipt { count, sheet_error })
    }

    /// Export: bootstrap the workbook if absent, then regenerate the mirror.
    ///
    /// Returns the number of data rows the mirror now holds. The mirror is
    /// always rebuilt from the workbook, so edits made there by hand are
    /// reflected.
    pub fn export(&mut self) -> Result<usize, SessionError> {
        if !self.spreadsheet_path.exists() {
            workbook::create_from(&self.spreadsheet_path, self.store.records())?;
            info!(path = %self.spreadsheet_path.display(), "workbook bootstrapped");
        }
        let rows = mirror::regenerate(&self.spreadsheet_path, &self.mirror_path)?;
        Ok(rows)
    }

    /// Grouped per-tire series from whichever store is authoritative now.
    pub fn plot_series(&self) -> Result<Vec<TireSeries>, SessionError> {
        let source = RecordSource::select(&self.spreadsheet_path);
        let rows = source.rows(&self.store)?;
        Ok(plot::group_series(&rows)?)
    }

    /// Render the current series to a fresh PNG next to the data files.
    ///
    /// Each call writes a new file so earlier charts are kept.
    pub fn render_plot(&self) -> Result<PathBuf, SessionError> {
        let series = self.plot_series()?;
        let path = fsutil::unique_path(&self.dir.join(PLOT_BASE));
        plot::render_chart(&series, &path)?;
        Ok(path)
    }
}
