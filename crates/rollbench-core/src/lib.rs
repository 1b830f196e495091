//! # Rollbench Core Library
//!
//! Core functionality for the Rollbench rolling-resistance test bench
//! companion.
//!
//! This library provides:
//! - The derivation pipeline from raw bench current measurements to the
//!   rolling-resistance coefficient
//! - The fixed 13-column record layout shared by every representation
//! - Workbook (`.xlsx`) synchronisation: one-time bootstrap, in-place
//!   appends that carry operator formatting forward, authoritative reads
//! - Full regeneration of the `;`-delimited text mirror
//! - Per-tire series grouping and chart rendering
//!
//! ## Example
//!
//! ```rust,ignore
//! use rollbench_core::prelude::*;
//!
//! let mut session = Session::new(Path::new("."), RigConfig::default());
//! let record = session.calculate(&input)?;
//! session.save()?;
//! session.export()?;
//! let series = session.plot_series()?;
//! ```

#![warn(missing_docs)]

pub mod format;
pub mod fsutil;
pub mod measure;
pub mod mirror;
pub mod plot;
pub mod record;
pub mod rig;
pub mod session;
pub mod source;
pub mod workbook;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::measure::{MeasureError, MeasurementInput};
    pub use crate::mirror::ExportError;
    pub use crate::plot::{PlotError, TireSeries};
    pub use crate::record::{CellValue, DerivedRecord, Field, RecordStore, SheetRow};
    pub use crate::rig::RigConfig;
    pub use crate::session::{SaveReceipt, Session, SessionError};
    pub use crate::source::RecordSource;
    pub use crate::workbook::SheetError;
}
