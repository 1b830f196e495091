//! In-session record list
//!
//! Append-only; order of insertion is the only order. Repeated trials with
//! the same tire and pressure are legal, so nothing here acts as a key.

use super::{DerivedRecord, SheetRow};

/// Ordered list of completed records for the current process run
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<DerivedRecord>,
}

impl RecordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return the new total count.
    pub fn append(&mut self, record: DerivedRecord) -> usize {
        self.records.push(record);
        self.records.len()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been saved yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[DerivedRecord] {
        &self.records
    }

    /// The stored records rendered into workbook row shape.
    pub fn rows(&self) -> Vec<SheetRow> {
        self.records.iter().map(SheetRow::from_record).collect()
    }
}
