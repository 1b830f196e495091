//! Measurement records and the fixed column layout
//!
//! Every representation of a completed measurement (session list, workbook,
//! text mirror) shares the same 13 columns in the same order. The column
//! titles are the compatibility contract with files produced by earlier
//! versions of the tool and must not change.

mod store;

pub use store::RecordStore;

use std::collections::HashMap;

/// The 13 fixed columns, in persisted order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Tire name / type as entered (free text)
    TireName,
    /// Tire pressure in bar, as entered
    TirePressure,
    /// Raw idle current series, as entered
    IdleCurrents,
    /// Raw load current series, as entered
    LoadCurrents,
    /// Arithmetic mean of the idle currents
    MeanIdleCurrent,
    /// Arithmetic mean of the load currents
    MeanLoadCurrent,
    /// Mass hung on the lever arm
    LeverWeight,
    /// Hanging mass rescaled by the lever-arm ratio
    EffectiveWeight,
    /// Wheel surface speed
    Speed,
    /// Power drawn with no load on the tire
    IdlePower,
    /// Power drawn with the tire loaded
    LoadPower,
    /// Rolling-resistance power (loaded minus idle)
    RollingPower,
    /// Rolling-resistance coefficient
    RollingCoefficient,
}

impl Field {
    /// All fields, in column order.
    pub const ALL: [Field; 13] = [
        Field::TireName,
        Field::TirePressure,
        Field::IdleCurrents,
        Field::LoadCurrents,
        Field::MeanIdleCurrent,
        Field::MeanLoadCurrent,
        Field::LeverWeight,
        Field::EffectiveWeight,
        Field::Speed,
        Field::IdlePower,
        Field::LoadPower,
        Field::RollingPower,
        Field::RollingCoefficient,
    ];

    /// Column title as written to the workbook header and the mirror.
    pub fn title(self) -> &'static str {
        match self {
            Field::TireName => "Tire name / type",
            Field::TirePressure => "Tire pressure [bar]",
            Field::IdleCurrents => "Idle currents [A]",
            Field::LoadCurrents => "Load currents [A]",
            Field::MeanIdleCurrent => "Mean idle current [A]",
            Field::MeanLoadCurrent => "Mean load current [A]",
            Field::LeverWeight => "Weight on lever [kg]",
            Field::EffectiveWeight => "Effective weight on tire [kg]",
            Field::Speed => "Speed [m/s]",
            Field::IdlePower => "P_0 [W]",
            Field::LoadPower => "P_load [W]",
            Field::RollingPower => "P_rr [W]",
            Field::RollingCoefficient => "C_rr",
        }
    }

    /// Decimal places used when rendering a numeric value for this column.
    pub fn decimal_places(self) -> usize {
        match self {
            Field::TirePressure | Field::IdlePower | Field::LoadPower | Field::RollingPower => 2,
            Field::RollingCoefficient => 6,
            _ => 3,
        }
    }
}

/// A single cell value before rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    /// No value; renders as the empty string
    Empty,
    /// Free text, rendered with comma-to-dot normalisation
    Text(&'a str),
    /// Numeric value, rendered with the column's decimal places
    Number(f64),
}

/// The immutable result of one Calculate action
///
/// Created by [`crate::measure::derive`] and never mutated afterwards; the
/// stores only ever hold copies.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    /// Tire name / type, trimmed
    pub tire_name: String,
    /// Tire pressure in bar as entered, decimal separator normalised
    pub tire_pressure: String,
    /// Idle current series exactly as entered, trimmed
    pub idle_currents: String,
    /// Load current series exactly as entered, trimmed
    pub load_currents: String,
    /// Mean idle current in amps
    pub mean_idle_current: f64,
    /// Mean load current in amps
    pub mean_load_current: f64,
    /// Hanging mass in kg
    pub lever_weight: f64,
    /// Effective mass on the tire in kg
    pub effective_weight: f64,
    /// Wheel surface speed in m/s
    pub speed: f64,
    /// No-load power in watts
    pub idle_power: f64,
    /// Loaded power in watts
    pub load_power: f64,
    /// Rolling-resistance power in watts
    pub rolling_power: f64,
    /// Rolling-resistance coefficient (dimensionless)
    pub rolling_coefficient: f64,
}

impl DerivedRecord {
    /// The value of one column of this record.
    pub fn value(&self, field: Field) -> CellValue<'_> {
        fn text(s: &str) -> CellValue<'_> {
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s)
            }
        }

        match field {
            Field::TireName => text(&self.tire_name),
            Field::TirePressure => text(&self.tire_pressure),
            Field::IdleCurrents => text(&self.idle_currents),
            Field::LoadCurrents => text(&self.load_currents),
            Field::MeanIdleCurrent => CellValue::Number(self.mean_idle_current),
            Field::MeanLoadCurrent => CellValue::Number(self.mean_load_current),
            Field::LeverWeight => CellValue::Number(self.lever_weight),
            Field::EffectiveWeight => CellValue::Number(self.effective_weight),
            Field::Speed => CellValue::Number(self.speed),
            Field::IdlePower => CellValue::Number(self.idle_power),
            Field::LoadPower => CellValue::Number(self.load_power),
            Field::RollingPower => CellValue::Number(self.rolling_power),
            Field::RollingCoefficient => CellValue::Number(self.rolling_coefficient),
        }
    }
}

/// One row as stored in the workbook: header title to raw cell text
///
/// This is the shape [`crate::workbook::read_all`] returns and the shape the
/// mirror and the series grouper consume, so rows from the workbook and rows
/// from the in-memory store are interchangeable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    cells: HashMap<String, String>,
}

impl SheetRow {
    /// Set one cell by header title.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    /// The raw cell text for a column, if present.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.cells.get(field.title()).map(String::as_str)
    }

    /// True when every stored cell is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(String::is_empty)
    }

    /// A record rendered into row shape via the canonical formatter.
    pub fn from_record(record: &DerivedRecord) -> Self {
        let mut row = SheetRow::default();
        for field in Field::ALL {
            row.insert(field.title(), crate::format::render(field, record.value(field)));
        }
        row
    }
}
