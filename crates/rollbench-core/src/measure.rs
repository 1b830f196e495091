//! Rolling-resistance derivation
//!
//! Pure computation from raw bench inputs to a full [`DerivedRecord`]:
//!
//! 1. speed `v = π·D · rpm/60`
//! 2. mean idle and load currents
//! 3. effective tire mass `m_eff = m_hang · L_hang / L_tire`
//! 4. `P_0 = V·I_0`, `P_load = V·I_load`, `P_rr = P_load − P_0`
//! 5. `C_rr = P_rr / (m_eff · g · v)`
//!
//! Given identical inputs and rig constants the output is bit-identical.

use crate::format;
use crate::record::DerivedRecord;
use crate::rig::RigConfig;
use std::f64::consts::PI;
use thiserror::Error;

/// Errors from input parsing or the derivation itself
#[derive(Debug, Error)]
pub enum MeasureError {
    /// A current series contained no values
    #[error("no current values entered")]
    EmptySeries,

    /// A required single value was left empty
    #[error("no value entered")]
    MissingValue,

    /// A token did not parse as a decimal number
    #[error("not a valid number: '{0}'")]
    InvalidNumber(String),

    /// The coefficient divisor `m_eff · g · v` is zero or non-finite
    #[error("effective weight, gravity and speed must all be non-zero and finite")]
    DegenerateDivisor,
}

/// Raw operator inputs for one Calculate action
///
/// Current series and pressure are kept as entered; the entered text is
/// itself part of the record.
#[derive(Debug, Clone)]
pub struct MeasurementInput {
    /// Tire name / type (free text, may be empty)
    pub tire_name: String,
    /// Tire pressure in bar as entered (may be empty)
    pub tire_pressure: String,
    /// Space-separated idle current readings in amps
    pub idle_currents: String,
    /// Space-separated load current readings in amps
    pub load_currents: String,
    /// Mass hung on the lever arm in kg
    pub hanging_mass: f64,
}

/// Parse a space-separated series of decimals, accepting `,` or `.`.
pub fn parse_series(text: &str) -> Result<Vec<f64>, MeasureError> {
    let mut values = Vec::new();
    for token in text.split_whitespace() {
        let value = token
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| MeasureError::InvalidNumber(token.to_string()))?;
        values.push(value);
    }
    if values.is_empty() {
        return Err(MeasureError::EmptySeries);
    }
    Ok(values)
}

/// Parse a single user-entered decimal, accepting `,` or `.`.
pub fn parse_decimal(text: &str) -> Result<f64, MeasureError> {
    let cleaned = format::normalize_decimal(text);
    if cleaned.is_empty() {
        return Err(MeasureError::MissingValue);
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| MeasureError::InvalidNumber(text.trim().to_string()))
}

/// Derive the full record from raw inputs and the rig constants.
pub fn derive(input: &MeasurementInput, rig: &RigConfig) -> Result<DerivedRecord, MeasureError> {
    let idle = parse_series(&input.idle_currents)?;
    let load = parse_series(&input.load_currents)?;

    let circumference = PI * rig.wheel_diameter_m;
    let speed = circumference * (rig.motor_speed_rpm / 60.0);

    let mean_idle_current = idle.iter().sum::<f64>() / idle.len() as f64;
    let mean_load_current = load.iter().sum::<f64>() / load.len() as f64;

    let effective_weight = input.hanging_mass * rig.lever_hang_m / rig.lever_tire_m;

    let idle_power = rig.supply_voltage_v * mean_idle_current;
    let load_power = rig.supply_voltage_v * mean_load_current;
    let rolling_power = load_power - idle_power;

    let divisor = effective_weight * rig.gravity_m_s2 * speed;
    if divisor == 0.0 || !divisor.is_finite() {
        return Err(MeasureError::DegenerateDivisor);
    }
    let rolling_coefficient = rolling_power / divisor;

    Ok(DerivedRecord {
        tire_name: input.tire_name.trim().to_string(),
        tire_pressure: format::normalize_decimal(&input.tire_pressure),
        idle_currents: input.idle_currents.trim().to_string(),
        load_currents: input.load_currents.trim().to_string(),
        mean_idle_current,
        mean_load_current,
        lever_weight: input.hanging_mass,
        effective_weight,
        speed,
        idle_power,
        load_power,
        rolling_power,
        rolling_coefficient,
    })
}
