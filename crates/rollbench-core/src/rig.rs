//! Test-rig configuration
//!
//! The physical constants of the bench are fixed for a whole session but
//! differ between rigs, so they live in an explicit config struct instead of
//! module-level constants. The defaults match the reference rig.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Physical constants of one test rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Driven wheel diameter in metres
    pub wheel_diameter_m: f64,

    /// Motor speed in revolutions per minute
    pub motor_speed_rpm: f64,

    /// Motor supply voltage in volts
    pub supply_voltage_v: f64,

    /// Gravitational acceleration in m/s²
    pub gravity_m_s2: f64,

    /// Lever arm length on the hanging-mass side in metres
    pub lever_hang_m: f64,

    /// Lever arm length on the tire side in metres
    pub lever_tire_m: f64,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            wheel_diameter_m: 0.645,
            motor_speed_rpm: 213.0,
            supply_voltage_v: 12.0,
            gravity_m_s2: 9.81,
            lever_hang_m: 0.875,
            lever_tire_m: 0.358,
        }
    }
}

/// Errors that can occur while loading a rig configuration file
#[derive(Debug, Error)]
pub enum RigConfigError {
    /// The config file could not be read
    #[error("could not read rig config: {0}")]
    Io(#[from] io::Error),

    /// The config file is not valid JSON for this struct
    #[error("invalid rig config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RigConfig {
    /// Load a rig configuration from a JSON file.
    ///
    /// Missing fields fall back to the reference rig's values.
    pub fn from_file(path: &Path) -> Result<Self, RigConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_matches_reference_rig() {
        let rig = RigConfig::default();
        assert_eq!(rig.wheel_diameter_m, 0.645);
        assert_eq!(rig.motor_speed_rpm, 213.0);
        assert_eq!(rig.supply_voltage_v, 12.0);
        assert_eq!(rig.gravity_m_s2, 9.81);
        assert_eq!(rig.lever_hang_m, 0.875);
        assert_eq!(rig.lever_tire_m, 0.358);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let rig: RigConfig = serde_json::from_str(r#"{"motor_speed_rpm": 180.0}"#).unwrap();
        assert_eq!(rig.motor_speed_rpm, 180.0);
        assert_eq!(rig.wheel_diameter_m, 0.645);
    }

    #[test]
    fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rig.json");
        let rig = RigConfig {
            motor_speed_rpm: 250.0,
            ..RigConfig::default()
        };
        std::fs::write(&path, serde_json::to_string(&rig).unwrap()).unwrap();

        let loaded = RigConfig::from_file(&path).unwrap();
        assert_eq!(loaded, rig);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RigConfig::from_file(Path::new("/nonexistent/rig.json")).unwrap_err();
        assert!(matches!(err, RigConfigError::Io(_)));
    }
}
