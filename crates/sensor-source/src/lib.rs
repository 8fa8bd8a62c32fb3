//! Sensor Readings and Sources
//!
//! Defines the reading shared by ingestion, inference and the sensor-data
//! endpoint, and the sources that produce readings for a given run mode.

mod mode;
mod source;

pub use mode::RunMode;
pub use source::{source_for, DeviceSource, SensorSource, SimulatedSource};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One set of band measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Sweat pH
    pub ph: f64,
    /// Conductivity (µS/cm)
    pub conductivity: f64,
    /// Ammonia concentration (mmol/L)
    pub ammonia: f64,
}

impl SensorSample {
    pub fn new(ph: f64, conductivity: f64, ammonia: f64) -> Self {
        Self {
            ph,
            conductivity,
            ammonia,
        }
    }

    /// True when every measurement is a finite number
    pub fn is_finite(&self) -> bool {
        self.ph.is_finite() && self.conductivity.is_finite() && self.ammonia.is_finite()
    }
}

/// Errors while acquiring a reading
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Sensor source unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_json_shape() {
        let sample = SensorSample::new(6.9, 850.5, 0.8);
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["ph"], 6.9);
        assert_eq!(json["conductivity"], 850.5);
        assert_eq!(json["ammonia"], 0.8);
    }

    #[test]
    fn test_missing_field_rejected() {
        let parsed: Result<SensorSample, _> =
            serde_json::from_str(r#"{"ph": 7.0, "conductivity": 400.0}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(SensorSample::new(7.0, 500.0, 1.0).is_finite());
        assert!(!SensorSample::new(f64::NAN, 500.0, 1.0).is_finite());
        assert!(!SensorSample::new(7.0, f64::INFINITY, 1.0).is_finite());
    }
}
