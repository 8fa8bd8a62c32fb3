//! Classifier Input

use crate::InferenceError;
use sensor_source::SensorSample;
use serde::{Deserialize, Serialize};

/// Number of model inputs
pub const FEATURE_COUNT: usize = 3;

/// Column order the classifier was trained with
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["ph", "conductivity", "ammonia"];

/// Single-row feature vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub ph: f64,
    pub conductivity: f64,
    pub ammonia: f64,
}

impl FeatureVector {
    pub fn new(ph: f64, conductivity: f64, ammonia: f64) -> Self {
        Self {
            ph,
            conductivity,
            ammonia,
        }
    }

    /// Values in training order
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [self.ph, self.conductivity, self.ammonia]
    }

    /// Values in training order, as the model's input precision
    pub fn as_f32(&self) -> [f32; FEATURE_COUNT] {
        self.values().map(|v| v as f32)
    }

    /// Reject values the model cannot consume
    pub fn validate(&self) -> Result<(), InferenceError> {
        for (name, value) in FEATURE_NAMES.iter().zip(self.values()) {
            if !value.is_finite() || !(value as f32).is_finite() {
                return Err(InferenceError::InvalidInput(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl From<SensorSample> for FeatureVector {
    fn from(sample: SensorSample) -> Self {
        Self::new(sample.ph, sample.conductivity, sample.ammonia)
    }
}

impl From<&SensorSample> for FeatureVector {
    fn from(sample: &SensorSample) -> Self {
        Self::from(*sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_order() {
        let features = FeatureVector::from(SensorSample::new(6.9, 850.5, 0.8));
        assert_eq!(features.values(), [6.9, 850.5, 0.8]);
        assert_eq!(features.as_f32(), [6.9_f32, 850.5_f32, 0.8_f32]);
    }

    #[test]
    fn test_validate() {
        assert!(FeatureVector::new(7.0, 400.0, 1.2).validate().is_ok());
        assert!(FeatureVector::new(-3.0, 0.0, 1e6).validate().is_ok());

        let err = FeatureVector::new(7.0, f64::NAN, 1.2).validate().unwrap_err();
        assert!(err.to_string().contains("conductivity"));

        // Finite as f64 but overflows the f32 input tensor
        assert!(FeatureVector::new(1e300, 400.0, 1.2).validate().is_err());
    }
}
