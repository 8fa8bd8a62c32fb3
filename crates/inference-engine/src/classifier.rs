//! Classifier Seam

use crate::{FeatureVector, InferenceError};

/// Binary classifier producing the positive-class probability
pub trait Classifier: Send + Sync {
    /// Probability that the reading belongs to the positive (at-risk) class
    fn positive_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Short human-readable identifier
    fn name(&self) -> &str;
}

/// Fixed-weight logistic classifier for development and tests.
///
/// Risk rises as pH drifts from neutral sweat pH and as conductivity and
/// ammonia increase.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    bias: f64,
    ph_weight: f64,
    conductivity_weight: f64,
    ammonia_weight: f64,
}

impl MockClassifier {
    const NEUTRAL_PH: f64 = 7.4;
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self {
            bias: -4.0,
            ph_weight: 0.8,
            conductivity_weight: 0.002,
            ammonia_weight: 1.5,
        }
    }
}

impl Classifier for MockClassifier {
    fn positive_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let z = self.bias
            + self.ph_weight * (features.ph - Self::NEUTRAL_PH).abs()
            + self.conductivity_weight * features.conductivity
            + self.ammonia_weight * features.ammonia;

        let probability = 1.0 / (1.0 + (-z).exp());
        if probability.is_nan() {
            return Err(InferenceError::InferenceFailed(format!(
                "logit {} is not a number",
                z
            )));
        }
        Ok(probability)
    }

    fn name(&self) -> &str {
        "mock-logistic"
    }
}
