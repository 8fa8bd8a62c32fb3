//! ONNX Inference Engine
//!
//! Estimates disease risk from a band reading using a pre-trained binary
//! classifier executed with tract-onnx.

mod classifier;
mod engine;
mod features;
mod onnx;
#[cfg(test)]
mod test_models;

pub use classifier::{Classifier, MockClassifier};
pub use engine::{InferenceEngine, InferenceResult};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use onnx::OnnxClassifier;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}
