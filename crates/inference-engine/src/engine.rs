//! Inference Engine Implementation

use crate::classifier::{Classifier, MockClassifier};
use crate::features::FeatureVector;
use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Result of inference operation
#[derive(Debug, Clone, Copy)]
pub struct InferenceResult {
    /// Positive-class probability (0.0 to 1.0)
    pub probability: f64,
    /// Forward pass latency
    pub latency: Duration,
}

/// Disease-risk inference engine.
///
/// Owns the classifier handle. The ONNX artifact is read on first use and
/// kept for the lifetime of the engine; concurrent first callers share a
/// single load.
pub struct InferenceEngine {
    /// ONNX artifact, absent for engines built around a ready classifier
    model_path: Option<PathBuf>,
    /// Loaded classifier
    model: OnceCell<Arc<dyn Classifier>>,
}

impl InferenceEngine {
    /// Create an engine that loads the ONNX model at `model_path` on first use
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        let model_path = model_path.into();
        info!("Creating inference engine with model: {}", model_path.display());

        Self {
            model_path: Some(model_path),
            model: OnceCell::new(),
        }
    }

    /// Create an engine around an already loaded classifier
    pub fn with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            model_path: None,
            model: OnceCell::from(classifier),
        }
    }

    /// Create a mock inference engine for testing
    pub fn mock() -> Self {
        info!("Creating mock inference engine");
        Self::with_classifier(Arc::new(MockClassifier::default()))
    }

    /// Get the classifier, loading it on the first call.
    ///
    /// A failed load is not cached.
    pub async fn load_model(&self) -> Result<Arc<dyn Classifier>, InferenceError> {
        let model = self
            .model
            .get_or_try_init(|| async {
                let path = self.model_path.clone().ok_or_else(|| {
                    InferenceError::ModelLoadError("no model path configured".to_string())
                })?;
                info!("Loading classifier from {}", path.display());
                let start = Instant::now();

                let classifier = tokio::task::spawn_blocking(move || OnnxClassifier::load(path))
                    .await
                    .map_err(|e| {
                        InferenceError::ModelLoadError(format!("model loader task failed: {}", e))
                    })?
                    .map_err(|e| {
                        warn!("Classifier load failed: {}", e);
                        e
                    })?;

                info!(
                    "Model {} loaded successfully in {}ms",
                    classifier.path().display(),
                    start.elapsed().as_millis()
                );
                Ok::<_, InferenceError>(Arc::new(classifier) as Arc<dyn Classifier>)
            })
            .await?;

        Ok(Arc::clone(model))
    }

    /// Run inference on a feature vector
    pub async fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        features.validate()?;
        let model = self.load_model().await?;

        let start = Instant::now();
        let probability = model.positive_probability(features)?;
        let latency = start.elapsed();

        if !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InferenceFailed(format!(
                "{} returned probability {} outside [0, 1]",
                model.name(),
                probability
            )));
        }

        debug!(
            "Inference completed: p={:.4} in {}us",
            probability,
            latency.as_micros()
        );
        Ok(InferenceResult {
            probability,
            latency,
        })
    }

    /// Check if the classifier is loaded
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Get model path, if the engine loads from one
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Name of the loaded classifier
    pub fn classifier_name(&self) -> Option<&str> {
        self.model.get().map(|model| model.name())
    }
}
