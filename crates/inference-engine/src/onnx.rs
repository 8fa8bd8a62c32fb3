//! tract-onnx Classifier

use crate::classifier::Classifier;
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::InferenceError;
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Binary classifier exported to ONNX.
///
/// The first `f32` output is read as class probabilities. With two or more
/// values per row, index 1 is the positive class; a single value is taken
/// as the positive-class probability itself.
pub struct OnnxClassifier {
    plan: OnnxPlan,
    path: PathBuf,
}

impl OnnxClassifier {
    /// Load and optimize a model for a `1 x 3` f32 input
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(InferenceError::ModelLoadError(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, FEATURE_COUNT]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                InferenceError::ModelLoadError(format!("{}: {:#}", path.display(), e))
            })?;

        Ok(Self {
            plan,
            path: path.to_path_buf(),
        })
    }

    /// Artifact this classifier was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Classifier for OnnxClassifier {
    fn positive_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let input: Tensor = tract_ndarray::arr2(&[features.as_f32()]).into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(format!("{:#}", e)))?;

        positive_class(&outputs)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Pick the positive-class probability out of a model's outputs
fn positive_class(outputs: &[TValue]) -> Result<f64, InferenceError> {
    let probabilities = outputs
        .iter()
        .find(|t| t.datum_type() == f32::datum_type())
        .ok_or_else(|| {
            InferenceError::InferenceFailed("model has no f32 probability output".to_string())
        })?;

    let values = probabilities
        .as_slice::<f32>()
        .map_err(|e| InferenceError::InferenceFailed(format!("{:#}", e)))?;

    match values {
        [] => Err(InferenceError::InvalidInputShape {
            expected: "at least 1 probability".to_string(),
            actual: format!("{:?}", probabilities.shape()),
        }),
        [p] => Ok(f64::from(*p)),
        [_, p, ..] => Ok(f64::from(*p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_models;
    use std::io::Write;

    #[test]
    fn test_missing_model() {
        let result = OnnxClassifier::load("/nonexistent/ckd_model.onnx");
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_malformed_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Field number 0 is never a valid protobuf tag
        file.write_all(b"\x07\x00not an onnx graph").unwrap();

        let result = OnnxClassifier::load(file.path());
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_directory_is_not_a_model() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxClassifier::load(dir.path());
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_two_class_model_reports_positive_class() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_models::write_two_class(dir.path());
        let classifier = OnnxClassifier::load(&path).unwrap();
        assert_eq!(classifier.path(), path.as_path());

        for ammonia in [0.1, 0.8, 2.0] {
            let p = classifier
                .positive_probability(&FeatureVector::new(6.9, 850.5, ammonia))
                .unwrap();
            assert!((p - test_models::sigmoid(ammonia)).abs() < 1e-6, "ammonia={}: p={}", ammonia, p);
        }
    }

    #[test]
    fn test_single_output_model_is_the_probability() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = OnnxClassifier::load(test_models::write_single_output(dir.path())).unwrap();

        let p = classifier
            .positive_probability(&FeatureVector::new(6.9, 850.5, 2.0))
            .unwrap();
        assert!((p - test_models::sigmoid(2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_empty_probability_output() {
        let empty = Tensor::zero::<f32>(&[1, 0]).unwrap();
        let result = positive_class(&[empty.into()]);
        assert!(matches!(result, Err(InferenceError::InvalidInputShape { .. })));
    }

    #[test]
    fn test_label_only_output() {
        let result = positive_class(&[tensor2(&[[1i64]]).into()]);
        assert!(matches!(result, Err(InferenceError::InferenceFailed(_))));
    }
}
