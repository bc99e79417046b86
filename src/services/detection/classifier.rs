// Classifier Adapter
// Wraps the pretrained binary classifier behind a fixed-vector -> label contract

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use super::ModelError;
use crate::models::Label;

/// Opaque pretrained binary classifier. Pure and deterministic for a given vector.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f32]) -> Label;
}

/// Exported form of a linear decision function (e.g. a linear SVM):
/// `{"weights": [...], "intercept": b, "classes": [c0, c1]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Linear classifier: `w·x + b > 0` selects the second class, otherwise the first.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    weights: Vec<f64>,
    intercept: f64,
    classes: [i64; 2],
}

impl LinearClassifier {
    pub fn new(weights: Vec<f64>, intercept: f64, classes: [i64; 2]) -> Self {
        Self { weights, intercept, classes }
    }

    pub fn from_artifact(artifact: LinearModelArtifact, expected_dim: usize) -> Result<Self, ModelError> {
        if artifact.weights.len() != expected_dim {
            return Err(ModelError::DimensionMismatch {
                expected: expected_dim,
                found: artifact.weights.len(),
            });
        }
        let classes: [i64; 2] = artifact
            .classes
            .as_slice()
            .try_into()
            .map_err(|_| ModelError::InvalidClasses(artifact.classes.len()))?;
        Ok(Self::new(artifact.weights, artifact.intercept, classes))
    }

    /// Load a JSON classifier artifact from disk
    pub fn load(path: &Path, expected_dim: usize) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path)?;
        let artifact: LinearModelArtifact = serde_json::from_str(&content)?;
        let classifier = Self::from_artifact(artifact, expected_dim)?;
        info!(
            path = %path.display(),
            dim = classifier.weights.len(),
            classes = ?classifier.classes,
            "classifier.loaded"
        );
        Ok(classifier)
    }

    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    pub fn decision_function(&self, features: &[f32]) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * f64::from(*x))
            .sum::<f64>()
            + self.intercept
    }

    /// Raw class value, before the label convention is applied
    pub fn predict_class(&self, features: &[f32]) -> i64 {
        if self.decision_function(features) > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f32]) -> Label {
        Label::from_class(self.predict_class(features))
    }
}
