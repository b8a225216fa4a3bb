use std::path::Path;

use serde::Deserialize;

use crate::application::ports::ClassifierError;
use crate::domain::FEATURE_LEN;

/// Learned affine feature transform exported alongside the tree-ensemble
/// artifact: `x' = (x - mean) / scale`, element-wise over the 26-element
/// vector.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl FeatureScaler {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("read scaler: {}", e)))?;
        let scaler: Self = serde_json::from_str(&contents)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("parse scaler: {}", e)))?;
        scaler.validate()?;
        tracing::info!(path = %path.display(), "Feature scaler loaded");
        Ok(scaler)
    }

    pub fn new(mean: Vec<f32>, scale: Vec<f32>) -> Result<Self, ClassifierError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        if self.mean.len() != FEATURE_LEN || self.scale.len() != FEATURE_LEN {
            return Err(ClassifierError::ModelLoadFailed(format!(
                "scaler shape mismatch: mean {} / scale {}, expected {}",
                self.mean.len(),
                self.scale.len(),
                FEATURE_LEN
            )));
        }
        if self.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return Err(ClassifierError::ModelLoadFailed(
                "scaler holds zero or non-finite scale entries".to_string(),
            ));
        }
        Ok(())
    }

    pub fn transform(&self, features: &[f32]) -> Result<Vec<f32>, ClassifierError> {
        if features.len() != FEATURE_LEN {
            return Err(ClassifierError::InferenceFailed(format!(
                "feature vector has {} elements, scaler expects {}",
                features.len(),
                FEATURE_LEN
            )));
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }
}
