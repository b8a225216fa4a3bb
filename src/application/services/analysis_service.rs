use std::sync::Arc;

use crate::application::ports::{Classifier, ClassifierError, DecodeError};
use crate::domain::{assemble_prediction, ClassLabels, FeatureVector, Prediction};
use crate::infrastructure::audio::{normalize, DecodeCascade, MfccExtractor, NormalizeError};

/// The whole request pipeline behind one immutable object: decode cascade,
/// normalizer, feature extractor and the loaded classifier. Constructed
/// once at startup and shared read-only across requests; there is no other
/// cross-request state.
pub struct AnalysisService {
    cascade: DecodeCascade,
    extractor: MfccExtractor,
    classifier: Arc<dyn Classifier>,
    labels: ClassLabels,
}

impl AnalysisService {
    pub fn new(classifier: Arc<dyn Classifier>, labels: ClassLabels) -> Self {
        Self {
            cascade: DecodeCascade::new(),
            extractor: MfccExtractor::new(),
            classifier,
            labels,
        }
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    /// Runs decode -> normalize -> extract -> classify -> assemble on one
    /// upload. Deterministic for fixed input bytes.
    pub async fn analyze(&self, data: &[u8]) -> Result<Prediction, AnalysisError> {
        let decoded = self.cascade.decode(data).await?;
        tracing::debug!(
            strategy = decoded.strategy,
            duration_secs = decoded.duration_secs(),
            "Upload decoded"
        );

        let canonical = normalize(decoded)?;
        let features = self.extractor.extract(&canonical);

        let prediction = self.classify_features(&features)?;

        tracing::info!(
            label = prediction.class_label,
            confidence = prediction.confidence,
            "Analysis complete"
        );

        Ok(prediction)
    }

    fn classify_features(&self, features: &FeatureVector) -> Result<Prediction, AnalysisError> {
        let probabilities = self.classifier.classify(features)?;
        assemble_prediction(probabilities, self.labels).ok_or_else(|| {
            AnalysisError::Inference(ClassifierError::InferenceFailed(
                "backend returned an empty distribution".to_string(),
            ))
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("normalize: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("inference: {0}")]
    Inference(#[from] ClassifierError),
}
