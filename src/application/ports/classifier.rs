use crate::domain::FeatureVector;

/// Pretrained two-class backend. Implementations are loaded once at startup
/// and shared read-only across concurrent requests.
pub trait Classifier: Send + Sync {
    /// Stable name used in logs and the readiness probe.
    fn name(&self) -> &'static str;

    /// Returns a probability distribution over {class 0, class 1}.
    fn classify(&self, features: &FeatureVector) -> Result<Vec<f32>, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
