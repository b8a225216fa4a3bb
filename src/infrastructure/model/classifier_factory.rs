use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{Classifier, ClassifierError};

use super::conv_net_classifier::ConvNetClassifier;
use super::feature_scaler::FeatureScaler;
use super::forest_classifier::ForestClassifier;

pub struct ClassifierFactory;

impl ClassifierFactory {
    /// Selects and loads the backend once at startup, from the artifact
    /// extension alone: `.safetensors` is the fixed-topology network,
    /// `.json` the tree ensemble. Anything else is a fatal configuration
    /// error; it never surfaces at request time.
    pub fn from_artifacts(
        model_path: &Path,
        scaler_path: Option<&Path>,
    ) -> Result<Arc<dyn Classifier>, ClassifierError> {
        let extension = model_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension {
            "safetensors" => {
                if scaler_path.is_some() {
                    tracing::warn!(
                        "Scaler artifact configured but the fixed-topology backend does not use one; ignoring"
                    );
                }
                Ok(Arc::new(ConvNetClassifier::load(model_path)?))
            }
            "json" => {
                let scaler = scaler_path.map(FeatureScaler::load).transpose()?;
                Ok(Arc::new(ForestClassifier::load(model_path, scaler)?))
            }
            other => Err(ClassifierError::ModelLoadFailed(format!(
                "unrecognized model artifact extension: '{}' ({})",
                other,
                model_path.display()
            ))),
        }
    }
}
