use std::sync::Arc;

use crate::application::services::AnalysisService;

/// Shared per-process state handed to every handler. The analysis service
/// (and the model handle inside it) is immutable after startup, so cloning
/// is reference counting only.
#[derive(Clone)]
pub struct AppState {
    pub analysis_service: Arc<AnalysisService>,
}
