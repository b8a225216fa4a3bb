use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::SUPPORTED_EXTENSIONS;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub backend: &'static str,
    pub processor_loaded: bool,
    pub supported_formats: Vec<&'static str>,
}

/// Readiness probe. Startup aborts on model-load failure, so a serving
/// process always reports its processor as loaded.
pub async fn home_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HomeResponse {
            status: "online",
            service: "Audio Danger Detection API",
            version: env!("CARGO_PKG_VERSION"),
            backend: state.analysis_service.classifier_name(),
            processor_loaded: true,
            supported_formats: SUPPORTED_EXTENSIONS.to_vec(),
        }),
    )
}

#[derive(Serialize)]
pub struct TestResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub processor: &'static str,
}

/// Liveness probe; takes no file.
pub async fn test_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(TestResponse {
            status: "success",
            message: "Server is working",
            processor: "ready",
        }),
    )
}
