use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Serialize;

use crate::application::services::AnalysisError;
use crate::domain::{Prediction, SUPPORTED_EXTENSIONS};
use crate::infrastructure::observability::RequestId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub filename: String,
    pub converted: bool,
    pub analysis: AnalysisBody,
}

#[derive(Serialize)]
pub struct AnalysisBody {
    pub prediction: usize,
    pub is_danger: u8,
    pub confidence: f32,
    pub class_label: &'static str,
    pub danger_probability: f32,
    pub safe_probability: f32,
}

/// Error bodies carry the correlation id so a client can quote it back
/// when reporting a rejected upload.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    pub request_id: String,
}

fn error_response(
    status: StatusCode,
    request_id: &RequestId,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            status: "error",
            message: message.into(),
            request_id: request_id.0.clone(),
        }),
    )
        .into_response()
}

fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|&e| e == ext)
        })
        .unwrap_or(false)
}

/// Accepts one audio file in the multipart `file` field, runs the analysis
/// pipeline and returns the structured prediction. Validation problems and
/// decode exhaustion are 400s; backend inference failures are 500s that
/// never take the server down.
#[tracing::instrument(skip_all)]
pub async fn upload_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &request_id,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = match field.bytes().await {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read file bytes");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &request_id,
                    format!("Failed to read file: {}", e),
                );
            }
        };
        file = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, data)) = file else {
        tracing::warn!("Upload request with no file field");
        return error_response(StatusCode::BAD_REQUEST, &request_id, "No file provided.");
    };

    if filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, &request_id, "No file selected");
    }

    if !allowed_file(&filename) {
        tracing::warn!(filename = %filename, "Rejected unsupported extension");
        return error_response(
            StatusCode::BAD_REQUEST,
            &request_id,
            format!("Unsupported file extension: {}", filename),
        );
    }

    if data.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, &request_id, "Empty file");
    }

    tracing::debug!(filename = %filename, bytes = data.len(), "Received upload");

    match state.analysis_service.analyze(&data).await {
        Ok(prediction) => {
            (StatusCode::OK, Json(success_response(filename, prediction))).into_response()
        }
        Err(e @ AnalysisError::Decode(_)) => {
            tracing::warn!(error = %e, "Decode cascade exhausted");
            error_response(
                StatusCode::BAD_REQUEST,
                &request_id,
                "Failed to convert audio to WAV format",
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &request_id,
                format!("Processing error: {}", e),
            )
        }
    }
}

fn success_response(filename: String, prediction: Prediction) -> UploadResponse {
    UploadResponse {
        status: "success",
        filename,
        converted: true,
        analysis: AnalysisBody {
            prediction: prediction.class_index,
            is_danger: prediction.is_danger as u8,
            confidence: prediction.confidence,
            class_label: prediction.class_label,
            danger_probability: prediction.danger_probability,
            safe_probability: prediction.safe_probability,
        },
    }
}
