use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use sentinel_audio::application::services::AnalysisService;
use sentinel_audio::domain::ClassLabels;
use sentinel_audio::infrastructure::model::ClassifierFactory;
use sentinel_audio::infrastructure::observability::{init_tracing, TracingConfig};
use sentinel_audio::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(
        TracingConfig {
            environment: settings.environment.to_string(),
            json_format: settings.log_json,
        },
        settings.server.port,
    );

    // A model that does not load is a startup failure; the process must
    // never report ready against a half-initialized backend.
    let classifier = ClassifierFactory::from_artifacts(
        &settings.model.model_path,
        settings.model.scaler_path.as_deref(),
    )
    .map_err(|e| anyhow::anyhow!("classifier startup failed: {e}"))?;

    // A danger index outside the binary class range would silently zero
    // the reported danger probability, so it is fatal at startup.
    let labels = ClassLabels::new(settings.model.danger_class_index).ok_or_else(|| {
        anyhow::anyhow!(
            "DANGER_CLASS_INDEX must be 0 or 1, got {}",
            settings.model.danger_class_index
        )
    })?;

    tracing::info!(
        backend = classifier.name(),
        model = %settings.model.model_path.display(),
        danger_index = labels.danger_index(),
        "Classifier ready"
    );

    let analysis_service = Arc::new(AnalysisService::new(classifier, labels));
    let state = AppState { analysis_service };

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
