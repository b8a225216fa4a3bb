use std::path::PathBuf;

use serde::Deserialize;

use super::Environment;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(skip, default = "default_environment")]
    pub environment: Environment,
    /// Emit JSON log lines; defaults per deployment tier.
    #[serde(default)]
    pub log_json: bool,
    pub server: ServerSettings,
    pub model: ModelSettings,
}

fn default_environment() -> Environment {
    Environment::Local
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Artifact path; the extension alone selects the backend variant.
    pub model_path: PathBuf,
    /// Optional scaler artifact, used by the tree-ensemble backend.
    pub scaler_path: Option<PathBuf>,
    /// Which probability index the trained artifact assigns to "danger".
    /// Pinned per deployment; see ClassLabels.
    pub danger_class_index: usize,
}

impl Settings {
    /// Environment-variable configuration with development defaults.
    pub fn from_env() -> Self {
        let environment = std::env::var("APP_ENV")
            .ok()
            .and_then(|v| Environment::try_from(v).ok())
            .unwrap_or(Environment::Local);

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or_else(|_| environment.json_logs_by_default());

        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let model_path = std::env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models/danger_classifier.safetensors"));
        let scaler_path = std::env::var("SCALER_PATH").ok().map(PathBuf::from);
        let danger_class_index = std::env::var("DANGER_CLASS_INDEX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self {
            environment,
            log_json,
            server: ServerSettings { host, port },
            model: ModelSettings {
                model_path,
                scaler_path,
                danger_class_index,
            },
        }
    }
}
