mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{ModelSettings, ServerSettings, Settings, MAX_UPLOAD_BYTES};
