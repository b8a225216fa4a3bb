pub mod config;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{Environment, Settings, MAX_UPLOAD_BYTES};
pub use router::create_router;
pub use state::AppState;
