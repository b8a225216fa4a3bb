mod probes;
mod upload;

pub use probes::{home_handler, test_handler};
pub use upload::upload_handler;
