/// Configuration for tracing initialization. Built in `main` from the
/// resolved `Settings`; this layer never reads the process environment.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
}
