use async_trait::async_trait;

use crate::domain::DecodedAudio;

/// One stage of the decode cascade. Strategies are attempted in order; a
/// returned error means "fall through to the next strategy", not a request
/// failure.
#[async_trait]
pub trait DecodeStrategy: Send + Sync {
    /// Stable name used in logs and in `DecodedAudio::strategy`.
    fn name(&self) -> &'static str;

    async fn decode(&self, data: &[u8]) -> Result<DecodedAudio, DecodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("empty input: no bytes to decode")]
    EmptyInput,
    #[error("decoding failed: {0}")]
    DecodingFailed(String),
    #[error("decode tool unavailable: {0}")]
    ToolUnavailable(String),
}
