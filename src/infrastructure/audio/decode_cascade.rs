use crate::application::ports::{DecodeError, DecodeStrategy};
use crate::domain::{sniff_format, DecodedAudio};

use super::ffmpeg_decoder::FfmpegDecoder;
use super::symphonia_decoder::SymphoniaDecoder;
use super::wav::{RawPcmDecoder, RawWrapDecoder, WavRepairDecoder};

/// Ordered best-effort decode chain. Lower-indexed strategies are strictly
/// preferred; the later ones trade correctness for availability and may
/// produce audibly wrong but well-formed output. The cascade fails only on
/// empty input.
pub struct DecodeCascade {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl DecodeCascade {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(FfmpegDecoder),
                Box::new(SymphoniaDecoder),
                Box::new(WavRepairDecoder),
                Box::new(RawPcmDecoder),
                Box::new(RawWrapDecoder),
            ],
        }
    }

    pub async fn decode(&self, data: &[u8]) -> Result<DecodedAudio, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::EmptyInput);
        }

        let format = sniff_format(data);
        tracing::debug!(format = %format, bytes = data.len(), "Sniffed upload format");

        for strategy in &self.strategies {
            match strategy.decode(data).await {
                Ok(decoded) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        samples = decoded.samples.len(),
                        sample_rate = decoded.sample_rate,
                        "Decode strategy succeeded"
                    );
                    return Ok(decoded);
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "Decode strategy failed, falling through"
                    );
                }
            }
        }

        // Unreachable in practice: the raw-wrap stage accepts any non-empty
        // payload.
        Err(DecodeError::DecodingFailed(
            "all decode strategies exhausted".to_string(),
        ))
    }
}

impl Default for DecodeCascade {
    fn default() -> Self {
        Self::new()
    }
}
