use std::io::Cursor;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{DecodeError, DecodeStrategy};
use crate::domain::{sniff_format, DecodedAudio, TARGET_DURATION_SECS};

/// Cascade strategy 2: embedded decode through symphonia's probe and codec
/// registry, with forced mono downmix and truncation to at most one clip at
/// the source rate. Resampling is the normalizer's job, not this one's.
pub struct SymphoniaDecoder;

#[async_trait]
impl DecodeStrategy for SymphoniaDecoder {
    fn name(&self) -> &'static str {
        "symphonia"
    }

    async fn decode(&self, data: &[u8]) -> Result<DecodedAudio, DecodeError> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = sniff_format(data).extension_hint() {
            hint.with_extension(ext);
        }

        let format_opts = FormatOptions::default();
        let metadata_opts = MetadataOptions::default();
        let decoder_opts = DecoderOptions::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &format_opts, &metadata_opts)
            .map_err(|e| DecodeError::DecodingFailed(format!("probe: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| DecodeError::DecodingFailed("no audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let source_rate = codec_params
            .sample_rate
            .ok_or_else(|| DecodeError::DecodingFailed("unknown sample rate".to_string()))?;
        if source_rate == 0 {
            return Err(DecodeError::DecodingFailed("zero sample rate".to_string()));
        }
        let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &decoder_opts)
            .map_err(|e| DecodeError::DecodingFailed(format!("codec: {}", e)))?;

        // Anything past one clip length is discarded by the normalizer
        // anyway, so stop decoding there.
        let max_samples = (source_rate as f32 * TARGET_DURATION_SECS) as usize;
        let mut all_samples: Vec<f32> = Vec::with_capacity(max_samples);

        'packets: loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(DecodeError::DecodingFailed(format!("packet: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(symphonia::core::errors::Error::DecodeError(e)) => {
                    tracing::warn!(error = %e, "Skipping corrupt audio frame");
                    continue;
                }
                Err(e) => {
                    return Err(DecodeError::DecodingFailed(format!("decode: {}", e)));
                }
            };

            let spec = *decoded.spec();
            let num_frames = decoded.frames();
            if num_frames == 0 {
                continue;
            }

            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            let samples = sample_buf.samples();

            // Downmix to mono if multi-channel
            if channels > 1 {
                for frame in samples.chunks(channels) {
                    let mono: f32 = frame.iter().sum::<f32>() / channels as f32;
                    all_samples.push(mono);
                    if all_samples.len() >= max_samples {
                        break 'packets;
                    }
                }
            } else {
                for &s in samples {
                    all_samples.push(s);
                    if all_samples.len() >= max_samples {
                        break 'packets;
                    }
                }
            }
        }

        if all_samples.is_empty() {
            return Err(DecodeError::DecodingFailed(
                "no audio samples decoded".to_string(),
            ));
        }

        tracing::debug!(
            samples = all_samples.len(),
            sample_rate = source_rate,
            "Audio decoded to mono PCM"
        );

        Ok(DecodedAudio {
            samples: all_samples,
            sample_rate: source_rate,
            strategy: self.name(),
        })
    }
}
