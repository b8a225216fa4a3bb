use crate::domain::{CanonicalAudio, DecodedAudio, TARGET_SAMPLES, TARGET_SAMPLE_RATE};

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    // Contract violations by the decode stage, not request-level errors.
    #[error("decoded audio holds no samples")]
    EmptySamples,
    #[error("decoded audio reports a zero sample rate")]
    ZeroSampleRate,
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
}

/// Forces decoded audio into canonical form: resample to the target rate if
/// needed, then zero-pad or truncate (keeping the head) to the exact sample
/// count the feature extractor was trained on.
pub fn normalize(decoded: DecodedAudio) -> Result<CanonicalAudio, NormalizeError> {
    if decoded.samples.is_empty() {
        return Err(NormalizeError::EmptySamples);
    }
    if decoded.sample_rate == 0 {
        return Err(NormalizeError::ZeroSampleRate);
    }

    let mut samples = if decoded.sample_rate != TARGET_SAMPLE_RATE {
        tracing::debug!(
            from = decoded.sample_rate,
            to = TARGET_SAMPLE_RATE,
            "Resampling decoded audio"
        );
        resample(&decoded.samples, decoded.sample_rate, TARGET_SAMPLE_RATE)?
    } else {
        decoded.samples
    };

    match samples.len().cmp(&TARGET_SAMPLES) {
        std::cmp::Ordering::Less => {
            let padding = TARGET_SAMPLES - samples.len();
            samples.resize(TARGET_SAMPLES, 0.0);
            tracing::debug!(padding, "Padded short clip with silence");
        }
        std::cmp::Ordering::Greater => {
            samples.truncate(TARGET_SAMPLES);
            tracing::debug!("Truncated long clip to target length");
        }
        std::cmp::Ordering::Equal => {}
    }

    Ok(CanonicalAudio::from_exact(samples))
}

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, NormalizeError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| NormalizeError::ResamplingFailed(format!("resampler init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let result = resampler
            .process(&[input], None)
            .map_err(|e| NormalizeError::ResamplingFailed(format!("resample: {}", e)))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    // Trim to approximate expected length
    let expected_len = (samples.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}
