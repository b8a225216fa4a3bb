use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{DecodeError, DecodeStrategy};
use crate::domain::{DecodedAudio, TARGET_SAMPLE_RATE};

use super::wav::parse_riff_pcm;

/// Places the external converter is looked for, in order.
const FFMPEG_CANDIDATES: &[&str] = &[
    "ffmpeg",
    "ffmpeg.exe",
    "/usr/bin/ffmpeg",
    "/usr/local/bin/ffmpeg",
];

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const CONVERT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cascade strategy 1: force-convert through an external ffmpeg binary to
/// mono 16-bit PCM at the target rate. Every invocation is bounded by a
/// hard timeout and `kill_on_drop`, so a hung converter cannot outlive its
/// request. Input and output live in request-scoped temp files that RAII
/// deletes on every exit path.
pub struct FfmpegDecoder;

impl FfmpegDecoder {
    async fn locate_binary() -> Option<&'static str> {
        for candidate in FFMPEG_CANDIDATES {
            let probe = Command::new(candidate)
                .arg("-version")
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .kill_on_drop(true)
                .output();
            match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
                Ok(Ok(output)) if output.status.success() => return Some(candidate),
                _ => continue,
            }
        }
        None
    }
}

#[async_trait]
impl DecodeStrategy for FfmpegDecoder {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn decode(&self, data: &[u8]) -> Result<DecodedAudio, DecodeError> {
        let binary = Self::locate_binary()
            .await
            .ok_or_else(|| DecodeError::ToolUnavailable("ffmpeg not found".to_string()))?;

        let mut input = tempfile::NamedTempFile::new()
            .map_err(|e| DecodeError::DecodingFailed(format!("temp input: {}", e)))?;
        input
            .write_all(data)
            .map_err(|e| DecodeError::DecodingFailed(format!("temp input write: {}", e)))?;
        input
            .flush()
            .map_err(|e| DecodeError::DecodingFailed(format!("temp input flush: {}", e)))?;

        let output = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(|e| DecodeError::DecodingFailed(format!("temp output: {}", e)))?;

        let run = Command::new(binary)
            .arg("-i")
            .arg(input.path())
            .args(["-f", "wav"])
            .args(["-ar", &TARGET_SAMPLE_RATE.to_string()])
            .args(["-ac", "1"])
            .args(["-acodec", "pcm_s16le"])
            .arg("-y")
            .arg(output.path())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .output();

        let result = tokio::time::timeout(CONVERT_TIMEOUT, run)
            .await
            .map_err(|_| DecodeError::DecodingFailed("ffmpeg timed out".to_string()))?
            .map_err(|e| DecodeError::DecodingFailed(format!("ffmpeg spawn: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(DecodeError::DecodingFailed(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.lines().last().unwrap_or("")
            )));
        }

        let wav_bytes = std::fs::read(output.path())
            .map_err(|e| DecodeError::DecodingFailed(format!("read converted wav: {}", e)))?;

        let (samples, sample_rate) = parse_riff_pcm(&wav_bytes)?;

        tracing::debug!(
            samples = samples.len(),
            sample_rate,
            "ffmpeg conversion succeeded"
        );

        Ok(DecodedAudio {
            samples,
            sample_rate,
            strategy: self.name(),
        })
    }
}
