//! RIFF/WAVE synthesis and repair-oriented parsing.
//!
//! The parser here is deliberately more forgiving than a general-purpose
//! demuxer: mobile recorders routinely emit WAV files whose declared chunk
//! sizes disagree with the actual payload, so a truncated `data` chunk is
//! read as far as the bytes go instead of being rejected.

use async_trait::async_trait;

use crate::application::ports::{DecodeError, DecodeStrategy};
use crate::domain::{DecodedAudio, TARGET_DURATION_SECS};

const RIFF_HEADER_LEN: usize = 44;

/// Sample rates tried, in order, when interpreting an opaque payload as raw
/// 16-bit PCM. Covers the rates mobile capture stacks actually produce.
const RAW_PCM_CANDIDATE_RATES: &[u32] = &[44_100, 22_050, 16_000, 8_000];

/// Assumed rate for the last-resort wrap of an unrecognizable payload.
const RAW_WRAP_SAMPLE_RATE: u32 = 44_100;

/// Synthesizes a standard RIFF/WAVE PCM header for `data_len` bytes of
/// 16-bit little-endian samples.
pub fn synthesize_wav_header(data_len: u32, sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = sample_rate * block_align as u32;

    let mut header = Vec::with_capacity(RIFF_HEADER_LEN);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&(36 + data_len).to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // PCM format code
    header.extend_from_slice(&channels.to_le_bytes());
    header.extend_from_slice(&sample_rate.to_le_bytes());
    header.extend_from_slice(&byte_rate.to_le_bytes());
    header.extend_from_slice(&block_align.to_le_bytes());
    header.extend_from_slice(&bits_per_sample.to_le_bytes());
    header.extend_from_slice(b"data");
    header.extend_from_slice(&data_len.to_le_bytes());
    header
}

/// Wraps raw 16-bit LE sample bytes in a synthesized RIFF/WAVE container.
pub fn wrap_pcm16(data: &[u8], sample_rate: u32, channels: u16) -> Vec<u8> {
    let mut wav = synthesize_wav_header(data.len() as u32, sample_rate, channels);
    wav.extend_from_slice(data);
    wav
}

struct FmtChunk {
    format_code: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// Extracts mono f32 samples and the sample rate from a RIFF/WAVE payload,
/// walking `fmt `/`data` chunks directly. Multi-channel audio is downmixed
/// by channel averaging. Handles PCM8/PCM16 and 32-bit float payloads.
pub fn parse_riff_pcm(data: &[u8]) -> Result<(Vec<f32>, u32), DecodeError> {
    if data.len() < 12 || &data[..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(DecodeError::DecodingFailed(
            "not a RIFF/WAVE container".to_string(),
        ));
    }

    let mut fmt: Option<FmtChunk> = None;
    let mut pcm_bytes: Option<&[u8]> = None;

    let mut offset = 12;
    while offset + 8 <= data.len() {
        let chunk_id = &data[offset..offset + 4];
        let declared = u32::from_le_bytes([
            data[offset + 4],
            data[offset + 5],
            data[offset + 6],
            data[offset + 7],
        ]) as usize;
        let body_start = offset + 8;
        // Truncated chunks are read to the end of the payload.
        let body_end = (body_start + declared).min(data.len());
        let body = &data[body_start..body_end];

        match chunk_id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(DecodeError::DecodingFailed(
                        "fmt chunk too short".to_string(),
                    ));
                }
                fmt = Some(FmtChunk {
                    format_code: u16::from_le_bytes([body[0], body[1]]),
                    channels: u16::from_le_bytes([body[2], body[3]]),
                    sample_rate: u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
                    bits_per_sample: u16::from_le_bytes([body[14], body[15]]),
                });
            }
            b"data" => {
                pcm_bytes = Some(body);
            }
            _ => {}
        }

        // Chunks are word-aligned; a padding byte follows odd-sized bodies.
        offset = body_start + declared + (declared & 1);
    }

    let fmt = fmt.ok_or_else(|| DecodeError::DecodingFailed("missing fmt chunk".to_string()))?;
    let pcm = pcm_bytes
        .ok_or_else(|| DecodeError::DecodingFailed("missing data chunk".to_string()))?;

    if fmt.channels == 0 || fmt.sample_rate == 0 {
        return Err(DecodeError::DecodingFailed(format!(
            "implausible fmt chunk: {} channels at {} Hz",
            fmt.channels, fmt.sample_rate
        )));
    }

    let interleaved = convert_samples(pcm, &fmt)?;
    let samples = downmix(&interleaved, fmt.channels as usize);

    if samples.is_empty() {
        return Err(DecodeError::DecodingFailed(
            "data chunk holds no complete sample".to_string(),
        ));
    }

    Ok((samples, fmt.sample_rate))
}

fn convert_samples(pcm: &[u8], fmt: &FmtChunk) -> Result<Vec<f32>, DecodeError> {
    match (fmt.format_code, fmt.bits_per_sample) {
        // PCM
        (1, 16) => Ok(pcm
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32_768.0)
            .collect()),
        (1, 8) => Ok(pcm.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect()),
        // IEEE float
        (3, 32) => Ok(pcm
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()),
        (code, bits) => Err(DecodeError::DecodingFailed(format!(
            "unsupported wav encoding: format code {code}, {bits} bits per sample"
        ))),
    }
}

fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Cascade strategy 3: direct PCM extraction from a (possibly damaged)
/// RIFF/WAVE container.
pub struct WavRepairDecoder;

#[async_trait]
impl DecodeStrategy for WavRepairDecoder {
    fn name(&self) -> &'static str {
        "wav-repair"
    }

    async fn decode(&self, data: &[u8]) -> Result<DecodedAudio, DecodeError> {
        let (samples, sample_rate) = parse_riff_pcm(data)?;
        Ok(DecodedAudio {
            samples,
            sample_rate,
            strategy: self.name(),
        })
    }
}

/// Cascade strategy 4: assume the payload is headerless raw 16-bit LE mono
/// PCM and probe a fixed rate ladder. The first rate for which the payload
/// holds a full clip wins; exactly that many bytes are wrapped in a
/// synthesized header and re-read through the RIFF parser.
pub struct RawPcmDecoder;

#[async_trait]
impl DecodeStrategy for RawPcmDecoder {
    fn name(&self) -> &'static str {
        "raw-pcm-guess"
    }

    async fn decode(&self, data: &[u8]) -> Result<DecodedAudio, DecodeError> {
        for &rate in RAW_PCM_CANDIDATE_RATES {
            let needed = rate as usize * 2 * TARGET_DURATION_SECS as usize;
            if data.len() < needed {
                continue;
            }
            let wav = wrap_pcm16(&data[..needed], rate, 1);
            let (samples, sample_rate) = parse_riff_pcm(&wav)?;
            return Ok(DecodedAudio {
                samples,
                sample_rate,
                strategy: self.name(),
            });
        }
        Err(DecodeError::DecodingFailed(format!(
            "payload of {} bytes is shorter than a full clip at every candidate rate",
            data.len()
        )))
    }
}

/// Cascade strategy 5: wrap the entire payload under an assumed default
/// rate. Audibly wrong output is acceptable here; a well-formed result for
/// any non-empty payload is the point. An odd trailing byte is zero-padded
/// into a final sample so even a one-byte payload yields audio.
pub struct RawWrapDecoder;

#[async_trait]
impl DecodeStrategy for RawWrapDecoder {
    fn name(&self) -> &'static str {
        "raw-wrap"
    }

    async fn decode(&self, data: &[u8]) -> Result<DecodedAudio, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        let mut padded;
        let body = if data.len() % 2 == 0 {
            data
        } else {
            padded = data.to_vec();
            padded.push(0);
            padded.as_slice()
        };
        let wav = wrap_pcm16(body, RAW_WRAP_SAMPLE_RATE, 1);
        let (samples, sample_rate) = parse_riff_pcm(&wav)?;
        Ok(DecodedAudio {
            samples,
            sample_rate,
            strategy: self.name(),
        })
    }
}
