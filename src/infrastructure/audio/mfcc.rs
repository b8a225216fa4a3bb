//! MFCC feature extraction with parameters pinned to the classifier's
//! training pipeline: 13 coefficients, 2048-sample FFT frames, 512 hop,
//! centered analysis, 128-band Slaney-style mel filterbank, log-power
//! compression and an orthonormal DCT-II. Changing any of these silently
//! breaks the trained model's input contract.

use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::domain::{CanonicalAudio, FeatureVector, N_MFCC, TARGET_SAMPLE_RATE};

const N_FFT: usize = 2048;
const HOP_LENGTH: usize = 512;
const N_MELS: usize = 128;

// Log-power compression floor and dynamic-range clamp.
const AMIN: f32 = 1e-10;
const TOP_DB: f32 = 80.0;

/// Stateless after construction; the FFT plan, analysis window, filterbank
/// and DCT basis are computed once at startup and shared across requests.
pub struct MfccExtractor {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    mel_filters: Vec<Vec<f32>>,
    dct_basis: Vec<Vec<f32>>,
}

impl MfccExtractor {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(N_FFT),
            window: periodic_hann(N_FFT),
            mel_filters: mel_filterbank(TARGET_SAMPLE_RATE, N_FFT, N_MELS),
            dct_basis: dct_ii_ortho_basis(N_MFCC, N_MELS),
        }
    }

    /// Computes the 26-element feature vector: per-coefficient mean and
    /// population standard deviation across all analysis frames. Never
    /// fails; degenerate (e.g. silent) input produces zeros where the
    /// statistics are undefined.
    pub fn extract(&self, audio: &CanonicalAudio) -> FeatureVector {
        let padded = reflect_pad(audio.samples(), N_FFT / 2);
        let n_frames = 1 + (padded.len() - N_FFT) / HOP_LENGTH;

        // coefficients[k] collects coefficient k across all frames
        let mut coefficients = vec![Vec::with_capacity(n_frames); N_MFCC];
        let mut mel_frames = Vec::with_capacity(n_frames);
        let mut db_max = f32::NEG_INFINITY;

        let mut fft_buf = vec![Complex::new(0.0f32, 0.0f32); N_FFT];
        for frame_idx in 0..n_frames {
            let start = frame_idx * HOP_LENGTH;
            for (i, slot) in fft_buf.iter_mut().enumerate() {
                *slot = Complex::new(padded[start + i] * self.window[i], 0.0);
            }
            self.fft.process(&mut fft_buf);

            let mut mel = vec![0.0f32; N_MELS];
            for (m, filter) in self.mel_filters.iter().enumerate() {
                let mut acc = 0.0f32;
                for (bin, &w) in filter.iter().enumerate() {
                    if w != 0.0 {
                        acc += w * fft_buf[bin].norm_sqr();
                    }
                }
                let db = 10.0 * acc.max(AMIN).log10();
                if db > db_max {
                    db_max = db;
                }
                mel[m] = db;
            }
            mel_frames.push(mel);
        }

        // The dynamic-range clamp is relative to the loudest point of the
        // whole spectrogram, so it runs after all frames are known.
        let floor = db_max - TOP_DB;
        for mel in &mut mel_frames {
            for v in mel.iter_mut() {
                if *v < floor {
                    *v = floor;
                }
            }
        }

        for mel in &mel_frames {
            for (k, basis) in self.dct_basis.iter().enumerate() {
                let c: f32 = basis.iter().zip(mel.iter()).map(|(b, m)| b * m).sum();
                coefficients[k].push(c);
            }
        }

        let mut means = [0.0f32; N_MFCC];
        let mut std_devs = [0.0f32; N_MFCC];
        for (k, series) in coefficients.iter().enumerate() {
            let n = series.len() as f32;
            let mean = series.iter().sum::<f32>() / n;
            let var = series.iter().map(|&c| (c - mean) * (c - mean)).sum::<f32>() / n;
            means[k] = mean;
            std_devs[k] = var.sqrt();
        }

        FeatureVector::from_stats(&means, &std_devs)
    }
}

impl Default for MfccExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Mirror-pads without repeating the edge sample, matching centered
/// short-time analysis.
fn reflect_pad(samples: &[f32], pad: usize) -> Vec<f32> {
    debug_assert!(samples.len() > pad);
    let mut padded = Vec::with_capacity(samples.len() + 2 * pad);
    for i in (1..=pad).rev() {
        padded.push(samples[i]);
    }
    padded.extend_from_slice(samples);
    let last = samples.len() - 1;
    for i in 1..=pad {
        padded.push(samples[last - i]);
    }
    padded
}

fn periodic_hann(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| 0.5 - 0.5 * ((2.0 * PI * n as f64 / len as f64).cos()) as f32)
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    // Slaney scale: linear below 1 kHz, logarithmic above.
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = 6.4f64.ln() / 27.0;
    if hz >= min_log_hz {
        min_log_mel + (hz / min_log_hz).ln() / logstep
    } else {
        hz / f_sp
    }
}

fn mel_to_hz(mel: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = 6.4f64.ln() / 27.0;
    if mel >= min_log_mel {
        min_log_hz * ((mel - min_log_mel) * logstep).exp()
    } else {
        mel * f_sp
    }
}

/// Triangular mel filterbank with Slaney area normalization, 0 Hz to
/// Nyquist.
fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let nyquist = sample_rate as f64 / 2.0;
    let mel_max = hz_to_mel(nyquist);

    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
        .collect();

    let bin_freqs: Vec<f64> = (0..n_fft / 2 + 1)
        .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
        .collect();

    let mut filters = Vec::with_capacity(n_mels);
    for m in 0..n_mels {
        let (lo, mid, hi) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
        let enorm = 2.0 / (hi - lo);
        let mut weights = vec![0.0f32; bin_freqs.len()];
        for (k, &f) in bin_freqs.iter().enumerate() {
            let lower = (f - lo) / (mid - lo);
            let upper = (hi - f) / (hi - mid);
            let w = lower.min(upper).max(0.0);
            weights[k] = (w * enorm) as f32;
        }
        filters.push(weights);
    }
    filters
}

/// Orthonormal DCT-II basis, `n_out` rows over `n_in` inputs.
fn dct_ii_ortho_basis(n_out: usize, n_in: usize) -> Vec<Vec<f32>> {
    let mut basis = Vec::with_capacity(n_out);
    for k in 0..n_out {
        let scale = if k == 0 {
            (1.0 / n_in as f64).sqrt()
        } else {
            (2.0 / n_in as f64).sqrt()
        };
        let row: Vec<f32> = (0..n_in)
            .map(|n| (scale * (PI * k as f64 * (2 * n + 1) as f64 / (2 * n_in) as f64).cos()) as f32)
            .collect();
        basis.push(row);
    }
    basis
}
