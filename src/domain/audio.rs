/// Sample rate the classifier was trained against.
pub const TARGET_SAMPLE_RATE: u32 = 22_050;

/// Clip duration the classifier was trained against, in seconds.
pub const TARGET_DURATION_SECS: f32 = 4.0;

/// Exact sample count of canonical audio: 22 050 Hz x 4.0 s.
pub const TARGET_SAMPLES: usize = 88_200;

/// Mono PCM produced by the decode cascade. Always single-channel by
/// construction; `strategy` records which cascade stage produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub strategy: &'static str,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Audio normalized to the fixed rate and exact sample count the feature
/// extractor accepts. The only way to construct one is through the
/// normalizer, so `samples.len() == TARGET_SAMPLES` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalAudio {
    samples: Vec<f32>,
}

impl CanonicalAudio {
    pub(crate) fn from_exact(samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len(), TARGET_SAMPLES);
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}
