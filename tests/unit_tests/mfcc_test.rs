use sentinel_audio::domain::{
    CanonicalAudio, DecodedAudio, FEATURE_LEN, N_MFCC, TARGET_SAMPLES, TARGET_SAMPLE_RATE,
};
use sentinel_audio::infrastructure::audio::wav::parse_riff_pcm;
use sentinel_audio::infrastructure::audio::{normalize, MfccExtractor};

use crate::helpers::build_wav;

fn canonical_from(samples: Vec<f32>) -> CanonicalAudio {
    normalize(DecodedAudio {
        samples,
        sample_rate: TARGET_SAMPLE_RATE,
        strategy: "test",
    })
    .unwrap()
}

fn sine(freq: f32, amplitude: f32) -> Vec<f32> {
    (0..TARGET_SAMPLES)
        .map(|n| {
            let t = n as f32 / TARGET_SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect()
}

#[test]
fn given_any_audio_when_extracting_then_vector_has_26_finite_elements() {
    let extractor = MfccExtractor::new();
    let features = extractor.extract(&canonical_from(sine(440.0, 0.5)));

    assert_eq!(features.as_slice().len(), FEATURE_LEN);
    assert!(features.as_slice().iter().all(|v| v.is_finite()));
}

#[test]
fn given_silent_audio_when_extracting_then_no_nan_or_inf_escapes() {
    let extractor = MfccExtractor::new();
    let features = extractor.extract(&canonical_from(vec![0.0; TARGET_SAMPLES]));

    assert_eq!(features.as_slice().len(), FEATURE_LEN);
    assert!(features.as_slice().iter().all(|v| v.is_finite()));
    // Every frame of silence is identical, so the deviation half is zero.
    assert!(features.as_slice()[N_MFCC..].iter().all(|&v| v == 0.0));
}

#[test]
fn given_identical_audio_twice_when_extracting_then_vectors_are_bit_identical() {
    let extractor = MfccExtractor::new();
    let audio = canonical_from(sine(440.0, 0.5));

    let first = extractor.extract(&audio);
    let second = extractor.extract(&audio);

    assert_eq!(first, second);
}

#[test]
fn given_two_extractor_instances_when_extracting_then_results_agree() {
    // The precomputed window/filterbank/DCT tables are deterministic.
    let audio = canonical_from(sine(880.0, 0.3));

    let first = MfccExtractor::new().extract(&audio);
    let second = MfccExtractor::new().extract(&audio);

    assert_eq!(first, second);
}

#[test]
fn given_different_signals_when_extracting_then_vectors_differ() {
    let extractor = MfccExtractor::new();

    let tone = extractor.extract(&canonical_from(sine(440.0, 0.5)));
    let silence = extractor.extract(&canonical_from(vec![0.0; TARGET_SAMPLES]));

    assert_ne!(tone, silence);
}

/// Deterministic broadband fixture. The generator is pure integer
/// arithmetic, so the sample values reproduce bit for bit everywhere.
fn noise_i16(len: usize) -> Vec<i16> {
    let mut state: u32 = 0x1234_5678;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 16) as i16
        })
        .collect()
}

// Reference output for the noise fixture above. Pins the full analysis
// chain (window, hop, filterbank, DCT, dB compression); any silent
// parameter drift moves these values far beyond the tolerance.
const PINNED_FEATURES: [f32; 26] = [
    148.892716,
    -4.26180267,
    -0.349684089,
    0.731616318,
    0.592790723,
    -0.194969624,
    -0.537393212,
    -0.165340275,
    -0.215685978,
    -0.171087027,
    0.232078686,
    0.570034623,
    0.392180294,
    2.59588218,
    3.28124690,
    3.23256874,
    3.16936445,
    3.14356160,
    2.89225197,
    3.04740357,
    3.16460705,
    2.90075588,
    2.93522573,
    2.88049555,
    2.92616105,
    2.79872394,
];

#[test]
fn given_reference_wav_fixture_when_extracting_then_output_matches_pinned_vector() {
    let wav = build_wav(TARGET_SAMPLE_RATE, 1, &noise_i16(TARGET_SAMPLES));
    let (samples, sample_rate) = parse_riff_pcm(&wav).unwrap();
    let audio = normalize(DecodedAudio {
        samples,
        sample_rate,
        strategy: "test",
    })
    .unwrap();

    let features = MfccExtractor::new().extract(&audio);

    for (i, (&got, &pinned)) in features
        .as_slice()
        .iter()
        .zip(PINNED_FEATURES.iter())
        .enumerate()
    {
        assert!(
            (got - pinned).abs() < 1e-4,
            "coefficient {i}: got {got}, pinned {pinned}"
        );
    }
}

#[test]
fn given_loud_and_quiet_tone_when_extracting_then_first_coefficient_tracks_energy() {
    let extractor = MfccExtractor::new();

    let loud = extractor.extract(&canonical_from(sine(440.0, 0.9)));
    let quiet = extractor.extract(&canonical_from(sine(440.0, 0.05)));

    // Coefficient 0 is a total-log-energy proxy.
    assert!(loud.as_slice()[0] > quiet.as_slice()[0]);
}
