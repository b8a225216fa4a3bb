mod audio;
mod features;
mod format;
mod prediction;

pub use audio::{
    CanonicalAudio, DecodedAudio, TARGET_DURATION_SECS, TARGET_SAMPLES, TARGET_SAMPLE_RATE,
};
pub use features::{FeatureVector, FEATURE_LEN, N_MFCC};
pub use format::{sniff_format, AudioFormat, SUPPORTED_EXTENSIONS};
pub use prediction::{assemble_prediction, ClassLabels, Prediction, N_CLASSES};
