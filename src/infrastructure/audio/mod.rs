mod decode_cascade;
mod ffmpeg_decoder;
mod mfcc;
mod normalizer;
mod symphonia_decoder;
pub mod wav;

pub use decode_cascade::DecodeCascade;
pub use ffmpeg_decoder::FfmpegDecoder;
pub use mfcc::MfccExtractor;
pub use normalizer::{normalize, NormalizeError};
pub use symphonia_decoder::SymphoniaDecoder;
pub use wav::{RawPcmDecoder, RawWrapDecoder, WavRepairDecoder};
