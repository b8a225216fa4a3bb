mod classifier;
mod decode_strategy;

pub use classifier::{Classifier, ClassifierError};
pub use decode_strategy::{DecodeError, DecodeStrategy};
