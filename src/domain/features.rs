/// Number of cepstral coefficients the classifier was trained on.
pub const N_MFCC: usize = 13;

/// Feature vector length: 13 coefficient means plus 13 standard deviations.
pub const FEATURE_LEN: usize = 2 * N_MFCC;

/// Fixed-length feature vector handed to the classifier. Every element is
/// finite; non-finite values from degenerate input are zeroed at
/// construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f32; FEATURE_LEN],
}

impl FeatureVector {
    /// Builds a vector from 13 means followed by 13 standard deviations,
    /// replacing NaN/Inf with 0.0.
    pub fn from_stats(means: &[f32; N_MFCC], std_devs: &[f32; N_MFCC]) -> Self {
        let mut values = [0.0f32; FEATURE_LEN];
        for (i, &m) in means.iter().enumerate() {
            values[i] = if m.is_finite() { m } else { 0.0 };
        }
        for (i, &s) in std_devs.iter().enumerate() {
            values[N_MFCC + i] = if s.is_finite() { s } else { 0.0 };
        }
        Self { values }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}
