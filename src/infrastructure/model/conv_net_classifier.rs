use std::path::Path;

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::ops::softmax;
use candle_nn::{Conv2d, Conv2dConfig, Linear, VarBuilder};

use crate::application::ports::{Classifier, ClassifierError};
use crate::domain::{FeatureVector, N_CLASSES, N_MFCC};

const CONV_CHANNELS: usize = 16;
const HIDDEN: usize = 64;
// Conv keeps spatial dims (kernel 3, padding 1): 16 x 13 x 2.
const FLATTENED: usize = CONV_CHANNELS * N_MFCC * 2;

/// Fixed-topology network backend. The 26-element feature vector is
/// reshaped row-major to a (1, 1, 13, 2) tensor and pushed through a small
/// convolutional head whose weights were trained offline and shipped as a
/// safetensors artifact.
pub struct ConvNetClassifier {
    conv1: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl ConvNetClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let device = Device::Cpu;

        tracing::info!(path = %path.display(), "Loading fixed-topology classifier");

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &device)
                .map_err(|e| ClassifierError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let conv_cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };
        let conv1 = candle_nn::conv2d(1, CONV_CHANNELS, 3, conv_cfg, vb.pp("conv1"))
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("conv1: {}", e)))?;
        let fc1 = candle_nn::linear(FLATTENED, HIDDEN, vb.pp("fc1"))
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("fc1: {}", e)))?;
        let fc2 = candle_nn::linear(HIDDEN, N_CLASSES, vb.pp("fc2"))
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("fc2: {}", e)))?;

        tracing::info!("Fixed-topology classifier loaded");

        Ok(Self {
            conv1,
            fc1,
            fc2,
            device,
        })
    }

    fn forward(&self, features: &FeatureVector) -> candle_core::Result<Vec<f32>> {
        let input = Tensor::from_slice(features.as_slice(), (1, 1, N_MFCC, 2), &self.device)?;
        let x = self.conv1.forward(&input)?.relu()?;
        let x = x.flatten_from(1)?;
        let x = self.fc1.forward(&x)?.relu()?;
        let logits = self.fc2.forward(&x)?;
        let probs = softmax(&logits, 1)?;
        probs.squeeze(0)?.to_vec1::<f32>()
    }
}

impl Classifier for ConvNetClassifier {
    fn name(&self) -> &'static str {
        "conv-net"
    }

    fn classify(&self, features: &FeatureVector) -> Result<Vec<f32>, ClassifierError> {
        self.forward(features)
            .map_err(|e| ClassifierError::InferenceFailed(format!("forward pass: {}", e)))
    }
}
