/// Builds a minimal PCM16 RIFF/WAVE file from interleaved samples.
pub fn build_wav(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let data_size = (samples.len() * 2) as u32;
    let block_align = channels * 2;
    let byte_rate = sample_rate * block_align as u32;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}

/// A 440 Hz mono sine clip, amplitude ~0.5.
pub fn sine_wav(sample_rate: u32, num_samples: usize) -> Vec<u8> {
    let samples: Vec<i16> = (0..num_samples)
        .map(|n| {
            let t = n as f32 / sample_rate as f32;
            (0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin() * i16::MAX as f32) as i16
        })
        .collect();
    build_wav(sample_rate, 1, &samples)
}

/// An all-zero mono clip.
pub fn silent_wav(sample_rate: u32, num_samples: usize) -> Vec<u8> {
    build_wav(sample_rate, 1, &vec![0i16; num_samples])
}

/// Writes a conv-net artifact with the expected topology and all-zero
/// weights. Zero logits softmax to a uniform distribution, which makes the
/// backend's output predictable without a trained model.
pub fn write_zeroed_conv_net(path: &std::path::Path) {
    use candle_core::{DType, Device, Tensor};

    let device = Device::Cpu;
    let mut tensors = std::collections::HashMap::new();
    tensors.insert(
        "conv1.weight".to_string(),
        Tensor::zeros((16, 1, 3, 3), DType::F32, &device).unwrap(),
    );
    tensors.insert(
        "conv1.bias".to_string(),
        Tensor::zeros(16, DType::F32, &device).unwrap(),
    );
    tensors.insert(
        "fc1.weight".to_string(),
        Tensor::zeros((64, 416), DType::F32, &device).unwrap(),
    );
    tensors.insert(
        "fc1.bias".to_string(),
        Tensor::zeros(64, DType::F32, &device).unwrap(),
    );
    tensors.insert(
        "fc2.weight".to_string(),
        Tensor::zeros((2, 64), DType::F32, &device).unwrap(),
    );
    tensors.insert(
        "fc2.bias".to_string(),
        Tensor::zeros(2, DType::F32, &device).unwrap(),
    );
    candle_core::safetensors::save(&tensors, path).unwrap();
}
