use std::sync::Arc;

use sentinel_audio::application::services::{AnalysisError, AnalysisService};
use sentinel_audio::domain::ClassLabels;
use sentinel_audio::infrastructure::model::{ClassifierFactory, ForestClassifier};

use crate::helpers::{silent_wav, sine_wav, write_zeroed_conv_net};

const DEPTH_ONE_FOREST: &str = r#"{
    "n_classes": 2,
    "trees": [
        {
            "nodes": [
                {"feature": 0, "threshold": 0.0, "left": 1, "right": 2},
                {"leaf": [1.0, 0.0]},
                {"leaf": [0.0, 1.0]}
            ]
        }
    ]
}"#;

fn service() -> AnalysisService {
    let classifier = ForestClassifier::from_parts(DEPTH_ONE_FOREST, None).unwrap();
    AnalysisService::new(Arc::new(classifier), ClassLabels::default())
}

#[tokio::test]
async fn given_valid_wav_when_analyzing_then_a_complete_prediction_is_produced() {
    let service = service();
    let wav = sine_wav(22_050, 88_200);

    let prediction = service.analyze(&wav).await.unwrap();

    assert_eq!(prediction.probabilities.len(), 2);
    let total: f32 = prediction.probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert!(prediction.class_label == "DANGER" || prediction.class_label == "SAFE");
    assert!(prediction.confidence >= 0.5);
}

#[tokio::test]
async fn given_same_bytes_twice_when_analyzing_then_predictions_match() {
    let service = service();
    let wav = sine_wav(22_050, 44_100);

    let first = service.analyze(&wav).await.unwrap();
    let second = service.analyze(&wav).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn given_empty_upload_when_analyzing_then_decode_error_is_surfaced() {
    let service = service();

    let result = service.analyze(&[]).await;

    assert!(matches!(result, Err(AnalysisError::Decode(_))));
}

#[tokio::test]
async fn given_headerless_garbage_when_analyzing_then_fallbacks_still_yield_a_prediction() {
    // The cascade never rejects non-empty input, so even opaque bytes must
    // flow through to a classification.
    let service = service();
    let garbage = vec![0x5Au8; 4096];

    let prediction = service.analyze(&garbage).await.unwrap();

    assert_eq!(prediction.probabilities.len(), 2);
}

#[tokio::test]
async fn given_silent_clip_when_analyzing_with_tree_ensemble_then_prediction_is_defined() {
    let service = service();
    let wav = silent_wav(22_050, 88_200);

    let prediction = service.analyze(&wav).await.unwrap();

    let total: f32 = prediction.probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert!(prediction.class_label == "DANGER" || prediction.class_label == "SAFE");
    assert!(prediction.probabilities.iter().all(|p| p.is_finite()));
}

#[tokio::test]
async fn given_silent_clip_when_analyzing_with_conv_net_then_prediction_is_defined() {
    let file = tempfile::Builder::new()
        .suffix(".safetensors")
        .tempfile()
        .unwrap();
    write_zeroed_conv_net(file.path());
    let classifier = ClassifierFactory::from_artifacts(file.path(), None).unwrap();
    let service = AnalysisService::new(classifier, ClassLabels::default());
    let wav = silent_wav(22_050, 88_200);

    let prediction = service.analyze(&wav).await.unwrap();

    let total: f32 = prediction.probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-6);
    // Zero weights tie the logits; the tie resolves to the lowest index,
    // which carries the DANGER label under the default convention.
    assert_eq!(prediction.class_index, 0);
    assert_eq!(prediction.class_label, "DANGER");
}

#[tokio::test]
async fn given_flipped_label_convention_when_analyzing_then_labels_follow_configuration() {
    let classifier = ForestClassifier::from_parts(DEPTH_ONE_FOREST, None).unwrap();
    let default_service = service();
    let flipped_service =
        AnalysisService::new(Arc::new(classifier), ClassLabels::new(1).unwrap());
    let wav = sine_wav(22_050, 88_200);

    let default_prediction = default_service.analyze(&wav).await.unwrap();
    let flipped_prediction = flipped_service.analyze(&wav).await.unwrap();

    assert_eq!(default_prediction.class_index, flipped_prediction.class_index);
    assert_ne!(default_prediction.is_danger, flipped_prediction.is_danger);
}
