use sentinel_audio::domain::{assemble_prediction, ClassLabels, N_CLASSES};

#[test]
fn given_danger_dominant_distribution_when_assembling_then_labelled_danger() {
    let prediction = assemble_prediction(vec![0.9, 0.1], ClassLabels::default()).unwrap();

    assert_eq!(prediction.class_index, 0);
    assert_eq!(prediction.class_label, "DANGER");
    assert!(prediction.is_danger);
    assert_eq!(prediction.confidence, 0.9);
    assert_eq!(prediction.danger_probability, 0.9);
    assert_eq!(prediction.safe_probability, 0.1);
}

#[test]
fn given_safe_dominant_distribution_when_assembling_then_labelled_safe() {
    let prediction = assemble_prediction(vec![0.2, 0.8], ClassLabels::default()).unwrap();

    assert_eq!(prediction.class_index, 1);
    assert_eq!(prediction.class_label, "SAFE");
    assert!(!prediction.is_danger);
    assert_eq!(prediction.confidence, 0.8);
    assert_eq!(prediction.danger_probability, 0.2);
    assert_eq!(prediction.safe_probability, 0.8);
}

#[test]
fn given_exact_tie_when_assembling_then_lowest_index_wins() {
    let prediction = assemble_prediction(vec![0.5, 0.5], ClassLabels::default()).unwrap();

    assert_eq!(prediction.class_index, 0);
    assert!(prediction.is_danger);
}

#[test]
fn given_flipped_label_convention_when_assembling_then_danger_tracks_configured_index() {
    let labels = ClassLabels::new(1).unwrap();

    let prediction = assemble_prediction(vec![0.3, 0.7], labels).unwrap();

    assert_eq!(prediction.class_index, 1);
    assert_eq!(prediction.class_label, "DANGER");
    assert!(prediction.is_danger);
    assert_eq!(prediction.danger_probability, 0.7);
    assert_eq!(prediction.safe_probability, 0.3);
}

#[test]
fn given_in_range_danger_index_when_constructing_labels_then_accepted() {
    for index in 0..N_CLASSES {
        let labels = ClassLabels::new(index).unwrap();
        assert_eq!(labels.danger_index(), index);
    }
}

#[test]
fn given_out_of_range_danger_index_when_constructing_labels_then_rejected() {
    // An index past the binary range would zero the reported danger
    // probability and label everything SAFE; construction must refuse it.
    assert!(ClassLabels::new(N_CLASSES).is_none());
    assert!(ClassLabels::new(usize::MAX).is_none());
}

#[test]
fn given_empty_distribution_when_assembling_then_none() {
    assert!(assemble_prediction(vec![], ClassLabels::default()).is_none());
}

#[test]
fn given_distribution_when_assembling_then_raw_probabilities_are_preserved() {
    let prediction = assemble_prediction(vec![0.25, 0.75], ClassLabels::default()).unwrap();
    assert_eq!(prediction.probabilities, vec![0.25, 0.75]);
}
