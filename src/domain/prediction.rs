/// Both trained artifact generations are binary danger/safe classifiers.
pub const N_CLASSES: usize = 2;

/// Which probability index the trained artifact assigns to the danger
/// class. Pinned at startup per deployment; the two observed artifact
/// generations disagree on it, so it is configuration, never inferred from
/// array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassLabels {
    danger_index: usize,
}

impl ClassLabels {
    /// `None` when the index falls outside the binary class range. Every
    /// distribution has exactly `N_CLASSES` entries, so an out-of-range
    /// index would silently pin danger_probability to zero.
    pub fn new(danger_index: usize) -> Option<Self> {
        (danger_index < N_CLASSES).then_some(Self { danger_index })
    }

    pub fn danger_index(&self) -> usize {
        self.danger_index
    }

    pub fn label_for(&self, class_index: usize) -> &'static str {
        if class_index == self.danger_index {
            "DANGER"
        } else {
            "SAFE"
        }
    }

    pub fn is_danger(&self, class_index: usize) -> bool {
        class_index == self.danger_index
    }
}

impl Default for ClassLabels {
    // Matches the trained artifact currently deployed: index 0 = danger.
    fn default() -> Self {
        Self { danger_index: 0 }
    }
}

/// Structured classification result for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_index: usize,
    pub class_label: &'static str,
    pub is_danger: bool,
    pub confidence: f32,
    pub danger_probability: f32,
    pub safe_probability: f32,
    pub probabilities: Vec<f32>,
}

/// Assembles a prediction from a class-probability distribution. Arg-max
/// with ties broken by lowest index; `None` only for an empty distribution,
/// which is a backend contract violation.
pub fn assemble_prediction(probabilities: Vec<f32>, labels: ClassLabels) -> Option<Prediction> {
    if probabilities.is_empty() {
        return None;
    }

    let mut class_index = 0;
    let mut confidence = probabilities[0];
    for (i, &p) in probabilities.iter().enumerate().skip(1) {
        if p > confidence {
            class_index = i;
            confidence = p;
        }
    }

    let safe_index = if labels.danger_index == 0 { 1 } else { 0 };
    let danger_probability = probabilities.get(labels.danger_index).copied().unwrap_or(0.0);
    let safe_probability = probabilities.get(safe_index).copied().unwrap_or(0.0);

    Some(Prediction {
        class_index,
        class_label: labels.label_for(class_index),
        is_danger: labels.is_danger(class_index),
        confidence,
        danger_probability,
        safe_probability,
        probabilities,
    })
}
