use std::path::Path;

use serde::Deserialize;

use crate::application::ports::{Classifier, ClassifierError};
use crate::domain::{FeatureVector, FEATURE_LEN, N_CLASSES};

use super::feature_scaler::FeatureScaler;

/// Tree-ensemble backend. The artifact is a JSON export of the trained
/// forest: each tree is a flat node array where split nodes reference their
/// children by index and leaves carry either a class distribution or, for
/// older exports, only a hard vote.
pub struct ForestClassifier {
    trees: Vec<Tree>,
    scaler: Option<FeatureScaler>,
}

#[derive(Debug, Deserialize)]
struct ForestArtifact {
    n_classes: usize,
    trees: Vec<Tree>,
}

#[derive(Debug, Deserialize)]
struct Tree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: Vec<f32>,
    },
    Vote {
        vote: usize,
    },
}

impl ForestClassifier {
    pub fn load(path: &Path, scaler: Option<FeatureScaler>) -> Result<Self, ClassifierError> {
        tracing::info!(
            path = %path.display(),
            scaled = scaler.is_some(),
            "Loading tree-ensemble classifier"
        );

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("read artifact: {}", e)))?;
        let artifact: ForestArtifact = serde_json::from_str(&contents)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("parse artifact: {}", e)))?;

        if artifact.n_classes != N_CLASSES {
            return Err(ClassifierError::ModelLoadFailed(format!(
                "expected {} classes, artifact declares {}",
                N_CLASSES, artifact.n_classes
            )));
        }
        if artifact.trees.is_empty() {
            return Err(ClassifierError::ModelLoadFailed(
                "artifact holds no trees".to_string(),
            ));
        }

        tracing::info!(trees = artifact.trees.len(), "Tree ensemble loaded");

        Ok(Self {
            trees: artifact.trees,
            scaler,
        })
    }

    pub fn from_parts(trees_json: &str, scaler: Option<FeatureScaler>) -> Result<Self, ClassifierError> {
        let artifact: ForestArtifact = serde_json::from_str(trees_json)
            .map_err(|e| ClassifierError::ModelLoadFailed(format!("parse artifact: {}", e)))?;
        if artifact.n_classes != N_CLASSES || artifact.trees.is_empty() {
            return Err(ClassifierError::ModelLoadFailed(
                "malformed forest artifact".to_string(),
            ));
        }
        Ok(Self {
            trees: artifact.trees,
            scaler,
        })
    }
}

impl Classifier for ForestClassifier {
    fn name(&self) -> &'static str {
        "tree-ensemble"
    }

    fn classify(&self, features: &FeatureVector) -> Result<Vec<f32>, ClassifierError> {
        let row: Vec<f32> = match &self.scaler {
            Some(scaler) => scaler.transform(features.as_slice())?,
            None => features.as_slice().to_vec(),
        };

        let mut distribution = vec![0.0f32; N_CLASSES];
        for tree in &self.trees {
            let leaf = walk(tree, &row)?;
            match leaf {
                // Probability-capable leaf: accumulate its distribution.
                TreeNode::Leaf { leaf } => {
                    if leaf.len() != N_CLASSES {
                        return Err(ClassifierError::InferenceFailed(format!(
                            "leaf distribution has {} entries, expected {}",
                            leaf.len(),
                            N_CLASSES
                        )));
                    }
                    let total: f32 = leaf.iter().sum();
                    if total > 0.0 {
                        for (slot, &v) in distribution.iter_mut().zip(leaf.iter()) {
                            *slot += v / total;
                        }
                    }
                }
                // Vote-only leaf: degrade to a one-hot contribution.
                TreeNode::Vote { vote } => {
                    let idx = *vote;
                    if idx >= N_CLASSES {
                        return Err(ClassifierError::InferenceFailed(format!(
                            "vote for class {idx} out of range"
                        )));
                    }
                    distribution[idx] += 1.0;
                }
                TreeNode::Split { .. } => unreachable!("walk only returns terminal nodes"),
            }
        }

        let n_trees = self.trees.len() as f32;
        for slot in distribution.iter_mut() {
            *slot /= n_trees;
        }

        Ok(distribution)
    }
}

fn walk<'t>(tree: &'t Tree, row: &[f32]) -> Result<&'t TreeNode, ClassifierError> {
    let mut idx = 0usize;
    // Bounded by node count: malformed child links terminate with an error
    // instead of spinning.
    for _ in 0..=tree.nodes.len() {
        let node = tree.nodes.get(idx).ok_or_else(|| {
            ClassifierError::InferenceFailed(format!("node index {idx} out of range"))
        })?;
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= FEATURE_LEN {
                    return Err(ClassifierError::InferenceFailed(format!(
                        "split on feature {feature} outside the {FEATURE_LEN}-element vector"
                    )));
                }
                idx = if row[*feature] <= *threshold { *left } else { *right };
            }
            terminal => return Ok(terminal),
        }
    }
    Err(ClassifierError::InferenceFailed(
        "tree walk exceeded node count; cyclic child links".to_string(),
    ))
}
