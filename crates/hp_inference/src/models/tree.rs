use hp_core::{Error, Regressor, Result};
use crate::artifact::{validate_feature_names, NodeArtifact};
use super::{check_input, check_output};

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// A single regression tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl Tree {
    /// Children must point strictly forward, which rules out cycles and
    /// bounds every traversal by the node count.
    pub fn new(nodes: Vec<NodeArtifact>, n_features: usize) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::Artifact("tree has no nodes".to_string()));
        }
        let len = nodes.len();
        let nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| match node {
                NodeArtifact::Leaf { value } if value.is_finite() => Ok(Node::Leaf(value)),
                NodeArtifact::Leaf { .. } => {
                    Err(Error::Artifact(format!("leaf {} has a non-finite value", index)))
                }
                NodeArtifact::Split { feature, threshold, left, right } => {
                    if feature >= n_features {
                        return Err(Error::Artifact(format!(
                            "node {} splits on feature {} but the model takes {}",
                            index, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(Error::Artifact(format!("node {} has a NaN threshold", index)));
                    }
                    for child in [left, right] {
                        if child <= index || child >= len {
                            return Err(Error::Artifact(format!(
                                "node {} has invalid child index {}",
                                index, child
                            )));
                        }
                    }
                    Ok(Node::Split { feature, threshold, left, right })
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { nodes, n_features })
    }

    /// Input width the split indices were validated against
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf(value) => return value,
                Node::Split { feature, threshold, left, right } => {
                    index = if features[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Averaging ensemble of regression trees (random-forest style).
#[derive(Debug, Clone)]
pub struct TreeEnsembleRegressor {
    trees: Vec<Tree>,
    n_features: usize,
    base_score: f64,
    feature_names: Option<Vec<String>>,
}

impl TreeEnsembleRegressor {
    pub fn new(
        trees: Vec<Tree>,
        n_features: usize,
        base_score: f64,
        feature_names: Option<Vec<String>>,
    ) -> Result<Self> {
        if trees.is_empty() {
            return Err(Error::Artifact("tree ensemble has no trees".to_string()));
        }
        if n_features == 0 {
            return Err(Error::Artifact("tree ensemble takes no features".to_string()));
        }
        if !base_score.is_finite() {
            return Err(Error::Artifact("base_score is not finite".to_string()));
        }
        if let Some(i) = trees.iter().position(|tree| tree.n_features != n_features) {
            return Err(Error::Artifact(format!(
                "tree {} was built for {} features but the ensemble takes {}",
                i, trees[i].n_features, n_features
            )));
        }
        validate_feature_names(&feature_names, n_features)?;

        Ok(Self {
            trees,
            n_features,
            base_score,
            feature_names,
        })
    }
}

impl Regressor for TreeEnsembleRegressor {
    fn name(&self) -> &str {
        "tree_ensemble"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        check_input(self, features)?;
        let sum: f64 = self.trees.iter().map(|tree| tree.evaluate(features)).sum();
        check_output(self.base_score + sum / self.trees.len() as f64)
    }
}
