//! Persisted classifier artifact and the predictor seam the pipeline calls.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::features::{FeatureSchema, FeatureVector, SchemaError};

/// Opaque binary classifier returning the probability of the high-risk class.
pub trait Predictor: Send + Sync {
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, PredictionError>;

    /// Short identifier used in logs.
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("feature vector has {found} columns but the model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("model produced a non-finite score")]
    NonFinite,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model file not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model file format: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid feature schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("invalid model parameters: {0}")]
    Parameters(String),
}

#[derive(Debug, Deserialize)]
struct ArtifactDocument {
    feature_names: Vec<String>,
    model: ModelSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelSpec {
    LogisticRegression {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    GradientBoostedTrees {
        #[serde(default)]
        base_margin: f64,
        trees: Vec<RegressionTree>,
    },
}

/// Classifier and schema pair loaded once at startup.
pub struct ModelArtifact {
    pub schema: FeatureSchema,
    pub predictor: Box<dyn Predictor>,
}

impl std::fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("features", &self.schema.len())
            .field("kind", &self.predictor.kind())
            .finish()
    }
}

impl ModelArtifact {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let document: ArtifactDocument = serde_json::from_str(raw)?;
        let schema = FeatureSchema::new(document.feature_names)?;

        let predictor: Box<dyn Predictor> = match document.model {
            ModelSpec::LogisticRegression {
                intercept,
                coefficients,
            } => Box::new(LogisticModel::new(intercept, coefficients, schema.len())?),
            ModelSpec::GradientBoostedTrees { base_margin, trees } => {
                Box::new(TreeEnsemble::new(base_margin, trees, schema.len())?)
            }
        };

        Ok(Self { schema, predictor })
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

fn ensure_finite(values: impl IntoIterator<Item = f64>, what: &str) -> Result<(), ModelError> {
    if values.into_iter().all(f64::is_finite) {
        Ok(())
    } else {
        Err(ModelError::Parameters(format!("{what} must be finite")))
    }
}

fn ensure_width(features: &FeatureVector, expected: usize) -> Result<(), PredictionError> {
    let found = features.values().len();
    if found == expected {
        Ok(())
    } else {
        Err(PredictionError::DimensionMismatch { expected, found })
    }
}

/// Linear model over the schema columns followed by a logistic link.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LogisticModel {
    pub fn new(
        intercept: f64,
        coefficients: Vec<f64>,
        feature_count: usize,
    ) -> Result<Self, ModelError> {
        if coefficients.len() != feature_count {
            return Err(ModelError::Parameters(format!(
                "expected {feature_count} coefficients, found {}",
                coefficients.len()
            )));
        }
        ensure_finite(std::iter::once(intercept), "intercept")?;
        ensure_finite(coefficients.iter().copied(), "coefficients")?;

        Ok(Self {
            intercept,
            coefficients,
        })
    }
}

impl Predictor for LogisticModel {
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        ensure_width(features, self.coefficients.len())?;

        let margin = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.values())
                .map(|(weight, value)| weight * value)
                .sum::<f64>();

        let probability = sigmoid(margin);
        if probability.is_finite() {
            Ok(probability)
        } else {
            Err(PredictionError::NonFinite)
        }
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}

/// Node of a binary regression tree. Splits send `x < threshold` left.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Children must point strictly forward, which rules out cycles.
    fn check(&self, index: usize, feature_count: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Parameters(format!("tree {index} has no nodes")));
        }

        for (position, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= feature_count {
                        return Err(ModelError::Parameters(format!(
                            "tree {index} node {position} splits on feature {feature} of {feature_count}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Parameters(format!(
                            "tree {index} node {position} has a non-finite threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= position || child >= self.nodes.len() {
                            return Err(ModelError::Parameters(format!(
                                "tree {index} node {position} points to invalid child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(ModelError::Parameters(format!(
                            "tree {index} node {position} has a non-finite leaf"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn score(&self, values: &[f64]) -> f64 {
        let mut cursor = 0;
        loop {
            match self.nodes[cursor] {
                TreeNode::Leaf { leaf } => return leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    cursor = if values[feature] < threshold { left } else { right };
                }
            }
        }
    }
}

/// Additive ensemble of regression trees with a logistic link.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    base_margin: f64,
    trees: Vec<RegressionTree>,
    feature_count: usize,
}

impl TreeEnsemble {
    pub fn new(
        base_margin: f64,
        trees: Vec<RegressionTree>,
        feature_count: usize,
    ) -> Result<Self, ModelError> {
        ensure_finite(std::iter::once(base_margin), "base_margin")?;
        if trees.is_empty() {
            return Err(ModelError::Parameters(
                "ensemble must contain at least one tree".to_string(),
            ));
        }
        for (index, tree) in trees.iter().enumerate() {
            tree.check(index, feature_count)?;
        }

        Ok(Self {
            base_margin,
            trees,
            feature_count,
        })
    }
}

impl Predictor for TreeEnsemble {
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        ensure_width(features, self.feature_count)?;

        let values = features.values();
        let margin = self.base_margin + self.trees.iter().map(|tree| tree.score(values)).sum::<f64>();

        let probability = sigmoid(margin);
        if probability.is_finite() {
            Ok(probability)
        } else {
            Err(PredictionError::NonFinite)
        }
    }

    fn kind(&self) -> &'static str {
        "gradient_boosted_trees"
    }
}
