use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Classifier, DecisionTree, LogisticRegression, RandomForest};

/// Artifact layout version understood by this build.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// On-disk model artifact (JSON).
///
/// ```json
/// {
///   "format_version": 1,
///   "name": "modelo_p_t_rod_3_smt",
///   "n_features": 36,
///   "model": { "type": "logistic_regression", "coefficients": [..], "intercept": -0.4 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default = "default_name")]
    pub name: String,
    pub n_features: usize,
    pub model: ModelSpec,
}

fn default_name() -> String {
    "unnamed".to_string()
}

/// Model parameters, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        trees: Vec<TreeSpec>,
    },
}

/// One decision tree in scikit-learn's parallel-array layout.
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise samples with
/// `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the class counts
/// (or fractions) reaching the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<[f64; 2]>,
}

impl ModelArtifact {
    /// Check the artifact and turn it into a classifier.
    ///
    /// The error string explains which part of the artifact is malformed.
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, String> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(format!(
                "unsupported format_version {} (this build reads {ARTIFACT_FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.n_features == 0 {
            return Err("n_features must be positive".to_string());
        }

        match self.model {
            ModelSpec::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let model =
                    LogisticRegression::new(self.name, self.n_features, coefficients, intercept)?;
                Ok(Arc::new(model))
            }
            ModelSpec::RandomForest { trees } => {
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(i, spec)| {
                        DecisionTree::from_spec(spec, self.n_features)
                            .map_err(|e| format!("tree {i}: {e}"))
                    })
                    .collect::<Result<Vec<_>, String>>()?;
                let model = RandomForest::new(self.name, self.n_features, trees)?;
                Ok(Arc::new(model))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic_json(version: u32, n_coefficients: usize) -> String {
        let coefficients = vec![0.1; n_coefficients];
        serde_json::json!({
            "format_version": version,
            "name": "wheels",
            "n_features": 36,
            "model": {
                "type": "logistic_regression",
                "coefficients": coefficients,
                "intercept": -1.0
            }
        })
        .to_string()
    }

    #[test]
    fn test_logistic_artifact_parses() {
        let artifact: ModelArtifact = serde_json::from_str(&logistic_json(1, 36)).unwrap();
        let model = artifact.into_classifier().unwrap();
        assert_eq!(model.name(), "wheels");
        assert_eq!(model.n_features(), 36);
    }

    #[test]
    fn test_version_mismatch() {
        let artifact: ModelArtifact = serde_json::from_str(&logistic_json(2, 36)).unwrap();
        let err = artifact.into_classifier().err().unwrap();
        assert!(err.contains("unsupported format_version 2"), "{err}");
    }

    #[test]
    fn test_coefficient_count_mismatch() {
        let artifact: ModelArtifact = serde_json::from_str(&logistic_json(1, 35)).unwrap();
        assert!(artifact.into_classifier().is_err());
    }

    #[test]
    fn test_forest_artifact_parses() {
        let json = serde_json::json!({
            "format_version": 1,
            "n_features": 36,
            "model": {
                "type": "random_forest",
                "trees": [{
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [0, -2, -2],
                    "threshold": [50.0, -2.0, -2.0],
                    "value": [[5.0, 5.0], [4.0, 1.0], [1.0, 4.0]]
                }]
            }
        });
        let artifact: ModelArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(artifact.name, "unnamed");
        let model = artifact.into_classifier().unwrap();
        assert_eq!(model.n_features(), 36);
    }

    #[test]
    fn test_unknown_model_type_fails_to_parse() {
        let json = r#"{"format_version":1,"n_features":36,"model":{"type":"svm"}}"#;
        assert!(serde_json::from_str::<ModelArtifact>(json).is_err());
    }
}
