use super::artifact::TreeSpec;
use super::{Classifier, ModelError, check_input};
use crate::data::model::FeatureMatrix;

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        proba: [f64; 2],
    },
}

/// A single binary decision tree with normalized leaf probabilities.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Validate a tree in parallel-array layout.
    ///
    /// Children must come after their parent (pre-order numbering), which
    /// also rules out cycles.
    pub fn from_spec(spec: TreeSpec, n_features: usize) -> Result<Self, String> {
        let n = spec.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            spec.children_right.len(),
            spec.feature.len(),
            spec.threshold.len(),
            spec.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("node arrays have different lengths".to_string());
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (spec.children_left[i], spec.children_right[i]);
            if left == -1 && right == -1 {
                let [c0, c1] = spec.value[i];
                let total = c0 + c1;
                if !(c0 >= 0.0 && c1 >= 0.0 && total > 0.0 && total.is_finite()) {
                    return Err(format!("leaf {i} has invalid class counts {:?}", spec.value[i]));
                }
                nodes.push(Node::Leaf {
                    proba: [c0 / total, c1 / total],
                });
                continue;
            }

            let child = |c: i64| -> Result<usize, String> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| format!("node {i} has invalid child {c}"))
            };
            let feature = usize::try_from(spec.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| format!("node {i} splits on invalid feature {}", spec.feature[i]))?;
            if !spec.threshold[i].is_finite() {
                return Err(format!("node {i} has a non-finite threshold"));
            }

            nodes.push(Node::Split {
                feature,
                threshold: spec.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    fn proba(&self, sample: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if sample[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Forest of decision trees; class probabilities are averaged over trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    name: String,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(
        name: impl Into<String>,
        n_features: usize,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        Ok(Self {
            name: name.into(),
            n_features,
            trees,
        })
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        check_input(features, self.n_features)?;
        let n_trees = self.trees.len() as f64;
        Ok(features
            .rows()
            .map(|sample| {
                let [s0, s1] = self.trees.iter().fold([0.0, 0.0], |[a, b], tree| {
                    let [p0, p1] = tree.proba(sample);
                    [a + p0, b + p1]
                });
                [s0 / n_trees, s1 / n_trees]
            })
            .collect())
    }
}
