use super::{Classifier, ModelError, check_input};
use crate::data::model::FeatureMatrix;

/// Binary logistic regression: `P(class1) = sigmoid(w · x + b)`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    name: String,
    n_features: usize,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(
        name: impl Into<String>,
        n_features: usize,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, String> {
        if coefficients.len() != n_features {
            return Err(format!(
                "{} coefficients for {n_features} features",
                coefficients.len()
            ));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients and intercept must be finite".to_string());
        }
        Ok(Self {
            name: name.into(),
            n_features,
            coefficients,
            intercept,
        })
    }

    fn decision(&self, sample: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(sample)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        check_input(features, self.n_features)?;
        Ok(features
            .rows()
            .map(|sample| {
                let p1 = sigmoid(self.decision(sample));
                [1.0 - p1, p1]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticRegression {
        LogisticRegression::new("lr", 2, vec![1.0, -1.0], 0.0).unwrap()
    }

    #[test]
    fn test_zero_margin_is_half() {
        let x = FeatureMatrix::from_row_major(vec![3.0, 3.0], 1, 2).unwrap();
        let proba = model().predict_proba(&x).unwrap();
        assert_eq!(proba, vec![[0.5, 0.5]]);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let x = FeatureMatrix::from_row_major(vec![2.0, 0.0, 0.0, 2.0, 800.0, 0.0], 3, 2).unwrap();
        let proba = model().predict_proba(&x).unwrap();

        assert!(proba[0][1] > 0.85);
        assert!(proba[1][1] < 0.15);
        assert_eq!(proba[2][1], 1.0);
        for [p0, p1] in proba {
            assert!((p0 + p1 - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_large_negative_margin_does_not_overflow() {
        let x = FeatureMatrix::from_row_major(vec![0.0, 1000.0], 1, 2).unwrap();
        let proba = model().predict_proba(&x).unwrap();
        assert_eq!(proba[0][1], 0.0);
        assert!(proba[0][0].is_finite());
    }

    #[test]
    fn test_wrong_width() {
        let x = FeatureMatrix::from_row_major(vec![0.0; 3], 1, 3).unwrap();
        assert!(matches!(
            model().predict_proba(&x),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(LogisticRegression::new("lr", 3, vec![1.0, 2.0], 0.0).is_err());
        assert!(LogisticRegression::new("lr", 1, vec![f64::NAN], 0.0).is_err());
    }
}
