use serde::{Deserialize, Serialize};

use super::profile::{FeatureVector, FEATURE_COUNT};

/// Scores a scaled feature vector, returning the probability of approval.
pub trait ApprovalModel: Send + Sync {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, PredictionError>;
}

/// Logistic regression exported from the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticApprovalModel {
    pub model_name: String,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticApprovalModel {
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, serde_json::Error> {
        let raw = std::fs::read_to_string(path).map_err(serde_json::Error::io)?;
        serde_json::from_str(&raw)
    }

    fn decision_function(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(PredictionError::DimensionMismatch {
                expected: FEATURE_COUNT,
                found: self.weights.len(),
            });
        }

        let score = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(weight, value)| weight * value)
            .sum::<f64>()
            + self.intercept;

        if score.is_finite() {
            Ok(score)
        } else {
            Err(PredictionError::NonFinite)
        }
    }
}

impl ApprovalModel for LogisticApprovalModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        let score = self.decision_function(features)?;
        Ok(1.0 / (1.0 + (-score).exp()))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("model expects {expected} weights but has {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("model produced a non-finite score")]
    NonFinite,
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(weights: Vec<f64>, intercept: f64) -> LogisticApprovalModel {
        LogisticApprovalModel {
            model_name: "test".to_string(),
            weights,
            intercept,
        }
    }

    #[test]
    fn zero_score_is_even_odds() {
        let model = model(vec![0.0; FEATURE_COUNT], 0.0);

        let probability = model
            .predict_proba(&FeatureVector([1.0; FEATURE_COUNT]))
            .expect("predicts");

        assert_eq!(probability, 0.5);
    }

    #[test]
    fn positive_weights_raise_probability() {
        let model = model(vec![1.0, 0.5, 0.0, 0.0, 0.0, 0.0], -0.25);

        let low = model
            .predict_proba(&FeatureVector([-1.0, -1.0, 0.0, 0.0, 0.0, 0.0]))
            .expect("predicts");
        let high = model
            .predict_proba(&FeatureVector([1.0, 1.0, 0.0, 0.0, 0.0, 0.0]))
            .expect("predicts");

        assert!(low < 0.5);
        assert!(high > 0.5);
        assert!((0.0..=1.0).contains(&low) && (0.0..=1.0).contains(&high));
    }

    #[test]
    fn mismatched_weights_are_reported() {
        let model = model(vec![1.0; 4], 0.0);

        assert_eq!(
            model.predict_proba(&FeatureVector([0.0; FEATURE_COUNT])),
            Err(PredictionError::DimensionMismatch {
                expected: 6,
                found: 4,
            })
        );
    }

    #[test]
    fn load_model_from_json_file() {
        let tmp = tempfile::tempdir().expect("tmpdir");
        let path = tmp.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"model_name":"m","weights":[0.1,0.2,0.0,0.0,0.0,0.0],"intercept":-0.5}"#,
        )
        .expect("write");

        let model = LogisticApprovalModel::load(&path).expect("load");

        assert_eq!(model.model_name, "m");
        assert_eq!(model.intercept, -0.5);
    }
}
