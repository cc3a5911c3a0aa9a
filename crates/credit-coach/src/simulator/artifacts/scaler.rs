use serde::{Deserialize, Serialize};

use super::super::profile::{FeatureVector, FEATURE_COUNT};

/// Per-feature standardization fitted on the training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), ScalingError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(ScalingError::DimensionMismatch {
                expected: FEATURE_COUNT,
                mean: self.mean.len(),
                scale: self.scale.len(),
            });
        }
        Ok(())
    }

    /// `(x - mean) / scale`; a zero scale leaves the centered value unscaled.
    pub fn transform(&self, row: &FeatureVector) -> Result<FeatureVector, ScalingError> {
        self.validate()?;

        let mut scaled = [0.0; FEATURE_COUNT];
        for (index, value) in row.iter().enumerate() {
            let scale = match self.scale[index] {
                s if s == 0.0 => 1.0,
                s => s,
            };
            scaled[index] = (value - self.mean[index]) / scale;
        }

        let scaled = FeatureVector(scaled);
        if !scaled.is_finite() {
            return Err(ScalingError::NonFinite);
        }
        Ok(scaled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScalingError {
    #[error("scaler expects {expected} features (mean has {mean}, scale has {scale})")]
    DimensionMismatch {
        expected: usize,
        mean: usize,
        scale: usize,
    },
    #[error("scaled features contain non-finite values")]
    NonFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_centers_and_scales() {
        let scaler = StandardScaler {
            mean: vec![5.0, 200_000.0, 40.0, 2.0, 2.0, 1.0],
            scale: vec![5.0, 100_000.0, 10.0, 1.0, 0.0, 0.5],
        };

        let scaled = scaler
            .transform(&FeatureVector([10.0, 400_000.0, 30.0, 2.0, 3.0, 0.0]))
            .expect("scales");

        assert_eq!(scaled.values(), &[1.0, 2.0, -1.0, 0.0, 1.0, -2.0]);
    }

    #[test]
    fn transform_rejects_wrong_dimensions() {
        let scaler = StandardScaler {
            mean: vec![0.0; 5],
            scale: vec![1.0; 6],
        };

        assert_eq!(
            scaler.transform(&FeatureVector([0.0; FEATURE_COUNT])),
            Err(ScalingError::DimensionMismatch {
                expected: 6,
                mean: 5,
                scale: 6,
            })
        );
    }
}
