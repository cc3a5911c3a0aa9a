//! Local surrogate explanations for a single simulated applicant.
//!
//! [`LimeExplainer`] perturbs the row around the training distribution, scores every perturbation
//! with the approval model and fits a kernel-weighted ridge regression in standardized space. The
//! ridge coefficients are reported as per-feature attribution weights.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::artifacts::TrainingSample;
use super::model::{ApprovalModel, PredictionError};
use super::profile::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

const PIVOT_EPSILON: f64 = 1e-12;

/// Produces per-feature attribution weights for one feature vector.
pub trait FeatureExplainer: Send + Sync {
    fn explain(
        &self,
        model: &dyn ApprovalModel,
        row: &FeatureVector,
    ) -> Result<Explanation, ExplainError>;
}

/// Sampling and surrogate fitting knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimeConfig {
    pub num_samples: usize,
    /// Defaults to `0.75 * sqrt(feature count)` when unset.
    pub kernel_width: Option<f64>,
    pub ridge_alpha: f64,
    pub seed: u64,
}

impl Default for LimeConfig {
    fn default() -> Self {
        Self {
            num_samples: 5000,
            kernel_width: None,
            ridge_alpha: 1.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttribution {
    pub feature: String,
    pub weight: f64,
}

/// Surrogate fit for one row; attributions are sorted by absolute weight, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub attributions: Vec<FeatureAttribution>,
    pub intercept: f64,
    pub local_prediction: f64,
    pub model_prediction: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplainError {
    #[error("explainer needs at least one perturbation sample")]
    NoSamples,
    #[error("model failed while scoring perturbations: {0}")]
    Prediction(#[from] PredictionError),
    #[error("surrogate regression is singular")]
    Singular,
}

/// Tabular LIME over continuous features.
#[derive(Debug, Clone)]
pub struct LimeExplainer {
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
    config: LimeConfig,
}

impl LimeExplainer {
    pub fn new(training: &TrainingSample, config: LimeConfig) -> Self {
        let scales = training
            .column_std_devs()
            .map(|std| if std > 0.0 { std } else { 1.0 });

        Self {
            means: training.column_means(),
            scales,
            config,
        }
    }

    pub fn config(&self) -> &LimeConfig {
        &self.config
    }

    fn kernel_width(&self) -> f64 {
        self.config
            .kernel_width
            .unwrap_or_else(|| 0.75 * (FEATURE_COUNT as f64).sqrt())
    }

    fn standardize(&self, row: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut standardized = [0.0; FEATURE_COUNT];
        for (index, value) in row.iter().enumerate() {
            standardized[index] = (value - self.means[index]) / self.scales[index];
        }
        standardized
    }

    fn restore(&self, standardized: &[f64; FEATURE_COUNT]) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        for (index, value) in standardized.iter().enumerate() {
            values[index] = value * self.scales[index] + self.means[index];
        }
        FeatureVector(values)
    }
}

impl FeatureExplainer for LimeExplainer {
    fn explain(
        &self,
        model: &dyn ApprovalModel,
        row: &FeatureVector,
    ) -> Result<Explanation, ExplainError> {
        if self.config.num_samples == 0 {
            return Err(ExplainError::NoSamples);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let width = self.kernel_width();
        let origin = self.standardize(row);

        let mut samples = Vec::with_capacity(self.config.num_samples);
        let mut targets = Vec::with_capacity(self.config.num_samples);
        let mut weights = Vec::with_capacity(self.config.num_samples);

        for index in 0..self.config.num_samples {
            let point = if index == 0 {
                origin
            } else {
                let mut point = [0.0; FEATURE_COUNT];
                for slot in point.iter_mut() {
                    *slot = standard_normal(&mut rng);
                }
                point
            };

            let prediction = if index == 0 {
                model.predict_proba(row)?
            } else {
                model.predict_proba(&self.restore(&point))?
            };

            let distance_sq: f64 = point
                .iter()
                .zip(origin.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();

            samples.push(point);
            targets.push(prediction);
            weights.push((-distance_sq / (width * width)).exp().sqrt());
        }

        let (coefficients, intercept) =
            weighted_ridge(&samples, &targets, &weights, self.config.ridge_alpha)?;

        let local_prediction = intercept
            + coefficients
                .iter()
                .zip(origin.iter())
                .map(|(beta, x)| beta * x)
                .sum::<f64>();

        let mut attributions: Vec<FeatureAttribution> = FEATURE_NAMES
            .iter()
            .zip(coefficients.iter())
            .map(|(feature, weight)| FeatureAttribution {
                feature: feature.to_string(),
                weight: *weight,
            })
            .collect();
        attributions.sort_by(|a, b| {
            b.weight
                .abs()
                .partial_cmp(&a.weight.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(Explanation {
            attributions,
            intercept,
            local_prediction,
            model_prediction: targets[0],
        })
    }
}

fn standard_normal(rng: &mut StdRng) -> f64 {
    // Box-Muller; u1 is kept in (0, 1] so the log stays finite.
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Ridge regression with an unpenalized intercept and per-sample weights.
fn weighted_ridge(
    samples: &[[f64; FEATURE_COUNT]],
    targets: &[f64],
    weights: &[f64],
    alpha: f64,
) -> Result<([f64; FEATURE_COUNT], f64), ExplainError> {
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return Err(ExplainError::Singular);
    }

    let mut x_mean = [0.0; FEATURE_COUNT];
    let mut y_mean = 0.0;
    for ((sample, target), weight) in samples.iter().zip(targets).zip(weights) {
        for (mean, value) in x_mean.iter_mut().zip(sample.iter()) {
            *mean += weight * value;
        }
        y_mean += weight * target;
    }
    for mean in x_mean.iter_mut() {
        *mean /= weight_sum;
    }
    y_mean /= weight_sum;

    let mut gram = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
    let mut moment = [0.0; FEATURE_COUNT];
    for ((sample, target), weight) in samples.iter().zip(targets).zip(weights) {
        let centered_y = target - y_mean;
        for i in 0..FEATURE_COUNT {
            let xi = sample[i] - x_mean[i];
            moment[i] += weight * xi * centered_y;
            for j in 0..FEATURE_COUNT {
                gram[i][j] += weight * xi * (sample[j] - x_mean[j]);
            }
        }
    }
    for (i, row) in gram.iter_mut().enumerate() {
        row[i] += alpha;
    }

    let coefficients = solve(gram, moment)?;
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(x_mean.iter())
            .map(|(beta, mean)| beta * mean)
            .sum::<f64>();

    Ok((coefficients, intercept))
}

/// Gaussian elimination with partial pivoting.
fn solve(
    mut matrix: [[f64; FEATURE_COUNT]; FEATURE_COUNT],
    mut rhs: [f64; FEATURE_COUNT],
) -> Result<[f64; FEATURE_COUNT], ExplainError> {
    for col in 0..FEATURE_COUNT {
        let pivot = (col..FEATURE_COUNT)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if !matrix[pivot][col].is_finite() || matrix[pivot][col].abs() < PIVOT_EPSILON {
            return Err(ExplainError::Singular);
        }

        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in (col + 1)..FEATURE_COUNT {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..FEATURE_COUNT {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = [0.0; FEATURE_COUNT];
    for row in (0..FEATURE_COUNT).rev() {
        let tail: f64 = ((row + 1)..FEATURE_COUNT)
            .map(|k| matrix[row][k] * solution[k])
            .sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }

    Ok(solution)
}
