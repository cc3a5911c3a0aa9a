//! Fitted preprocessing artifacts and the cached training sample.

mod encoding;
mod scaler;
mod training;

pub use encoding::{CategoricalEncoder, CategoricalEncoders, EncodingError};
pub use scaler::{ScalingError, StandardScaler};
pub use training::{TrainingDataError, TrainingSample};

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use super::model::LogisticApprovalModel;
use super::profile::FEATURE_COUNT;

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "encoders.json";
pub const TRAINING_FILE: &str = "training.csv";

/// Everything the simulator needs from disk, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub model: LogisticApprovalModel,
    pub scaler: StandardScaler,
    pub encoders: CategoricalEncoders,
    pub training: TrainingSample,
}

impl ArtifactBundle {
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();

        let model: LogisticApprovalModel = read_json(dir.join(MODEL_FILE))?;
        if model.weights.len() != FEATURE_COUNT {
            return Err(ArtifactError::Invalid {
                path: dir.join(MODEL_FILE),
                reason: format!(
                    "expected {FEATURE_COUNT} weights, found {}",
                    model.weights.len()
                ),
            });
        }

        let scaler: StandardScaler = read_json(dir.join(SCALER_FILE))?;
        scaler.validate().map_err(|err| ArtifactError::Invalid {
            path: dir.join(SCALER_FILE),
            reason: err.to_string(),
        })?;

        let encoders: CategoricalEncoders = read_json(dir.join(ENCODERS_FILE))?;

        let training_path = dir.join(TRAINING_FILE);
        let training =
            TrainingSample::from_path(&training_path).map_err(|source| ArtifactError::Training {
                path: training_path.clone(),
                source,
            })?;

        debug!(
            model = %model.model_name,
            training_rows = training.len(),
            dir = %dir.display(),
            "simulator artifacts loaded"
        );

        Ok(Self {
            model,
            scaler,
            encoders,
            training,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Json { path, source })
}

/// Failure to load one of the artifact files.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid training sample {}: {source}", path.display())]
    Training {
        path: PathBuf,
        source: TrainingDataError,
    },
    #[error("invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}
