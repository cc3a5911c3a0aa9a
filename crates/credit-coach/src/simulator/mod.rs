//! What-if credit approval simulation.
//!
//! The simulator turns form input into an encoded [`ApplicantProfile`], scores it with an
//! [`ApprovalModel`], buckets the probability into a [`CreditHealthTier`] and attaches coaching
//! tips from the rule table in [`coaching`]. Local feature attributions are produced on demand by
//! a [`FeatureExplainer`].

pub mod artifacts;
pub mod coaching;
pub mod explain;
pub mod model;
pub mod profile;
pub mod router;
pub mod service;
pub mod tier;

#[cfg(test)]
mod tests;

pub use artifacts::{
    ArtifactBundle, ArtifactError, CategoricalEncoder, CategoricalEncoders, EncodingError,
    ScalingError, StandardScaler, TrainingDataError, TrainingSample,
};
pub use coaching::{CoachingEngine, CoachingRule, CoachingTopic};
pub use explain::{
    ExplainError, Explanation, FeatureAttribution, FeatureExplainer, LimeConfig, LimeExplainer,
};
pub use model::{ApprovalModel, LogisticApprovalModel, PredictionError};
pub use profile::{
    ApplicantInput, ApplicantProfile, FeatureVector, InputError, FEATURE_COUNT, FEATURE_NAMES,
};
pub use router::simulator_router;
pub use service::{CategoryOptions, SimulationError, SimulationOutcome, SimulatorService};
pub use tier::{ApprovalGauge, CreditHealthTier};
