use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::artifacts::{
    ArtifactBundle, CategoricalEncoders, EncodingError, ScalingError, StandardScaler,
};
use super::coaching::{CoachingEngine, CoachingTopic};
use super::explain::{ExplainError, Explanation, FeatureExplainer, LimeConfig, LimeExplainer};
use super::model::{ApprovalModel, LogisticApprovalModel, PredictionError};
use super::profile::{ApplicantInput, ApplicantProfile, FeatureVector, InputError};
use super::tier::{ApprovalGauge, CreditHealthTier};

/// Label lists offered by the simulator form selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOptions {
    pub income_type: Vec<String>,
    pub education: Vec<String>,
    pub marital_status: Vec<String>,
}

/// Result of one what-if simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub profile: ApplicantProfile,
    pub probability: f64,
    pub gauge: ApprovalGauge,
    pub tier: CreditHealthTier,
    pub guidance: &'static str,
    pub coaching_topics: Vec<CoachingTopic>,
    pub suggestions: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Service composing the preprocessing artifacts, approval model, explainer and coaching rules.
pub struct SimulatorService<M> {
    encoders: CategoricalEncoders,
    scaler: StandardScaler,
    model: Arc<M>,
    explainer: Arc<dyn FeatureExplainer>,
    coach: CoachingEngine,
}

impl SimulatorService<LogisticApprovalModel> {
    /// Wires the service from loaded artifacts with a LIME explainer over the training sample.
    pub fn from_artifacts(bundle: ArtifactBundle, lime: LimeConfig) -> Self {
        let explainer = LimeExplainer::new(&bundle.training, lime);
        Self::new(
            bundle.encoders,
            bundle.scaler,
            Arc::new(bundle.model),
            Arc::new(explainer),
        )
    }
}

impl<M> SimulatorService<M>
where
    M: ApprovalModel + 'static,
{
    pub fn new(
        encoders: CategoricalEncoders,
        scaler: StandardScaler,
        model: Arc<M>,
        explainer: Arc<dyn FeatureExplainer>,
    ) -> Self {
        Self {
            encoders,
            scaler,
            model,
            explainer,
            coach: CoachingEngine::standard(),
        }
    }

    pub fn with_coaching(mut self, coach: CoachingEngine) -> Self {
        self.coach = coach;
        self
    }

    pub fn categories(&self) -> CategoryOptions {
        CategoryOptions {
            income_type: self.encoders.income_type.classes().to_vec(),
            education: self.encoders.education.classes().to_vec(),
            marital_status: self.encoders.marital_status.classes().to_vec(),
        }
    }

    /// Validates the form input and encodes its categorical labels.
    pub fn profile_from_input(
        &self,
        input: &ApplicantInput,
    ) -> Result<ApplicantProfile, SimulationError> {
        input.validate()?;

        Ok(ApplicantProfile {
            employed_years: input.employed_years,
            annual_income: input.annual_income,
            age: input.age,
            income_type: self.encoders.income_type.encode(&input.income_type)?,
            education: self.encoders.education.encode(&input.education)?,
            marital_status: self.encoders.marital_status.encode(&input.marital_status)?,
        })
    }

    pub fn scaled_features(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<FeatureVector, SimulationError> {
        Ok(self.scaler.transform(&profile.feature_vector())?)
    }

    pub fn coach(&self, profile: &ApplicantProfile) -> Vec<String> {
        self.coach.generate(profile)
    }

    pub fn simulate(&self, input: &ApplicantInput) -> Result<SimulationOutcome, SimulationError> {
        let profile = self.profile_from_input(input)?;
        let features = self.scaled_features(&profile)?;

        let probability = self.model.predict_proba(&features).map_err(|err| {
            warn!(error = %err, "approval model failed");
            SimulationError::Prediction(err)
        })?;

        let gauge = ApprovalGauge::from_probability(probability);
        let tier = gauge.tier;
        let coaching_topics = self.coach.topics(&profile);
        let suggestions = self.coach.generate(&profile);

        debug!(
            probability,
            tier = tier.label(),
            tips = suggestions.len(),
            "simulation evaluated"
        );

        Ok(SimulationOutcome {
            profile,
            probability,
            gauge,
            tier,
            guidance: tier.guidance(),
            coaching_topics,
            suggestions,
            evaluated_at: Utc::now(),
        })
    }

    pub fn explain(&self, input: &ApplicantInput) -> Result<Explanation, SimulationError> {
        let profile = self.profile_from_input(input)?;
        let features = self.scaled_features(&profile)?;

        let explanation = self
            .explainer
            .explain(&*self.model, &features)
            .map_err(|err| {
                warn!(error = %err, "feature explanation failed");
                SimulationError::Explanation(err)
            })?;

        debug!(
            top_feature = explanation
                .attributions
                .first()
                .map(|attribution| attribution.feature.as_str())
                .unwrap_or("none"),
            "explanation computed"
        );

        Ok(explanation)
    }
}

/// Error raised by the simulator service.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Scaling(#[from] ScalingError),
    #[error(transparent)]
    Prediction(PredictionError),
    #[error(transparent)]
    Explanation(ExplainError),
}

impl SimulationError {
    /// Whether the caller supplied the bad data, as opposed to a collaborator failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SimulationError::Input(_) | SimulationError::Encoding(_)
        )
    }
}
