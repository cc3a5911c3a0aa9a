use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::simulator::{
    ApplicantInput, ApplicantProfile, ApprovalModel, CategoricalEncoders, FeatureVector,
    LimeConfig, LimeExplainer, LogisticApprovalModel, PredictionError, SimulatorService,
    StandardScaler, TrainingSample,
};

pub(super) fn encoders() -> CategoricalEncoders {
    CategoricalEncoders::from_classes(
        vec![
            "Working".to_string(),
            "Commercial associate".to_string(),
            "Pensioner".to_string(),
            "State servant".to_string(),
        ],
        vec![
            "Secondary / secondary special".to_string(),
            "Higher education".to_string(),
            "Incomplete higher".to_string(),
            "Lower secondary".to_string(),
            "Academic degree".to_string(),
        ],
        vec![
            "Married".to_string(),
            "Single / not married".to_string(),
            "Civil marriage".to_string(),
            "Separated".to_string(),
            "Widow".to_string(),
        ],
    )
}

pub(super) fn scaler() -> StandardScaler {
    StandardScaler {
        mean: vec![6.0, 190_000.0, 44.0, 2.0, 3.0, 1.5],
        scale: vec![6.5, 110_000.0, 11.5, 1.3, 1.4, 1.0],
    }
}

pub(super) fn model() -> LogisticApprovalModel {
    LogisticApprovalModel {
        model_name: "credit-approval-test".to_string(),
        weights: vec![0.8, 1.1, 0.2, 0.05, -0.3, -0.15],
        intercept: 0.1,
    }
}

pub(super) fn training() -> TrainingSample {
    TrainingSample::new(vec![
        FeatureVector([-0.9, -0.7, -1.2, 0.8, 0.7, 0.5]),
        FeatureVector([0.4, 1.3, 0.3, -1.5, -0.7, -0.5]),
        FeatureVector([1.8, 0.2, 1.1, 0.8, 0.7, -0.5]),
        FeatureVector([-0.6, -0.9, -0.4, 0.0, -1.4, 1.5]),
        FeatureVector([-0.2, 0.5, 0.9, -0.8, 1.4, -1.5]),
    ])
    .expect("non-empty sample")
}

pub(super) fn lime_config() -> LimeConfig {
    LimeConfig {
        num_samples: 400,
        ..LimeConfig::default()
    }
}

pub(super) fn build_service() -> SimulatorService<LogisticApprovalModel> {
    SimulatorService::new(
        encoders(),
        scaler(),
        Arc::new(model()),
        Arc::new(LimeExplainer::new(&training(), lime_config())),
    )
}

pub(super) fn failing_service() -> SimulatorService<FailingModel> {
    SimulatorService::new(
        encoders(),
        scaler(),
        Arc::new(FailingModel),
        Arc::new(LimeExplainer::new(&training(), lime_config())),
    )
}

pub(super) struct FailingModel;

impl ApprovalModel for FailingModel {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, PredictionError> {
        Err(PredictionError::Unavailable("model file corrupted".to_string()))
    }
}

/// Clears every coaching rule.
pub(super) fn strong_profile() -> ApplicantProfile {
    ApplicantProfile {
        employed_years: 8,
        annual_income: 650_000.0,
        age: 35,
        income_type: 3,
        education: 4,
        marital_status: 0,
    }
}

pub(super) fn applicant_input() -> ApplicantInput {
    ApplicantInput {
        employed_years: 5,
        annual_income: 500_000.0,
        age: 30,
        income_type: "Working".to_string(),
        education: "Secondary / secondary special".to_string(),
        marital_status: "Single / not married".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
