//! End-to-end simulation scenarios through the public service facade and HTTP router.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use tower::ServiceExt;

use credit_coach::simulator::{
    simulator_router, ApplicantInput, ArtifactBundle, CreditHealthTier, LimeConfig,
    LogisticApprovalModel, SimulatorService,
};

fn service() -> SimulatorService<LogisticApprovalModel> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts");
    let bundle = ArtifactBundle::load(dir).expect("artifacts load");
    SimulatorService::from_artifacts(
        bundle,
        LimeConfig {
            num_samples: 500,
            ..LimeConfig::default()
        },
    )
}

fn input() -> ApplicantInput {
    ApplicantInput {
        employed_years: 5,
        annual_income: 500_000.0,
        age: 30,
        income_type: "Working".to_string(),
        education: "Higher education".to_string(),
        marital_status: "Single / not married".to_string(),
    }
}

#[test]
fn simulation_produces_consistent_tier() {
    let outcome = service().simulate(&input()).expect("simulation runs");

    let pct = outcome.probability * 100.0;
    assert_eq!(outcome.tier, CreditHealthTier::from_percentage(pct));
    assert!((outcome.gauge.delta_pct - (pct - 50.0)).abs() < 1e-9);
}

#[test]
fn education_code_follows_fitted_encoding() {
    // "Higher education" sorts second in the fitted encoder, so it lands on code 1.
    let outcome = service().simulate(&input()).expect("simulation runs");

    assert_eq!(outcome.profile.education, 1);
    assert_eq!(outcome.suggestions.len(), 1);
    assert!(outcome.suggestions[0].contains("education"));
}

#[test]
fn all_rules_fire_for_weakest_form_values() {
    let input = ApplicantInput {
        employed_years: 0,
        annual_income: 50_000.0,
        age: 19,
        income_type: "Pensioner".to_string(),
        education: "Academic degree".to_string(),
        marital_status: "Married".to_string(),
    };

    let outcome = service().simulate(&input).expect("simulation runs");

    assert_eq!(outcome.suggestions.len(), 5);
}

#[test]
fn explanations_are_reproducible() {
    let service = service();

    let first = service.explain(&input()).expect("explains");
    let second = service.explain(&input()).expect("explains");

    assert_eq!(first, second);
    assert_eq!(first.attributions.len(), 6);
}

#[tokio::test]
async fn coaching_route_accepts_raw_profiles() {
    let router = simulator_router(Arc::new(service()));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/simulator/coaching")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    r#"{"employed_years":10,"annual_income":400000,"age":40,"income_type":3,"education":3,"marital_status":0}"#,
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["suggestions"].as_array().map(Vec::len), Some(1));
    assert!(payload["suggestions"][0]
        .as_str()
        .unwrap_or_default()
        .contains("already strong"));
}
