use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::model::ApprovalModel;
use super::profile::{ApplicantInput, ApplicantProfile};
use super::service::{SimulationError, SimulatorService};

const EXPLANATION_UNAVAILABLE: &str = "explanation unavailable";

/// Router builder exposing the simulator endpoints.
pub fn simulator_router<M>(service: Arc<SimulatorService<M>>) -> Router
where
    M: ApprovalModel + 'static,
{
    Router::new()
        .route("/api/v1/simulator/categories", get(categories_handler::<M>))
        .route(
            "/api/v1/simulator/simulations",
            post(simulate_handler::<M>),
        )
        .route(
            "/api/v1/simulator/explanations",
            post(explain_handler::<M>),
        )
        .route("/api/v1/simulator/coaching", post(coaching_handler::<M>))
        .with_state(service)
}

pub(crate) async fn categories_handler<M>(
    State(service): State<Arc<SimulatorService<M>>>,
) -> Response
where
    M: ApprovalModel + 'static,
{
    (StatusCode::OK, axum::Json(service.categories())).into_response()
}

pub(crate) async fn simulate_handler<M>(
    State(service): State<Arc<SimulatorService<M>>>,
    axum::Json(input): axum::Json<ApplicantInput>,
) -> Response
where
    M: ApprovalModel + 'static,
{
    match service.simulate(&input) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => failure_response(err, "prediction failed"),
    }
}

pub(crate) async fn explain_handler<M>(
    State(service): State<Arc<SimulatorService<M>>>,
    axum::Json(input): axum::Json<ApplicantInput>,
) -> Response
where
    M: ApprovalModel + 'static,
{
    // Every perturbation is a model call; keep them off the async workers.
    match tokio::task::spawn_blocking(move || service.explain(&input)).await {
        Ok(Ok(explanation)) => (StatusCode::OK, axum::Json(explanation)).into_response(),
        Ok(Err(err)) => failure_response(err, EXPLANATION_UNAVAILABLE),
        Err(err) => {
            error!(error = %err, "explanation task did not complete");
            let payload = json!({ "error": EXPLANATION_UNAVAILABLE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn coaching_handler<M>(
    State(service): State<Arc<SimulatorService<M>>>,
    axum::Json(profile): axum::Json<ApplicantProfile>,
) -> Response
where
    M: ApprovalModel + 'static,
{
    let payload = json!({ "suggestions": service.coach(&profile) });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn failure_response(err: SimulationError, generic: &'static str) -> Response {
    if err.is_client_error() {
        let payload = json!({ "error": err.to_string() });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    error!(error = %err, "{generic}");
    let payload = json!({ "error": generic });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
