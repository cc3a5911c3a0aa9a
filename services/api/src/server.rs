use crate::cli::ServeArgs;
use crate::infra::{load_service, AppState};
use crate::routes::with_simulator_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_coach::config::AppConfig;
use credit_coach::error::AppError;
use credit_coach::telemetry::{self, LogTarget};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dir) = args.artifacts.take() {
        config.simulator.artifact_dir = dir;
    }

    telemetry::init(&config.telemetry, LogTarget::Stdout)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let simulator = Arc::new(load_service(&config.simulator)?);

    let app = with_simulator_routes(simulator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        artifacts = %config.simulator.artifact_dir.display(),
        "credit approval simulator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
