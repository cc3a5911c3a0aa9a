use credit_coach::config::SimulatorConfig;
use credit_coach::simulator::{
    ArtifactBundle, ArtifactError, LogisticApprovalModel, SimulatorService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_service(
    config: &SimulatorConfig,
) -> Result<SimulatorService<LogisticApprovalModel>, ArtifactError> {
    let bundle = ArtifactBundle::load(&config.artifact_dir)?;
    Ok(SimulatorService::from_artifacts(bundle, config.lime()))
}
