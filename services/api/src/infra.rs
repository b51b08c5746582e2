use metrics_exporter_prometheus::PrometheusHandle;
use repair_advisor::config::AppConfig;
use repair_advisor::decision::DecisionEngine;
use repair_advisor::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<DecisionEngine>,
}

/// Engine built from the configured tuning file, or the shipped defaults.
pub(crate) fn engine_from_config(config: &AppConfig) -> Result<DecisionEngine, AppError> {
    let engine_config = config.engine_config()?;
    Ok(DecisionEngine::new(engine_config))
}
