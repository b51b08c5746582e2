use crate::cli::ServeArgs;
use crate::infra::{engine_from_config, AppState};
use crate::routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use repair_advisor::config::AppConfig;
use repair_advisor::error::AppError;
use repair_advisor::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let engine = engine_from_config(&config)?;
    info!(
        reference_rows = engine.table().len(),
        tuning = ?config.engine_config_path,
        "decision engine loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        engine: Arc::new(engine),
    };

    let app = routes::router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "repair advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
