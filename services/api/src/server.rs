use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use accident_risk::config::AppConfig;
use accident_risk::error::AppError;
use accident_risk::scoring::ScoringState;
use accident_risk::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
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
    if let Some(model) = args.model.take() {
        config.model.artifact_path = model;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let scoring = Arc::new(ScoringState::load(
        &config.model.artifact_path,
        config.scoring,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        scoring: scoring.clone(),
    };

    let app = with_service_routes(scoring)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        threshold = config.scoring.high_risk_threshold,
        "accident risk service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
