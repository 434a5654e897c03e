use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDecisionRepository};
use crate::routes::with_decision_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use decision_matrix::config::AppConfig;
use decision_matrix::decisions::DecisionService;
use decision_matrix::error::AppError;
use decision_matrix::telemetry;
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
    if args.strict_weights {
        config.weights.strict = true;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryDecisionRepository::default());
    let decision_service = Arc::new(DecisionService::new(repository, config.weights));

    let app = with_decision_routes(decision_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strict_weights = config.weights.strict,
        weight_tolerance = config.weights.tolerance,
        "decision matrix service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
