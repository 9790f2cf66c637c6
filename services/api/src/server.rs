use crate::cli::ServeArgs;
use crate::infra::{seeded_backend, AppState};
use crate::routes::with_review_routes;
use admissions_review::config::AppConfig;
use admissions_review::error::AppError;
use admissions_review::review::{ReviewWorkflowService, Role};
use admissions_review::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = Arc::new(seeded_backend("Morgan Wells", Role::FullControl));
    let review_service = Arc::new(ReviewWorkflowService::connect(
        backend,
        config.review.history_limit,
    )?);

    let app = with_review_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admissions review coordinator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
