use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDraftStore};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use use_of_force::config::AppConfig;
use use_of_force::error::AppError;
use use_of_force::forms::FormRegistry;
use use_of_force::reports::ReportService;
use use_of_force::telemetry;

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

    let registry = Arc::new(FormRegistry::build()?);
    let store = Arc::new(InMemoryDraftStore::default());
    let service = Arc::new(ReportService::new(registry, store, config.clock));

    let app = with_report_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, ?config.clock, %addr, "use of force report service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
