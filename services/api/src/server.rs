use crate::cli::ServeArgs;
use crate::infra::{AppState, DashboardState};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use territory_dashboard::config::AppConfig;
use territory_dashboard::error::AppError;
use territory_dashboard::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data) = args.data.take() {
        config.dashboard.data_path = data;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // A dataset that cannot be loaded is fatal; fail before accepting traffic.
    let dashboard_state = DashboardState::new(&config.dashboard);
    let dataset = dashboard_state.dataset().await?;

    let app = with_dashboard_routes(dashboard_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        records = dataset.len(),
        data_path = %config.dashboard.data_path.display(),
        "territory dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
