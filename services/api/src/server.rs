use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEstimateRepository, InMemoryPackageRepository};
use crate::routes::with_booking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use staybook::config::AppConfig;
use staybook::error::AppError;
use staybook::telemetry;
use staybook::workflows::estimates::EstimateService;
use staybook::workflows::packages::{MockBillingCatalog, PackageService};
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

    let calculator = config.pricing.calculator();
    let packages = Arc::new(InMemoryPackageRepository::default());
    let billing = Arc::new(MockBillingCatalog::new(
        config.billing.public_sdk_key.as_deref(),
    ));
    let package_service = Arc::new(PackageService::new(
        packages.clone(),
        billing.clone(),
        calculator,
    ));
    let estimate_service = Arc::new(EstimateService::new(
        Arc::new(InMemoryEstimateRepository::default()),
        packages,
        billing,
        config.pricing.package_lookup.clone(),
        calculator,
    ));

    let app = with_booking_routes(package_service, estimate_service)
        .layer(Extension(calculator))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        base_rate = calculator.default_base_rate(),
        "staybook booking service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
