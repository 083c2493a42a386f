use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryClientDirectory, InMemoryProductCatalog, InMemoryRatingStore,
    MetricsSignalPublisher,
};
use crate::routes::with_storefront_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::error::AppError;
use storefront::ratings::RatingInferenceService;
use storefront::telemetry;
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

    let clients = Arc::new(InMemoryClientDirectory::default());
    let products = Arc::new(InMemoryProductCatalog::default());
    let store = Arc::new(InMemoryRatingStore::default());
    let rating_service = Arc::new(RatingInferenceService::new(
        clients.clone(),
        products.clone(),
        store,
        Arc::new(MetricsSignalPublisher),
        config.ratings.weights.clone(),
    ));

    let app = with_storefront_routes(rating_service, clients, products)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rating inference service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
