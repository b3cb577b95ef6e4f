use crate::cli::ServeArgs;
use crate::infra::{
    load_listings, AppState, InMemoryApplicationRepository, InMemoryOfferRepository,
};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use buy_my_house::config::AppConfig;
use buy_my_house::error::AppError;
use buy_my_house::listings::ListingService;
use buy_my_house::mortgage::{MortgageOfferCalculator, MortgageService};
use buy_my_house::telemetry;
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
    if let Some(path) = args.listings_csv.take() {
        config.listings.seed_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let houses = load_listings(&config.listings)?;
    let listing_service = Arc::new(ListingService::new(Arc::new(houses)));
    let mortgage_service = Arc::new(MortgageService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryOfferRepository::default()),
        MortgageOfferCalculator::default(),
    ));

    let app = with_service_routes(listing_service, mortgage_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "buy-my-house service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
