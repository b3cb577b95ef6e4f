use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use buy_my_house::listings::{listing_router, HouseRepository, ListingService};
use buy_my_house::mortgage::{
    mortgage_router, ApplicationRepository, MortgageService, OfferRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<H, A, F>(
    listings: Arc<ListingService<H>>,
    mortgages: Arc<MortgageService<A, F>>,
) -> axum::Router
where
    H: HouseRepository + 'static,
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    listing_router(listings)
        .merge(mortgage_router(mortgages))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
