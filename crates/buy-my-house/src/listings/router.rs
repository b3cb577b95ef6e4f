use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::domain::HouseId;
use super::repository::HouseRepository;
use super::service::{ListingError, ListingService};

/// Query string accepted by the search endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
}

/// Router builder exposing the read-only listing endpoints.
pub fn listing_router<R>(service: Arc<ListingService<R>>) -> Router
where
    R: HouseRepository + 'static,
{
    Router::new()
        .route("/api/houses", get(list_handler::<R>))
        .route("/api/houses/search", get(search_handler::<R>))
        .route("/api/houses/:id", get(detail_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<ListingService<R>>>) -> Response
where
    R: HouseRepository + 'static,
{
    info!("fetching all houses");
    match service.all() {
        Ok(houses) => (StatusCode::OK, axum::Json(houses)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Path(id): Path<u32>,
) -> Response
where
    R: HouseRepository + 'static,
{
    info!(house_id = id, "fetching house");
    match service.get(HouseId(id)) {
        Ok(house) => (StatusCode::OK, axum::Json(house)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Query(query): Query<PriceQuery>,
) -> Response
where
    R: HouseRepository + 'static,
{
    let bounds = parse_bound(query.min_price.as_deref())
        .and_then(|min| parse_bound(query.max_price.as_deref()).map(|max| (min, max)));
    let Some((min_price, max_price)) = bounds else {
        return error_response(ListingError::InvalidPriceRange);
    };

    info!(
        min_price = ?min_price,
        max_price = ?max_price,
        "searching houses by price range"
    );
    match service.search(min_price, max_price) {
        Ok(houses) => (StatusCode::OK, axum::Json(houses)).into_response(),
        Err(err) => error_response(err),
    }
}

/// `None` when the value is present but not a number; `Some(None)` when absent.
fn parse_bound(raw: Option<&str>) -> Option<Option<Decimal>> {
    match raw.map(str::trim) {
        None | Some("") => Some(None),
        Some(value) => Decimal::from_str(value).ok().map(Some),
    }
}

fn error_response(err: ListingError) -> Response {
    let status = match &err {
        ListingError::NotFound(id) => {
            warn!(house_id = id.0, "house not found");
            StatusCode::NOT_FOUND
        }
        ListingError::InvalidPriceRange | ListingError::Invalid(_) => StatusCode::BAD_REQUEST,
        ListingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "message": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
