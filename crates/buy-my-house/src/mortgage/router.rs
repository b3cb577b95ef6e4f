use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::{ApplicationId, MortgageApplication, OfferId};
use super::repository::{ApplicationRepository, OfferRepository};
use super::service::{MortgageService, MortgageServiceError, OfferDecision};
use crate::error::RepositoryError;

/// Router builder exposing intake, processing, and quote endpoints.
pub fn mortgage_router<A, F>(service: Arc<MortgageService<A, F>>) -> Router
where
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    Router::new()
        .route("/api/mortgage/applications", post(submit_handler::<A, F>))
        .route(
            "/api/mortgage/applications/:application_id",
            get(application_handler::<A, F>),
        )
        .route(
            "/api/mortgage/applications/:application_id/offer",
            post(process_handler::<A, F>),
        )
        .route("/api/mortgage/offers/:offer_id", get(offer_handler::<A, F>))
        .route("/api/mortgage/quote", post(quote_handler::<A, F>))
        .with_state(service)
}

pub(crate) async fn submit_handler<A, F>(
    State(service): State<Arc<MortgageService<A, F>>>,
    axum::Json(application): axum::Json<MortgageApplication>,
) -> Response
where
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    match service.submit(application) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn application_handler<A, F>(
    State(service): State<Arc<MortgageService<A, F>>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    match service.application(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn process_handler<A, F>(
    State(service): State<Arc<MortgageService<A, F>>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.process(&id) {
        Ok(OfferDecision::Approved { offer }) => {
            (StatusCode::CREATED, axum::Json(offer)).into_response()
        }
        Ok(OfferDecision::Rejected { reason }) => {
            let payload = json!({
                "applicationId": id.0,
                "approved": false,
                "reason": reason,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn offer_handler<A, F>(
    State(service): State<Arc<MortgageService<A, F>>>,
    Path(offer_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    match service.offer(&OfferId(offer_id)) {
        Ok(offer) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn quote_handler<A, F>(
    State(service): State<Arc<MortgageService<A, F>>>,
    axum::Json(application): axum::Json<MortgageApplication>,
) -> Response
where
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    match service.quote(&application) {
        Ok(quote) => {
            let payload = json!({
                "approved": quote.decision.approved,
                "reason": quote.decision.rejection_reason(),
                "offer": quote.offer,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: MortgageServiceError) -> Response {
    let status = match &err {
        MortgageServiceError::MissingApplicationId | MortgageServiceError::Offer(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        MortgageServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MortgageServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MortgageServiceError::Repository(RepositoryError::Unavailable(_)) => {
            warn!(error = %err, "mortgage repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
