use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{EstimateId, EstimateOutcome, EstimateRequest};
use super::repository::EstimateRepository;
use super::service::{EstimateService, EstimateServiceError};
use crate::auth::Caller;
use crate::workflows::packages::{BillingCatalog, PackageRepository, RepositoryError};

pub fn estimate_router<E, R, B>(service: Arc<EstimateService<E, R, B>>) -> Router
where
    E: EstimateRepository + 'static,
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    Router::new()
        .route("/api/v1/estimates", post(submit_handler::<E, R, B>))
        .route("/api/v1/estimates/:estimate_id", get(fetch_handler::<E, R, B>))
        .with_state(service)
}

pub(crate) async fn submit_handler<E, R, B>(
    State(service): State<Arc<EstimateService<E, R, B>>>,
    caller: Caller,
    Json(request): Json<EstimateRequest>,
) -> Response
where
    E: EstimateRepository + 'static,
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.submit(&caller, request) {
        Ok(receipt) => {
            let status = match receipt.outcome {
                EstimateOutcome::Created => StatusCode::CREATED,
                EstimateOutcome::Updated => StatusCode::OK,
            };
            (status, Json(receipt)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<E, R, B>(
    State(service): State<Arc<EstimateService<E, R, B>>>,
    caller: Caller,
    Path(estimate_id): Path<String>,
) -> Response
where
    E: EstimateRepository + 'static,
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.get(&EstimateId(estimate_id)) {
        Ok(estimate) if estimate.customer_id == caller.user_id || caller.can_manage_packages() => {
            (StatusCode::OK, Json(estimate)).into_response()
        }
        Ok(_) => error_response(EstimateServiceError::Repository(RepositoryError::NotFound)),
        Err(err) => error_response(err),
    }
}

fn error_response(err: EstimateServiceError) -> Response {
    let status = match &err {
        EstimateServiceError::PackageNotFound { .. } => StatusCode::BAD_REQUEST,
        EstimateServiceError::PackageNotEligible { .. } | EstimateServiceError::NoGuests => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EstimateServiceError::Billing(_) => {
            error!(error = %err, "billing status lookup failed");
            StatusCode::BAD_GATEWAY
        }
        EstimateServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        EstimateServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        EstimateServiceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "estimate repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
