use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::billing::BillingCatalog;
use super::domain::{ListingId, ListingPackage, PackageDraft, PackageId, PackagePatch, PackageSetting};
use super::quote::QuoteRequest;
use super::repository::{PackageFilter, PackageRepository, RepositoryError};
use super::service::{PackageService, PackageServiceError};
use crate::auth::Caller;

/// Router builder exposing host package management and listing quotes.
pub fn package_router<R, B>(service: Arc<PackageService<R, B>>) -> Router
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    Router::new()
        .route(
            "/api/v1/packages",
            get(list_handler::<R, B>).post(create_handler::<R, B>),
        )
        .route("/api/v1/packages/:package_id", patch(update_handler::<R, B>))
        .route(
            "/api/v1/listings/:listing_id/packages",
            get(listing_packages_handler::<R, B>),
        )
        .route(
            "/api/v1/listings/:listing_id/package-settings",
            put(settings_handler::<R, B>),
        )
        .route(
            "/api/v1/listings/:listing_id/quote",
            post(listing_quote_handler::<R, B>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PackageQuery {
    #[serde(default)]
    pub(crate) listing_id: Option<String>,
    #[serde(default)]
    pub(crate) enabled: Option<bool>,
}

impl From<PackageQuery> for PackageFilter {
    fn from(query: PackageQuery) -> Self {
        PackageFilter {
            listing_id: query.listing_id.map(ListingId),
            enabled: query.enabled,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PackageListView {
    pub(crate) packages: Vec<ListingPackage>,
    pub(crate) total: usize,
}

impl From<Vec<ListingPackage>> for PackageListView {
    fn from(packages: Vec<ListingPackage>) -> Self {
        let total = packages.len();
        Self { packages, total }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PackageSettingsRequest {
    pub(crate) settings: Vec<PackageSetting>,
}

pub(crate) async fn list_handler<R, B>(
    State(service): State<Arc<PackageService<R, B>>>,
    Query(query): Query<PackageQuery>,
) -> Response
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.list(&query.into()) {
        Ok(packages) => (StatusCode::OK, Json(PackageListView::from(packages))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R, B>(
    State(service): State<Arc<PackageService<R, B>>>,
    caller: Caller,
    Json(draft): Json<PackageDraft>,
) -> Response
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.create(&caller, draft) {
        Ok(package) => (StatusCode::CREATED, Json(package)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R, B>(
    State(service): State<Arc<PackageService<R, B>>>,
    caller: Caller,
    Path(package_id): Path<String>,
    Json(patch): Json<PackagePatch>,
) -> Response
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.update(&caller, &PackageId(package_id), patch) {
        Ok(package) => (StatusCode::OK, Json(package)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn listing_packages_handler<R, B>(
    State(service): State<Arc<PackageService<R, B>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.listing_catalog(&ListingId(listing_id)) {
        Ok(packages) => (StatusCode::OK, Json(PackageListView::from(packages))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn settings_handler<R, B>(
    State(service): State<Arc<PackageService<R, B>>>,
    caller: Caller,
    Path(listing_id): Path<String>,
    Json(request): Json<PackageSettingsRequest>,
) -> Response
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.apply_settings(&caller, &ListingId(listing_id), request.settings) {
        Ok(packages) => (StatusCode::OK, Json(PackageListView::from(packages))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn listing_quote_handler<R, B>(
    State(service): State<Arc<PackageService<R, B>>>,
    caller: Option<Caller>,
    Path(listing_id): Path<String>,
    Json(request): Json<QuoteRequest>,
) -> Response
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    match service.quote(&ListingId(listing_id), caller.as_ref(), &request) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: PackageServiceError) -> Response {
    let status = match &err {
        PackageServiceError::Validation(_) | PackageServiceError::ForeignPackage { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PackageServiceError::Repository(RepositoryError::Conflict)
        | PackageServiceError::DuplicateSlug(_) => StatusCode::CONFLICT,
        PackageServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PackageServiceError::Forbidden => StatusCode::FORBIDDEN,
        PackageServiceError::Billing(_) => StatusCode::BAD_GATEWAY,
        PackageServiceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "package repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
