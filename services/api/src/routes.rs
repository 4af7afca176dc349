use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use staybook::error::AppError;
use staybook::workflows::estimates::{estimate_router, EstimateRepository, EstimateService};
use staybook::workflows::packages::{
    package_router, quote_stay, BillingCatalog, CatalogSnapshot, PackageRates,
    PackageRepository, PackageService, QuoteRequest, RateCalculator, StayQuote,
};

#[derive(Debug, Deserialize)]
pub(crate) struct StayQuoteRequest {
    #[serde(flatten)]
    pub(crate) stay: QuoteRequest,
    /// JSON array of package definitions replacing the standard catalog.
    #[serde(default)]
    pub(crate) catalog: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StayQuoteResponse {
    pub(crate) data_source: CatalogSource,
    #[serde(flatten)]
    pub(crate) quote: StayQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CatalogSource {
    Custom,
    Standard,
}

pub(crate) fn with_booking_routes<R, B, E>(
    packages: Arc<PackageService<R, B>>,
    estimates: Arc<EstimateService<E, R, B>>,
) -> axum::Router
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
    E: EstimateRepository + 'static,
{
    package_router(packages)
        .merge(estimate_router(estimates))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/quote", axum::routing::post(quote_endpoint))
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

/// Stateless quote against the standard catalog or one supplied inline.
pub(crate) async fn quote_endpoint(
    Extension(calculator): Extension<RateCalculator>,
    Json(payload): Json<StayQuoteRequest>,
) -> Result<Json<StayQuoteResponse>, AppError> {
    let StayQuoteRequest { stay, catalog } = payload;

    let (catalog, data_source) = match catalog {
        Some(raw) => (
            CatalogSnapshot::from_json_reader(Cursor::new(raw.into_bytes()))?,
            CatalogSource::Custom,
        ),
        None => (CatalogSnapshot::standard(), CatalogSource::Standard),
    };

    let entitlement = stay.entitlement.unwrap_or_default();
    let quote = quote_stay(
        &catalog,
        &calculator,
        &stay,
        entitlement,
        &PackageRates::new(),
    );

    Ok(Json(StayQuoteResponse { data_source, quote }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryEstimateRepository, InMemoryPackageRepository};
    use axum::body::Body;
    use axum::http::Request;
    use staybook::workflows::packages::{Entitlement, LookupPolicy, MockBillingCatalog};
    use tower::ServiceExt;

    fn stay(nights: i64) -> QuoteRequest {
        QuoteRequest {
            nights: Some(nights),
            ..QuoteRequest::default()
        }
    }

    #[tokio::test]
    async fn quote_endpoint_uses_standard_catalog() {
        let request = StayQuoteRequest {
            stay: QuoteRequest {
                entitlement: Some(Entitlement::Standard),
                ..stay(15)
            },
            catalog: None,
        };

        let Json(body) = quote_endpoint(Extension(RateCalculator::default()), Json(request))
            .await
            .expect("quote builds");

        assert_eq!(body.data_source, CatalogSource::Standard);
        assert_eq!(body.quote.base_rate, 150.0);
        let primary = body.quote.primary.expect("fortnight package");
        assert_eq!(primary.package.id.0, "two_week");
        assert_eq!(primary.display_total, 1912.5);
    }

    #[tokio::test]
    async fn quote_endpoint_accepts_inline_catalog() {
        let request = StayQuoteRequest {
            stay: stay(2),
            catalog: Some(
                r#"[{"id":"studio","title":"Studio","multiplier":1.2,"min_nights":1,"max_nights":3}]"#
                    .to_string(),
            ),
        };

        let Json(body) = quote_endpoint(Extension(RateCalculator::new(100.0)), Json(request))
            .await
            .expect("quote builds");

        assert_eq!(body.data_source, CatalogSource::Custom);
        let primary = body.quote.primary.expect("studio");
        assert_eq!(primary.display_total, 240.0);
        assert_eq!(primary.adjustment_label, "+20%");
    }

    #[tokio::test]
    async fn quote_endpoint_rejects_invalid_catalog() {
        let request = StayQuoteRequest {
            stay: stay(2),
            catalog: Some("[{\"id\":\"x\"}]".to_string()),
        };

        let err = quote_endpoint(Extension(RateCalculator::default()), Json(request))
            .await
            .expect_err("catalog rejected");

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn booking_routes_serve_health_and_listing_catalogs() {
        let packages = Arc::new(InMemoryPackageRepository::default());
        let billing = Arc::new(MockBillingCatalog::new(None));
        let package_service = Arc::new(PackageService::new(
            packages.clone(),
            billing.clone(),
            RateCalculator::default(),
        ));
        let estimate_service = Arc::new(EstimateService::new(
            Arc::new(InMemoryEstimateRepository::default()),
            packages,
            billing,
            LookupPolicy::default(),
            RateCalculator::default(),
        ));
        let app = with_booking_routes(package_service, estimate_service);

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(health.status(), StatusCode::OK);

        let catalog = app
            .oneshot(
                Request::get("/api/v1/listings/post-1/packages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(catalog.status(), StatusCode::OK);
        let body = axum::body::to_bytes(catalog.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["total"], 5);
        assert_eq!(payload["packages"][0]["source"], "billing");
    }
}
