use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::estimates::domain::{Estimate, EstimateId, EstimateRequest, StayKey};
use crate::workflows::estimates::repository::EstimateRepository;
use crate::workflows::estimates::service::EstimateService;
use crate::workflows::packages::{
    BillingCatalog, BillingError, BillingProduct, CustomerId, Entitlement, ListingId,
    ListingPackage, LookupPolicy, MockBillingCatalog, PackageCategory, PackageDefinition,
    PackageFilter, PackageId, PackageRepository, PackageSource, RateCalculator, RepositoryError,
    SubscriptionStatus,
};

pub(super) const LISTING: &str = "post-42";

pub(super) fn stored_package(
    id: &str,
    title: &str,
    multiplier: f64,
    base_rate: Option<f64>,
    enabled: bool,
) -> ListingPackage {
    ListingPackage {
        listing_id: ListingId(LISTING.to_string()),
        slug: id.to_string(),
        definition: PackageDefinition {
            id: PackageId(id.to_string()),
            title: title.to_string(),
            description: String::new(),
            multiplier,
            min_nights: 1,
            max_nights: 30,
            category: PackageCategory::Standard,
            entitlement_required: Entitlement::None,
            features: Vec::new(),
        },
        enabled,
        base_rate,
        billing_product_id: None,
        custom_name: None,
        source: PackageSource::Database,
    }
}

pub(super) fn seeded_packages() -> StaticPackages {
    StaticPackages(vec![
        stored_package("pkg-basic", "Basic", 1.0, None, true),
        stored_package("pkg-weekly", "Weekly", 0.9, Some(200.0), true),
        stored_package("pkg-retired", "Retired", 2.0, None, false),
    ])
}

pub(super) fn request(package: &str) -> EstimateRequest {
    EstimateRequest {
        listing_id: ListingId(LISTING.to_string()),
        from_date: NaiveDate::from_ymd_opt(2025, 12, 1),
        to_date: NaiveDate::from_ymd_opt(2025, 12, 8),
        guests: 2,
        title: None,
        package: package.to_string(),
        total: None,
    }
}

/// Weekly-only members package: 7 to 13 nights, pro tier, half price.
pub(super) fn members_week() -> ListingPackage {
    let mut package = stored_package("pkg-members", "Members week", 0.5, None, true);
    package.definition.min_nights = 7;
    package.definition.max_nights = 13;
    package.definition.entitlement_required = Entitlement::Pro;
    package
}

pub(super) fn no_subscription() -> Arc<MockBillingCatalog> {
    Arc::new(MockBillingCatalog::with_products(Vec::new()))
}

pub(super) fn build_service() -> (
    EstimateService<MemoryEstimates, StaticPackages, MockBillingCatalog>,
    Arc<MemoryEstimates>,
) {
    let estimates = Arc::new(MemoryEstimates::default());
    let service = EstimateService::new(
        estimates.clone(),
        Arc::new(seeded_packages()),
        no_subscription(),
        LookupPolicy::default(),
        RateCalculator::default(),
    );
    (service, estimates)
}

#[derive(Default, Clone)]
pub(super) struct MemoryEstimates {
    pub(super) records: Arc<Mutex<Vec<Estimate>>>,
}

impl EstimateRepository for MemoryEstimates {
    fn insert(&self, estimate: Estimate) -> Result<Estimate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == estimate.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(estimate.clone());
        Ok(estimate)
    }

    fn update(&self, estimate: Estimate) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == estimate.id) {
            Some(slot) => {
                *slot = estimate;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &EstimateId) -> Result<Option<Estimate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|estimate| &estimate.id == id).cloned())
    }

    fn find_for_stay(&self, key: &StayKey) -> Result<Option<Estimate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|estimate| &estimate.stay_key() == key)
            .cloned())
    }
}

/// Read-only package source; estimates never write packages.
pub(super) struct StaticPackages(pub(super) Vec<ListingPackage>);

impl PackageRepository for StaticPackages {
    fn insert(&self, _package: ListingPackage) -> Result<ListingPackage, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn update(&self, _package: ListingPackage) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: &PackageId) -> Result<Option<ListingPackage>, RepositoryError> {
        Ok(self.0.iter().find(|package| package.id() == id).cloned())
    }

    fn list(&self, filter: &PackageFilter) -> Result<Vec<ListingPackage>, RepositoryError> {
        Ok(self
            .0
            .iter()
            .filter(|package| filter.matches(package))
            .cloned()
            .collect())
    }
}

/// Billing that reports a live pro subscription for every customer.
pub(super) struct ProMember;

impl BillingCatalog for ProMember {
    fn products(&self) -> Result<Vec<BillingProduct>, BillingError> {
        Ok(Vec::new())
    }

    fn customer_status(&self, _customer: &CustomerId) -> Result<SubscriptionStatus, BillingError> {
        Ok(SubscriptionStatus {
            entitlements: Vec::new(),
            active_subscriptions: vec!["stay_pro_monthly".to_string()],
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
