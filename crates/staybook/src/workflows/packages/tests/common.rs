use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::auth::Caller;
use crate::workflows::packages::billing::{
    BillingCatalog, BillingError, BillingProduct, MockBillingCatalog,
};
use crate::workflows::packages::domain::{
    CustomerId, Entitlement, ListingId, ListingPackage, PackageCategory, PackageDraft, PackageId,
};
use crate::workflows::packages::entitlement::{ActiveEntitlement, SubscriptionStatus};
use crate::workflows::packages::pricing::RateCalculator;
use crate::workflows::packages::repository::{PackageFilter, PackageRepository, RepositoryError};
use crate::workflows::packages::service::PackageService;

pub(super) const LISTING: &str = "post-42";

pub(super) fn listing() -> ListingId {
    ListingId(LISTING.to_string())
}

pub(super) fn host() -> Caller {
    Caller::host("host-1")
}

pub(super) fn guest() -> Caller {
    Caller::customer("guest-1")
}

pub(super) fn draft(slug: &str) -> PackageDraft {
    PackageDraft {
        listing_id: listing(),
        title: format!("Package {slug}"),
        slug: slug.to_string(),
        description: "Fixture package".to_string(),
        multiplier: 1.0,
        min_nights: 1,
        max_nights: 7,
        category: PackageCategory::Standard,
        entitlement_required: Entitlement::None,
        features: vec!["Basic amenities".to_string()],
        base_rate: None,
        billing_product_id: None,
        enabled: true,
    }
}

pub(super) fn build_service() -> (
    PackageService<MemoryPackages, MockBillingCatalog>,
    Arc<MemoryPackages>,
) {
    let repository = Arc::new(MemoryPackages::default());
    let billing = Arc::new(MockBillingCatalog::with_products(Vec::new()));
    let service = PackageService::new(repository.clone(), billing, RateCalculator::default());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryPackages {
    pub(super) records: Arc<Mutex<Vec<ListingPackage>>>,
}

impl PackageRepository for MemoryPackages {
    fn insert(&self, package: ListingPackage) -> Result<ListingPackage, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id() == package.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(package.clone());
        Ok(package)
    }

    fn update(&self, package: ListingPackage) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id() == package.id()) {
            Some(slot) => {
                *slot = package;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &PackageId) -> Result<Option<ListingPackage>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|package| package.id() == id).cloned())
    }

    fn list(&self, filter: &PackageFilter) -> Result<Vec<ListingPackage>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|package| filter.matches(package))
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailablePackages;

impl PackageRepository for UnavailablePackages {
    fn insert(&self, _package: ListingPackage) -> Result<ListingPackage, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _package: ListingPackage) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PackageId) -> Result<Option<ListingPackage>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filter: &PackageFilter) -> Result<Vec<ListingPackage>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Billing stand-in reporting a fixed subscription status for every customer.
pub(super) struct SubscribedBilling {
    pub(super) products: Vec<BillingProduct>,
    pub(super) status: SubscriptionStatus,
}

impl SubscribedBilling {
    pub(super) fn pro() -> Self {
        Self {
            products: Vec::new(),
            status: SubscriptionStatus {
                entitlements: Vec::new(),
                active_subscriptions: vec!["stay_pro_yearly".to_string()],
            },
        }
    }

    pub(super) fn expired_pro() -> Self {
        let purchase = chrono::Utc::now() - chrono::Duration::days(400);
        Self {
            products: Vec::new(),
            status: SubscriptionStatus {
                entitlements: vec![ActiveEntitlement {
                    identifier: "pro".to_string(),
                    product_identifier: "stay_pro_yearly".to_string(),
                    purchase_date: purchase,
                    expires_date: Some(purchase + chrono::Duration::days(365)),
                }],
                active_subscriptions: Vec::new(),
            },
        }
    }
}

impl BillingCatalog for SubscribedBilling {
    fn products(&self) -> Result<Vec<BillingProduct>, BillingError> {
        Ok(self.products.clone())
    }

    fn customer_status(&self, _customer: &CustomerId) -> Result<SubscriptionStatus, BillingError> {
        Ok(self.status.clone())
    }
}

pub(super) struct OfflineBilling;

impl BillingCatalog for OfflineBilling {
    fn products(&self) -> Result<Vec<BillingProduct>, BillingError> {
        Err(BillingError::Unavailable("timeout".to_string()))
    }

    fn customer_status(&self, _customer: &CustomerId) -> Result<SubscriptionStatus, BillingError> {
        Err(BillingError::Unavailable("timeout".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
