use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::billing::{BillingCatalog, BillingError};
use super::catalog::CatalogSnapshot;
use super::domain::{
    Entitlement, ListingId, ListingPackage, PackageDraft, PackageId, PackagePatch,
    PackageSetting, PackageValidationError,
};
use super::pricing::RateCalculator;
use super::quote::{quote_stay, PackageRates, QuoteRequest, StayQuote};
use super::repository::{PackageFilter, PackageRepository, RepositoryError};
use crate::auth::Caller;

/// Service composing package storage, the billing catalog, and the rate calculator.
pub struct PackageService<R, B> {
    repository: Arc<R>,
    billing: Arc<B>,
    calculator: RateCalculator,
}

static PACKAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_package_id() -> PackageId {
    let id = PACKAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PackageId(format!("pkg-{id:06}"))
}

impl<R, B> PackageService<R, B>
where
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    pub fn new(repository: Arc<R>, billing: Arc<B>, calculator: RateCalculator) -> Self {
        Self {
            repository,
            billing,
            calculator,
        }
    }

    pub fn calculator(&self) -> &RateCalculator {
        &self.calculator
    }

    pub fn list(&self, filter: &PackageFilter) -> Result<Vec<ListingPackage>, PackageServiceError> {
        Ok(self.repository.list(filter)?)
    }

    pub fn get(&self, id: &PackageId) -> Result<ListingPackage, PackageServiceError> {
        let package = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(package)
    }

    /// Create a package on a listing after validating it and checking slug uniqueness.
    pub fn create(
        &self,
        caller: &Caller,
        draft: PackageDraft,
    ) -> Result<ListingPackage, PackageServiceError> {
        ensure_manager(caller)?;

        let package = draft.into_package(next_package_id());
        package.validate()?;
        self.ensure_unique_slug(&package)?;

        let stored = self.repository.insert(package)?;
        info!(
            package = %stored.id().0,
            listing = %stored.listing_id.0,
            user = %caller.user_id.0,
            "package created"
        );
        Ok(stored)
    }

    /// Apply a partial update; the result must still validate.
    pub fn update(
        &self,
        caller: &Caller,
        id: &PackageId,
        patch: PackagePatch,
    ) -> Result<ListingPackage, PackageServiceError> {
        ensure_manager(caller)?;

        let mut package = self.get(id)?;
        patch.apply(&mut package);
        package.validate()?;

        self.repository.update(package.clone())?;
        info!(package = %id.0, user = %caller.user_id.0, "package updated");
        Ok(package)
    }

    /// Apply host dashboard toggles and custom names for one listing. Nothing is written
    /// unless every setting refers to a package on that listing.
    pub fn apply_settings(
        &self,
        caller: &Caller,
        listing_id: &ListingId,
        settings: Vec<PackageSetting>,
    ) -> Result<Vec<ListingPackage>, PackageServiceError> {
        ensure_manager(caller)?;

        let mut staged = Vec::with_capacity(settings.len());
        for setting in settings {
            let mut package = self.get(&setting.package_id)?;
            if &package.listing_id != listing_id {
                return Err(PackageServiceError::ForeignPackage {
                    package: setting.package_id.0,
                    listing: listing_id.0.clone(),
                });
            }
            package.enabled = setting.enabled;
            package.custom_name = setting
                .custom_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty());
            staged.push(package);
        }

        for package in &staged {
            self.repository.update(package.clone())?;
        }
        info!(
            listing = %listing_id.0,
            updated = staged.len(),
            "package settings applied"
        );
        Ok(staged)
    }

    /// Enabled listing packages followed by enabled billing products.
    pub fn listing_catalog(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ListingPackage>, PackageServiceError> {
        let mut packages = self
            .repository
            .list(&PackageFilter::for_listing(listing_id.clone()).enabled_only())?;
        let stored = packages.len();

        packages.extend(
            self.billing
                .products()?
                .iter()
                .filter(|product| product.enabled)
                .map(|product| product.to_listing_package(listing_id)),
        );

        debug!(
            listing = %listing_id.0,
            stored,
            billing = packages.len() - stored,
            "listing catalog assembled"
        );
        Ok(packages)
    }

    /// Snapshot of the enabled packages stored for a listing, in storage order.
    pub fn snapshot(&self, listing_id: &ListingId) -> Result<CatalogSnapshot, PackageServiceError> {
        Ok(self.enabled_packages(listing_id)?
            .into_iter()
            .map(|package| package.definition)
            .collect())
    }

    /// Price the listing's packages for a stay at the caller's entitlement.
    pub fn quote(
        &self,
        listing_id: &ListingId,
        caller: Option<&Caller>,
        request: &QuoteRequest,
    ) -> Result<StayQuote, PackageServiceError> {
        let packages = self.enabled_packages(listing_id)?;
        let rates: PackageRates = packages
            .iter()
            .filter_map(|package| package.base_rate.map(|rate| (package.id().clone(), rate)))
            .collect::<HashMap<_, _>>();
        let catalog: CatalogSnapshot = packages
            .into_iter()
            .map(|package| package.definition)
            .collect();

        let entitlement = self.caller_entitlement(caller, request.entitlement)?;

        let quote = quote_stay(&catalog, &self.calculator, request, entitlement, &rates);
        debug!(
            listing = %listing_id.0,
            nights = quote.nights,
            entitlement = entitlement.label(),
            eligible = quote.packages.len(),
            "stay quoted"
        );
        Ok(quote)
    }

    /// Guests are priced at their billing status whatever the request declares. Hosts and
    /// admins may preview another tier; anonymous callers always quote at `None`.
    fn caller_entitlement(
        &self,
        caller: Option<&Caller>,
        requested: Option<Entitlement>,
    ) -> Result<Entitlement, PackageServiceError> {
        let Some(caller) = caller else {
            return Ok(Entitlement::None);
        };
        if let (Some(requested), true) = (requested, caller.can_manage_packages()) {
            return Ok(requested);
        }
        Ok(self
            .billing
            .customer_status(&caller.user_id)?
            .entitlement(Utc::now()))
    }

    fn enabled_packages(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ListingPackage>, PackageServiceError> {
        Ok(self
            .repository
            .list(&PackageFilter::for_listing(listing_id.clone()).enabled_only())?)
    }

    fn ensure_unique_slug(&self, package: &ListingPackage) -> Result<(), PackageServiceError> {
        let taken = self
            .repository
            .list(&PackageFilter::default())?
            .iter()
            .any(|existing| existing.slug.eq_ignore_ascii_case(&package.slug));
        if taken {
            return Err(PackageServiceError::DuplicateSlug(package.slug.clone()));
        }
        Ok(())
    }
}

fn ensure_manager(caller: &Caller) -> Result<(), PackageServiceError> {
    if caller.can_manage_packages() {
        Ok(())
    } else {
        Err(PackageServiceError::Forbidden)
    }
}

/// Error raised by the package service.
#[derive(Debug, thiserror::Error)]
pub enum PackageServiceError {
    #[error(transparent)]
    Validation(#[from] PackageValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error("caller may not manage packages")]
    Forbidden,
    #[error("package slug '{0}' is already in use")]
    DuplicateSlug(String),
    #[error("package {package} does not belong to listing {listing}")]
    ForeignPackage { package: String, listing: String },
}
