use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Estimate, EstimateId, EstimateOutcome, EstimateReceipt, EstimateRequest, StayKey,
};
use super::repository::EstimateRepository;
use crate::auth::Caller;
use crate::workflows::packages::{
    round_for_display, stay_nights_between, BillingCatalog, BillingError, Entitlement,
    LookupPolicy, PackageDefinition, PackageFilter, PackageRepository, RateCalculator,
    RepositoryError,
};

static ESTIMATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_estimate_id() -> EstimateId {
    let id = ESTIMATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EstimateId(format!("est-{id:06}"))
}

/// Prices guest estimates against a listing's packages and keeps one estimate per stay.
pub struct EstimateService<E, R, B> {
    estimates: Arc<E>,
    packages: Arc<R>,
    billing: Arc<B>,
    lookup: LookupPolicy,
    calculator: RateCalculator,
}

impl<E, R, B> EstimateService<E, R, B>
where
    E: EstimateRepository + 'static,
    R: PackageRepository + 'static,
    B: BillingCatalog + 'static,
{
    pub fn new(
        estimates: Arc<E>,
        packages: Arc<R>,
        billing: Arc<B>,
        lookup: LookupPolicy,
        calculator: RateCalculator,
    ) -> Self {
        Self {
            estimates,
            packages,
            billing,
            lookup,
            calculator,
        }
    }

    pub fn lookup_policy(&self) -> &LookupPolicy {
        &self.lookup
    }

    pub fn get(&self, id: &EstimateId) -> Result<Estimate, EstimateServiceError> {
        let estimate = self
            .estimates
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(estimate)
    }

    /// Price the request and store it, replacing any estimate the caller already holds for
    /// the same listing and dates.
    pub fn submit(
        &self,
        caller: &Caller,
        request: EstimateRequest,
    ) -> Result<EstimateReceipt, EstimateServiceError> {
        if request.guests == 0 {
            return Err(EstimateServiceError::NoGuests);
        }

        let packages = self
            .packages
            .list(&PackageFilter::for_listing(request.listing_id.clone()))?;
        let matched = self.lookup.resolve(&packages, &request.package).ok_or_else(|| {
            EstimateServiceError::PackageNotFound {
                package: request.package.clone(),
                listing: request.listing_id.0.clone(),
            }
        })?;

        let package = matched.package;
        let nights = stay_nights_between(request.from_date, request.to_date);
        let entitlement = self
            .billing
            .customer_status(&caller.user_id)?
            .entitlement(Utc::now());
        ensure_eligible(&package.definition, nights, entitlement)?;

        let base_rate = self.calculator.resolve_base_rate(package.base_rate, None);
        let total =
            self.calculator
                .compute_total(base_rate, nights, package.definition.multiplier);

        if let Some(submitted) = request.total {
            if round_for_display(submitted) != round_for_display(total) {
                warn!(
                    listing = %request.listing_id.0,
                    package = %package.id().0,
                    submitted,
                    computed = total,
                    "client estimate total differs from computed total"
                );
            }
        }

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} estimate", package.display_name()));

        let key = StayKey {
            listing_id: request.listing_id.clone(),
            customer_id: caller.user_id.clone(),
            from_date: request.from_date,
            to_date: request.to_date,
        };
        let existing = self.estimates.find_for_stay(&key)?;

        let mut estimate = Estimate {
            id: existing
                .as_ref()
                .map(|estimate| estimate.id.clone())
                .unwrap_or_else(next_estimate_id),
            title,
            listing_id: key.listing_id,
            customer_id: key.customer_id,
            from_date: key.from_date,
            to_date: key.to_date,
            guests: request.guests,
            package_id: package.id().clone(),
            package_title: package.display_name().to_string(),
            matched_by: matched.strategy,
            nights,
            base_rate,
            total,
        };

        let outcome = match existing {
            Some(_) => {
                self.estimates.update(estimate.clone())?;
                EstimateOutcome::Updated
            }
            None => {
                estimate = self.estimates.insert(estimate)?;
                EstimateOutcome::Created
            }
        };

        info!(
            estimate = %estimate.id.0,
            listing = %estimate.listing_id.0,
            package = %estimate.package_id.0,
            matched_by = %estimate.matched_by,
            nights,
            outcome = ?outcome,
            "estimate stored"
        );
        Ok(EstimateReceipt { outcome, estimate })
    }
}

/// The matched package must be one the recommender would offer for this stay and tier.
fn ensure_eligible(
    definition: &PackageDefinition,
    nights: i64,
    entitlement: Entitlement,
) -> Result<(), EstimateServiceError> {
    let stay = u32::try_from(nights.max(1)).unwrap_or(u32::MAX);
    let reason = if !definition.covers(stay) {
        format!(
            "covers {}-{} nights, not {stay}",
            definition.min_nights, definition.max_nights
        )
    } else if !entitlement.grants(definition.entitlement_required) {
        format!(
            "requires {} entitlement, caller has {}",
            definition.entitlement_required.label(),
            entitlement.label()
        )
    } else {
        return Ok(());
    };

    Err(EstimateServiceError::PackageNotEligible {
        package: definition.id.0.clone(),
        reason,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum EstimateServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error("no package matching '{package}' on listing {listing}")]
    PackageNotFound { package: String, listing: String },
    #[error("package {package} is not available for this stay: {reason}")]
    PackageNotEligible { package: String, reason: String },
    #[error("an estimate needs at least one guest")]
    NoGuests,
}
