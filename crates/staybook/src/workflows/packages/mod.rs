//! Listing packages: catalog, pricing, recommendation, and host management.
//!
//! The pricing and recommendation functions are pure and work over an injected
//! [`CatalogSnapshot`]; the service layer assembles snapshots from storage and the billing
//! provider.

pub mod billing;
pub mod catalog;
pub mod domain;
pub mod entitlement;
pub mod lookup;
pub mod pricing;
pub mod quote;
pub mod recommend;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use billing::{BillingCatalog, BillingError, BillingPeriod, BillingProduct, MockBillingCatalog};
pub use catalog::{CatalogError, CatalogSnapshot};
pub use domain::{
    CustomerId, Entitlement, ListingId, ListingPackage, PackageCategory, PackageDefinition,
    PackageDraft, PackageId, PackagePatch, PackageSetting, PackageSource, PackageValidationError,
};
pub use entitlement::{ActiveEntitlement, SubscriptionStatus};
pub use lookup::{LookupPolicy, LookupStrategy, PackageMatch};
pub use pricing::{
    compute_total, round_for_display, stay_nights, stay_nights_between, PriceAdjustment,
    RateCalculator, DEFAULT_BASE_RATE,
};
pub use quote::{quote_stay, PackageRates, QuoteRequest, QuotedPackage, StayQuote};
pub use recommend::{recommend, recommend_packages, Recommendation, RecommendationRequest};
pub use repository::{PackageFilter, PackageRepository, RepositoryError};
pub use router::package_router;
pub use service::{PackageService, PackageServiceError};
