use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::CatalogSnapshot;
use super::domain::{Entitlement, PackageDefinition, PackageId};
use super::pricing::{round_for_display, stay_nights, PriceAdjustment, RateCalculator};
use super::recommend::{recommend, RecommendationRequest};

/// Guest request for priced package suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub nights: Option<i64>,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub base_rate: Option<f64>,
    #[serde(default)]
    pub base_rate_override: Option<f64>,
    #[serde(default)]
    pub entitlement: Option<Entitlement>,
    #[serde(default)]
    pub include_addons: bool,
    #[serde(default)]
    pub prefer_hosted: bool,
}

impl QuoteRequest {
    /// Explicit nights win over a date range; anything else is a single night.
    pub fn duration_nights(&self) -> i64 {
        match (self.nights, self.from_date, self.to_date) {
            (Some(nights), _, _) => nights.max(1),
            (None, Some(from), Some(to)) => stay_nights(from, to),
            _ => 1,
        }
    }
}

/// One eligible package with its price for the requested stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotedPackage {
    pub package: PackageDefinition,
    pub base_rate: f64,
    pub total: f64,
    pub display_total: f64,
    pub adjustment: PriceAdjustment,
    pub adjustment_label: String,
}

/// Priced recommendation for a stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayQuote {
    pub nights: i64,
    pub entitlement: Entitlement,
    pub base_rate: f64,
    pub base_total: f64,
    pub packages: Vec<QuotedPackage>,
    pub primary: Option<QuotedPackage>,
}

/// Nightly rates attached to individual packages; they take precedence over the stay rate.
pub type PackageRates = HashMap<PackageId, f64>;

/// Recommend packages for the request and price each one.
pub fn quote_stay(
    catalog: &CatalogSnapshot,
    calculator: &RateCalculator,
    request: &QuoteRequest,
    entitlement: Entitlement,
    package_rates: &PackageRates,
) -> StayQuote {
    let nights = request.duration_nights();
    let base_rate = calculator.resolve_base_rate(request.base_rate, request.base_rate_override);

    let recommendation = recommend(
        catalog,
        &RecommendationRequest::new(nights, entitlement, request.include_addons)
            .prefer_hosted(request.prefer_hosted),
    );

    let price = |package: &PackageDefinition| {
        let rate = calculator.resolve_base_rate(Some(base_rate), package_rates.get(&package.id).copied());
        let total = calculator.compute_total(rate, nights, package.multiplier);
        let adjustment = PriceAdjustment::from_multiplier(package.multiplier);
        QuotedPackage {
            package: package.clone(),
            base_rate: rate,
            total,
            display_total: round_for_display(total),
            adjustment,
            adjustment_label: adjustment.label(),
        }
    };

    let packages = recommendation.eligible.iter().map(price).collect();
    let primary = recommendation.primary.as_ref().map(price);

    StayQuote {
        nights,
        entitlement,
        base_rate,
        base_total: calculator.compute_total(base_rate, nights, 1.0),
        packages,
        primary,
    }
}
