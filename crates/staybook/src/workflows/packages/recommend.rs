//! Eligibility filtering and primary package selection over a catalog snapshot.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::catalog::CatalogSnapshot;
use super::domain::{Entitlement, PackageCategory, PackageDefinition};

/// Inputs to a recommendation over an injected catalog snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub duration_nights: i64,
    #[serde(default)]
    pub entitlement: Entitlement,
    #[serde(default)]
    pub include_addons: bool,
    #[serde(default)]
    pub prefer_hosted: bool,
}

impl RecommendationRequest {
    pub fn new(duration_nights: i64, entitlement: Entitlement, include_addons: bool) -> Self {
        Self {
            duration_nights,
            entitlement,
            include_addons,
            prefer_hosted: false,
        }
    }

    pub fn prefer_hosted(mut self, prefer: bool) -> Self {
        self.prefer_hosted = prefer;
        self
    }

    fn nights(&self) -> u32 {
        self.duration_nights.clamp(1, i64::from(u32::MAX)) as u32
    }
}

/// Eligible packages in catalog order plus the primary pick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendation {
    pub eligible: Vec<PackageDefinition>,
    pub primary: Option<PackageDefinition>,
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }
}

/// Filter the catalog for a stay and choose a primary package.
///
/// Eligibility needs the stay window to contain the nights and the entitlement to grant the
/// package tier. Add-ons appear only when requested and never become primary. The primary is
/// the best non-addon by category (standard, hosted, special), then by multiplier closeness to
/// 1.0, then by catalog order; a hosted preference overrides it when a hosted entry is eligible.
pub fn recommend(catalog: &CatalogSnapshot, request: &RecommendationRequest) -> Recommendation {
    let nights = request.nights();

    let eligible: Vec<PackageDefinition> = catalog
        .packages()
        .iter()
        .filter(|package| package.covers(nights))
        .filter(|package| request.entitlement.grants(package.entitlement_required))
        .filter(|package| request.include_addons || !package.is_addon())
        .cloned()
        .collect();

    let hosted = if request.prefer_hosted {
        best_primary(
            eligible
                .iter()
                .filter(|package| package.category == PackageCategory::Hosted),
        )
    } else {
        None
    };

    let primary = hosted.or_else(|| best_primary(eligible.iter())).cloned();

    Recommendation { eligible, primary }
}

/// Convenience form of [`recommend`] without a hosted preference.
pub fn recommend_packages(
    catalog: &CatalogSnapshot,
    duration_nights: i64,
    entitlement: Entitlement,
    include_addons: bool,
) -> (Vec<PackageDefinition>, Option<PackageDefinition>) {
    let request = RecommendationRequest::new(duration_nights, entitlement, include_addons);
    let Recommendation { eligible, primary } = recommend(catalog, &request);
    (eligible, primary)
}

fn best_primary<'a, I>(candidates: I) -> Option<&'a PackageDefinition>
where
    I: Iterator<Item = &'a PackageDefinition>,
{
    // Strict comparison keeps the earliest entry on ties.
    candidates
        .filter_map(|package| package.category.primary_rank().map(|rank| (rank, package)))
        .fold(None, |best: Option<(u8, &PackageDefinition)>, candidate| {
            match best {
                Some(current) if compare_primary(&candidate, &current) != Ordering::Less => {
                    Some(current)
                }
                _ => Some(candidate),
            }
        })
        .map(|(_, package)| package)
}

fn compare_primary(left: &(u8, &PackageDefinition), right: &(u8, &PackageDefinition)) -> Ordering {
    left.0.cmp(&right.0).then_with(|| {
        let left_distance = (left.1.multiplier - 1.0).abs();
        let right_distance = (right.1.multiplier - 1.0).abs();
        left_distance
            .partial_cmp(&right_distance)
            .unwrap_or(Ordering::Equal)
    })
}
