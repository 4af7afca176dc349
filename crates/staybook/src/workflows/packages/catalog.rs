use std::io::Read;

use serde::{Deserialize, Serialize};

use super::domain::{
    Entitlement, PackageCategory, PackageDefinition, PackageId, PackageValidationError,
};

/// Read-only, ordered set of package definitions handed to the recommender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogSnapshot {
    packages: Vec<PackageDefinition>,
}

impl CatalogSnapshot {
    pub fn new(packages: Vec<PackageDefinition>) -> Self {
        Self { packages }
    }

    /// Built-in catalog offered when a caller does not scope the request to a listing.
    pub fn standard() -> Self {
        Self::new(standard_packages())
    }

    /// Parse a JSON array of package definitions, validating every entry.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let packages: Vec<PackageDefinition> = serde_json::from_reader(reader)?;
        Self::validated(packages)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let packages: Vec<PackageDefinition> = serde_json::from_str(raw)?;
        Self::validated(packages)
    }

    fn validated(packages: Vec<PackageDefinition>) -> Result<Self, CatalogError> {
        for package in &packages {
            package
                .validate()
                .map_err(|source| CatalogError::InvalidPackage {
                    id: package.id.0.clone(),
                    source,
                })?;
        }
        Ok(Self::new(packages))
    }

    pub fn packages(&self) -> &[PackageDefinition] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn get(&self, id: &PackageId) -> Option<&PackageDefinition> {
        self.packages.iter().find(|package| &package.id == id)
    }
}

impl FromIterator<PackageDefinition> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = PackageDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Failure to load a catalog from an external document.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog entry '{id}' is invalid: {source}")]
    InvalidPackage {
        id: String,
        #[source]
        source: PackageValidationError,
    },
}

#[allow(clippy::too_many_arguments)]
fn package(
    id: &str,
    title: &str,
    description: &str,
    multiplier: f64,
    nights: (u32, u32),
    category: PackageCategory,
    entitlement_required: Entitlement,
    features: &[&str],
) -> PackageDefinition {
    PackageDefinition {
        id: PackageId(id.to_string()),
        title: title.to_string(),
        description: description.to_string(),
        multiplier,
        min_nights: nights.0,
        max_nights: nights.1,
        category,
        entitlement_required,
        features: features.iter().map(|feature| feature.to_string()).collect(),
    }
}

fn standard_packages() -> Vec<PackageDefinition> {
    vec![
        package(
            "per_night",
            "Per Night",
            "Flexible nightly stay at the listed rate.",
            1.0,
            (1, 6),
            PackageCategory::Standard,
            Entitlement::None,
            &["Standard accommodation", "Basic amenities"],
        ),
        package(
            "weekly",
            "Weekly Stay",
            "Seven nights or more with a weekly discount.",
            0.9,
            (7, 13),
            PackageCategory::Standard,
            Entitlement::None,
            &["Standard accommodation", "Basic amenities", "Weekly discount"],
        ),
        package(
            "two_week",
            "2 Week Package",
            "Two-week member package.",
            0.85,
            (14, 20),
            PackageCategory::Standard,
            Entitlement::Standard,
            &["Standard accommodation", "Extended stay discount"],
        ),
        package(
            "monthly",
            "Monthly Package",
            "Three weeks and longer for members.",
            0.75,
            (21, 90),
            PackageCategory::Standard,
            Entitlement::Standard,
            &["Standard accommodation", "Monthly discount", "Priority booking"],
        ),
        package(
            "hosted",
            "Hosted Experience",
            "Stay with a dedicated host and premium service.",
            1.5,
            (1, 30),
            PackageCategory::Hosted,
            Entitlement::Pro,
            &["Premium service", "Enhanced amenities", "Dedicated support"],
        ),
        package(
            "special_event",
            "Special Occasion",
            "Celebration setup for short stays.",
            1.25,
            (1, 7),
            PackageCategory::Special,
            Entitlement::None,
            &["Decorations", "Late checkout"],
        ),
        package(
            "wine",
            "Wine Tasting Add-on",
            "Guided tasting with a local vineyard.",
            1.1,
            (1, 90),
            PackageCategory::Addon,
            Entitlement::None,
            &["Guided tasting", "Two bottles to take home"],
        ),
    ]
}
