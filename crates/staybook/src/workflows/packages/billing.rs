use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    CustomerId, Entitlement, ListingId, ListingPackage, PackageCategory, PackageDefinition,
    PackageId, PackageSource,
};
use super::entitlement::SubscriptionStatus;
use super::pricing::NEUTRAL_MULTIPLIER;

/// Billing period of a provider product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl BillingPeriod {
    /// Nights covered by `count` periods; sub-day periods count as one night.
    pub fn nights(self, count: u32) -> u32 {
        let count = count.max(1);
        match self {
            BillingPeriod::Hour => 1,
            BillingPeriod::Day => count,
            BillingPeriod::Week => count.saturating_mul(7),
            BillingPeriod::Month => count.saturating_mul(30),
            BillingPeriod::Year => count.saturating_mul(365),
        }
    }
}

/// Product offered through the billing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingProduct {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub period: BillingPeriod,
    pub period_count: u32,
    pub category: PackageCategory,
    pub features: Vec<String>,
    pub enabled: bool,
}

impl BillingProduct {
    /// Present a provider product as a package on a listing, priced at the product price.
    pub fn to_listing_package(&self, listing_id: &ListingId) -> ListingPackage {
        let nights = self.period.nights(self.period_count);
        ListingPackage {
            listing_id: listing_id.clone(),
            slug: self.id.clone(),
            definition: PackageDefinition {
                id: PackageId(self.id.clone()),
                title: self.title.clone(),
                description: self.description.clone(),
                multiplier: NEUTRAL_MULTIPLIER,
                min_nights: nights,
                max_nights: nights,
                category: self.category,
                entitlement_required: Entitlement::None,
                features: self.features.clone(),
            },
            enabled: self.enabled,
            base_rate: Some(self.price),
            billing_product_id: Some(self.id.clone()),
            custom_name: None,
            source: PackageSource::Billing,
        }
    }
}

/// Outbound boundary to the subscription/billing provider.
pub trait BillingCatalog: Send + Sync {
    fn products(&self) -> Result<Vec<BillingProduct>, BillingError>;
    fn customer_status(&self, customer: &CustomerId) -> Result<SubscriptionStatus, BillingError>;
}

/// Billing provider failure.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("billing provider unavailable: {0}")]
    Unavailable(String),
}

/// Provider stand-in returning a fixed product list and empty customer records.
#[derive(Debug, Clone, Default)]
pub struct MockBillingCatalog {
    products: Vec<BillingProduct>,
}

impl MockBillingCatalog {
    pub fn new(api_key: Option<&str>) -> Self {
        match api_key {
            Some(key) if !key.trim().is_empty() => {
                warn!("billing SDK not wired up, serving mock products")
            }
            _ => warn!("billing API key not configured, serving mock products"),
        }

        Self {
            products: mock_products(),
        }
    }

    pub fn with_products(products: Vec<BillingProduct>) -> Self {
        Self { products }
    }
}

impl BillingCatalog for MockBillingCatalog {
    fn products(&self) -> Result<Vec<BillingProduct>, BillingError> {
        Ok(self.products.clone())
    }

    fn customer_status(&self, _customer: &CustomerId) -> Result<SubscriptionStatus, BillingError> {
        Ok(SubscriptionStatus::default())
    }
}

fn product(
    id: &str,
    title: &str,
    description: &str,
    price: f64,
    period: (BillingPeriod, u32),
    category: PackageCategory,
    features: &[&str],
) -> BillingProduct {
    BillingProduct {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price,
        currency: "USD".to_string(),
        period: period.0,
        period_count: period.1,
        category,
        features: features.iter().map(|feature| feature.to_string()).collect(),
        enabled: true,
    }
}

fn mock_products() -> Vec<BillingProduct> {
    vec![
        product(
            "week_x2_customer",
            "2 Week Package",
            "Two-week customer package",
            299.99,
            (BillingPeriod::Week, 2),
            PackageCategory::Standard,
            &["Standard accommodation", "Basic amenities"],
        ),
        product(
            "week_x3_customer",
            "3 Week Package",
            "Three-week customer package",
            399.99,
            (BillingPeriod::Week, 3),
            PackageCategory::Standard,
            &[
                "Standard accommodation",
                "Basic amenities",
                "Extended stay discount",
            ],
        ),
        product(
            "week_x4_customer",
            "4 Week Package",
            "Four-week customer package",
            499.99,
            (BillingPeriod::Week, 4),
            PackageCategory::Standard,
            &[
                "Standard accommodation",
                "Basic amenities",
                "Monthly discount",
                "Priority booking",
            ],
        ),
        product(
            "per_hour",
            "Per Hour Service",
            "Hourly service rate",
            25.0,
            (BillingPeriod::Hour, 1),
            PackageCategory::Standard,
            &["Flexible booking", "Hourly pricing"],
        ),
        product(
            "per_hour_luxury",
            "Luxury Per Hour Service",
            "Premium hourly service rate",
            50.0,
            (BillingPeriod::Hour, 1),
            PackageCategory::Hosted,
            &["Premium service", "Enhanced amenities", "Dedicated support"],
        ),
    ]
}
