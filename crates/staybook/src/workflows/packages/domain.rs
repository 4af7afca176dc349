use serde::{Deserialize, Serialize};

/// Identifier wrapper for packages offered on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(pub String);

/// Identifier wrapper for the listing (property post) a package belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Identifier wrapper for the guest requesting estimates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

pub const MIN_MULTIPLIER: f64 = 0.1;
pub const MAX_MULTIPLIER: f64 = 3.0;

/// Fixed grouping used for display and for primary recommendation ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PackageCategory {
    #[default]
    Standard,
    Hosted,
    Addon,
    Special,
}

impl PackageCategory {
    pub const fn label(self) -> &'static str {
        match self {
            PackageCategory::Standard => "standard",
            PackageCategory::Hosted => "hosted",
            PackageCategory::Addon => "addon",
            PackageCategory::Special => "special",
        }
    }

    /// Ranking used when choosing a primary recommendation; lower wins.
    /// Add-ons never compete for primary, so they have no rank.
    pub(crate) const fn primary_rank(self) -> Option<u8> {
        match self {
            PackageCategory::Standard => Some(0),
            PackageCategory::Hosted => Some(1),
            PackageCategory::Special => Some(2),
            PackageCategory::Addon => None,
        }
    }
}

/// Subscription tier of a customer, gating access to some packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Entitlement {
    #[default]
    None,
    Standard,
    Pro,
}

impl Entitlement {
    pub const fn label(self) -> &'static str {
        match self {
            Entitlement::None => "none",
            Entitlement::Standard => "standard",
            Entitlement::Pro => "pro",
        }
    }

    /// Whether a customer holding `self` may book a package requiring `required`.
    /// Pro sees everything.
    pub fn grants(self, required: Entitlement) -> bool {
        required == Entitlement::None || required == self || self == Entitlement::Pro
    }
}

impl std::str::FromStr for Entitlement {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Entitlement::None),
            "standard" => Ok(Entitlement::Standard),
            "pro" => Ok(Entitlement::Pro),
            other => Err(format!(
                "unknown entitlement '{other}' (expected none, standard or pro)"
            )),
        }
    }
}

/// Immutable catalog entry describing a pricing rule for a stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDefinition {
    pub id: PackageId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub multiplier: f64,
    pub min_nights: u32,
    pub max_nights: u32,
    #[serde(default)]
    pub category: PackageCategory,
    #[serde(default)]
    pub entitlement_required: Entitlement,
    #[serde(default)]
    pub features: Vec<String>,
}

impl PackageDefinition {
    pub fn covers(&self, nights: u32) -> bool {
        self.min_nights <= nights && nights <= self.max_nights
    }

    pub fn is_addon(&self) -> bool {
        self.category == PackageCategory::Addon
    }

    pub fn validate(&self) -> Result<(), PackageValidationError> {
        if self.title.trim().is_empty() {
            return Err(PackageValidationError::EmptyTitle);
        }
        if !self.multiplier.is_finite()
            || self.multiplier < MIN_MULTIPLIER
            || self.multiplier > MAX_MULTIPLIER
        {
            return Err(PackageValidationError::MultiplierOutOfRange(self.multiplier));
        }
        if self.min_nights < 1 || self.min_nights > self.max_nights {
            return Err(PackageValidationError::InvalidStayWindow {
                min_nights: self.min_nights,
                max_nights: self.max_nights,
            });
        }
        Ok(())
    }
}

/// Where a listing package originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PackageSource {
    #[default]
    Database,
    Billing,
}

/// Package as stored against a listing, including host-managed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPackage {
    pub listing_id: ListingId,
    pub slug: String,
    pub definition: PackageDefinition,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    pub source: PackageSource,
}

impl ListingPackage {
    pub fn id(&self) -> &PackageId {
        &self.definition.id
    }

    /// Host-facing name, falling back to the catalog title.
    pub fn display_name(&self) -> &str {
        match self.custom_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.definition.title,
        }
    }

    pub fn validate(&self) -> Result<(), PackageValidationError> {
        if self.slug.trim().is_empty() {
            return Err(PackageValidationError::EmptySlug);
        }
        if let Some(rate) = self.base_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(PackageValidationError::InvalidBaseRate(rate));
            }
        }
        self.definition.validate()
    }
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_min_nights() -> u32 {
    1
}

fn default_max_nights() -> u32 {
    7
}

fn default_enabled() -> bool {
    true
}

/// Host submission creating a package on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDraft {
    pub listing_id: ListingId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_min_nights")]
    pub min_nights: u32,
    #[serde(default = "default_max_nights")]
    pub max_nights: u32,
    #[serde(default)]
    pub category: PackageCategory,
    #[serde(default)]
    pub entitlement_required: Entitlement,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub base_rate: Option<f64>,
    #[serde(default)]
    pub billing_product_id: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl PackageDraft {
    pub fn into_package(self, id: PackageId) -> ListingPackage {
        ListingPackage {
            listing_id: self.listing_id,
            slug: self.slug.trim().to_string(),
            definition: PackageDefinition {
                id,
                title: self.title.trim().to_string(),
                description: self.description,
                multiplier: self.multiplier,
                min_nights: self.min_nights,
                max_nights: self.max_nights,
                category: self.category,
                entitlement_required: self.entitlement_required,
                features: self.features,
            },
            enabled: self.enabled,
            base_rate: self.base_rate,
            billing_product_id: self.billing_product_id,
            custom_name: None,
            source: PackageSource::Database,
        }
    }
}

/// Partial update applied by hosts; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub multiplier: Option<f64>,
    pub min_nights: Option<u32>,
    pub max_nights: Option<u32>,
    pub category: Option<PackageCategory>,
    pub entitlement_required: Option<Entitlement>,
    pub features: Option<Vec<String>>,
    pub base_rate: Option<f64>,
    pub billing_product_id: Option<String>,
    pub enabled: Option<bool>,
    pub custom_name: Option<String>,
}

impl PackagePatch {
    pub fn apply(self, package: &mut ListingPackage) {
        let definition = &mut package.definition;
        if let Some(title) = self.title {
            definition.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            definition.description = description;
        }
        if let Some(multiplier) = self.multiplier {
            definition.multiplier = multiplier;
        }
        if let Some(min_nights) = self.min_nights {
            definition.min_nights = min_nights;
        }
        if let Some(max_nights) = self.max_nights {
            definition.max_nights = max_nights;
        }
        if let Some(category) = self.category {
            definition.category = category;
        }
        if let Some(entitlement) = self.entitlement_required {
            definition.entitlement_required = entitlement;
        }
        if let Some(features) = self.features {
            definition.features = features;
        }
        if let Some(rate) = self.base_rate {
            package.base_rate = Some(rate);
        }
        if let Some(product) = self.billing_product_id {
            package.billing_product_id = Some(product);
        }
        if let Some(enabled) = self.enabled {
            package.enabled = enabled;
        }
        if let Some(name) = self.custom_name {
            package.custom_name = Some(name);
        }
    }
}

/// One row of the host package dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSetting {
    pub package_id: PackageId,
    pub enabled: bool,
    #[serde(default)]
    pub custom_name: Option<String>,
}

/// Reasons a package cannot be stored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PackageValidationError {
    #[error("package title must not be empty")]
    EmptyTitle,
    #[error("package slug must not be empty")]
    EmptySlug,
    #[error("multiplier {0} must be between 0.1 and 3.0")]
    MultiplierOutOfRange(f64),
    #[error("stay window {min_nights}..={max_nights} nights is invalid")]
    InvalidStayWindow { min_nights: u32, max_nights: u32 },
    #[error("base rate {0} must be a positive amount")]
    InvalidBaseRate(f64),
}
