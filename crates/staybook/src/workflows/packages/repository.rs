use super::domain::{ListingId, ListingPackage, PackageId};

/// Filter accepted by package listings; `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilter {
    pub listing_id: Option<ListingId>,
    pub enabled: Option<bool>,
}

impl PackageFilter {
    pub fn for_listing(listing_id: ListingId) -> Self {
        Self {
            listing_id: Some(listing_id),
            enabled: None,
        }
    }

    pub fn enabled_only(mut self) -> Self {
        self.enabled = Some(true);
        self
    }

    pub fn matches(&self, package: &ListingPackage) -> bool {
        self.listing_id
            .as_ref()
            .map_or(true, |listing| &package.listing_id == listing)
            && self.enabled.map_or(true, |enabled| package.enabled == enabled)
    }
}

/// Storage abstraction for listing packages. Implementations return packages in insertion order.
pub trait PackageRepository: Send + Sync {
    fn insert(&self, package: ListingPackage) -> Result<ListingPackage, RepositoryError>;
    fn update(&self, package: ListingPackage) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PackageId) -> Result<Option<ListingPackage>, RepositoryError>;
    fn list(&self, filter: &PackageFilter) -> Result<Vec<ListingPackage>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
