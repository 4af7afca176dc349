use super::domain::{Estimate, EstimateId, StayKey};
use crate::workflows::packages::RepositoryError;

/// Storage abstraction for stay estimates.
pub trait EstimateRepository: Send + Sync {
    fn insert(&self, estimate: Estimate) -> Result<Estimate, RepositoryError>;
    fn update(&self, estimate: Estimate) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EstimateId) -> Result<Option<Estimate>, RepositoryError>;
    fn find_for_stay(&self, key: &StayKey) -> Result<Option<Estimate>, RepositoryError>;
}
