//! Guest stay estimates priced against a listing's packages.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Estimate, EstimateId, EstimateOutcome, EstimateReceipt, EstimateRequest, StayKey};
pub use repository::EstimateRepository;
pub use router::estimate_router;
pub use service::{EstimateService, EstimateServiceError};
