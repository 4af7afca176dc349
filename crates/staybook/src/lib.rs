//! Short-stay booking core: listing packages, stay pricing, recommendations, and estimates.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
