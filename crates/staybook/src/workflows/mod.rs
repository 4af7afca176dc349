pub mod estimates;
pub mod packages;
