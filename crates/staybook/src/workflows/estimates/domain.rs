use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::packages::{CustomerId, ListingId, LookupStrategy, PackageId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstimateId(pub String);

fn default_guests() -> u32 {
    1
}

/// Guest submission for a priced stay. `package` is a free-form reference resolved through
/// the configured lookup policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub listing_id: ListingId,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub title: Option<String>,
    pub package: String,
    #[serde(default)]
    pub total: Option<f64>,
}

/// Stay identity used to decide between updating and inserting an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StayKey {
    pub listing_id: ListingId,
    pub customer_id: CustomerId,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub id: EstimateId,
    pub title: String,
    pub listing_id: ListingId,
    pub customer_id: CustomerId,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub guests: u32,
    pub package_id: PackageId,
    pub package_title: String,
    pub matched_by: LookupStrategy,
    pub nights: i64,
    pub base_rate: f64,
    pub total: f64,
}

impl Estimate {
    pub fn stay_key(&self) -> StayKey {
        StayKey {
            listing_id: self.listing_id.clone(),
            customer_id: self.customer_id.clone(),
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateOutcome {
    Created,
    Updated,
}

/// Stored estimate together with whether the submission created or replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReceipt {
    pub outcome: EstimateOutcome,
    pub estimate: Estimate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_one_guest_without_dates() {
        let request: EstimateRequest = serde_json::from_value(serde_json::json!({
            "listing_id": "post-9",
            "package": "weekly",
        }))
        .expect("request parses");

        assert_eq!(request.guests, 1);
        assert!(request.from_date.is_none());
        assert!(request.total.is_none());
    }
}
