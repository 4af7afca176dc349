use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Entitlement;

/// Entitlement grant reported by the billing provider for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEntitlement {
    pub identifier: String,
    pub product_identifier: String,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub expires_date: Option<DateTime<Utc>>,
}

impl ActiveEntitlement {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_date.map_or(true, |expires| expires > now)
    }
}

/// Subscription snapshot for a customer as returned by the billing provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    #[serde(default)]
    pub entitlements: Vec<ActiveEntitlement>,
    #[serde(default)]
    pub active_subscriptions: Vec<String>,
}

impl SubscriptionStatus {
    /// Collapse the billing snapshot into a tier. Expired grants are ignored; any live
    /// identifier mentioning "pro" yields Pro, any other live grant or subscription yields
    /// Standard.
    pub fn entitlement(&self, now: DateTime<Utc>) -> Entitlement {
        let live: Vec<&str> = self
            .entitlements
            .iter()
            .filter(|grant| grant.is_active(now))
            .flat_map(|grant| [grant.identifier.as_str(), grant.product_identifier.as_str()])
            .chain(self.active_subscriptions.iter().map(String::as_str))
            .collect();

        if live.iter().any(|identifier| mentions_pro(identifier)) {
            Entitlement::Pro
        } else if live.is_empty() {
            Entitlement::None
        } else {
            Entitlement::Standard
        }
    }
}

fn mentions_pro(identifier: &str) -> bool {
    identifier
        .to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == "pro")
}
