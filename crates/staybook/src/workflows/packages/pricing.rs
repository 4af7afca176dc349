//! Stay total arithmetic.
//!
//! Inputs are coerced rather than rejected: callers always receive a price.

use chrono::NaiveDate;
use serde::Serialize;

/// Nightly rate used when neither the listing nor the package carries a usable one.
pub const DEFAULT_BASE_RATE: f64 = 150.0;

/// Multiplier applied when a package carries no usable multiplier.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Rate calculator carrying the fallback nightly rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCalculator {
    default_base_rate: f64,
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self {
            default_base_rate: DEFAULT_BASE_RATE,
        }
    }
}

impl RateCalculator {
    /// Build a calculator with a custom fallback rate. Unusable fallbacks keep the stock default.
    pub fn new(default_base_rate: f64) -> Self {
        if is_usable_amount(default_base_rate) {
            Self { default_base_rate }
        } else {
            Self::default()
        }
    }

    pub fn default_base_rate(&self) -> f64 {
        self.default_base_rate
    }

    /// `base_rate * nights * multiplier` at full precision.
    pub fn compute_total(&self, base_rate: f64, duration_nights: i64, multiplier: f64) -> f64 {
        let base_rate = if is_usable_amount(base_rate) {
            base_rate
        } else {
            self.default_base_rate
        };
        let nights = duration_nights.max(1) as f64;
        let multiplier = if is_usable_amount(multiplier) {
            multiplier
        } else {
            NEUTRAL_MULTIPLIER
        };

        base_rate * nights * multiplier
    }

    /// Pick the nightly rate: a positive override wins, then a positive base, then the fallback.
    pub fn resolve_base_rate(&self, base_rate: Option<f64>, override_rate: Option<f64>) -> f64 {
        override_rate
            .filter(|rate| is_usable_amount(*rate))
            .or_else(|| base_rate.filter(|rate| is_usable_amount(*rate)))
            .unwrap_or(self.default_base_rate)
    }
}

/// Total for a stay using the stock fallback rate.
pub fn compute_total(base_rate: f64, duration_nights: i64, multiplier: f64) -> f64 {
    RateCalculator::default().compute_total(base_rate, duration_nights, multiplier)
}

/// Round to cents for presentation. Stored totals keep full precision.
pub fn round_for_display(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Nights between two dates, never less than one.
pub fn stay_nights(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(1)
}

/// Nights for an optional date range; a missing endpoint counts as a single night.
pub fn stay_nights_between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> i64 {
    match (from, to) {
        (Some(from), Some(to)) => stay_nights(from, to),
        _ => 1,
    }
}

fn is_usable_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Relative change a package multiplier applies to the base total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum PriceAdjustment {
    Base,
    Premium(u32),
    Discount(u32),
}

impl PriceAdjustment {
    pub fn from_multiplier(multiplier: f64) -> Self {
        let percent = ((multiplier - 1.0).abs() * 100.0).round() as u32;
        if percent == 0 {
            PriceAdjustment::Base
        } else if multiplier > 1.0 {
            PriceAdjustment::Premium(percent)
        } else {
            PriceAdjustment::Discount(percent)
        }
    }

    pub fn label(self) -> String {
        match self {
            PriceAdjustment::Base => "base rate".to_string(),
            PriceAdjustment::Premium(percent) => format!("+{percent}%"),
            PriceAdjustment::Discount(percent) => format!("-{percent}%"),
        }
    }
}
