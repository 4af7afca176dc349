use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::ListingPackage;

/// Named way of resolving a client package reference against a listing's packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    ById,
    ByName,
    FirstEnabled,
}

impl LookupStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            LookupStrategy::ById => "id",
            LookupStrategy::ByName => "name",
            LookupStrategy::FirstEnabled => "first_enabled",
        }
    }

    fn find<'a>(self, packages: &'a [ListingPackage], key: &str) -> Option<&'a ListingPackage> {
        let key = key.trim();
        let mut enabled = packages.iter().filter(|package| package.enabled);
        match self {
            LookupStrategy::ById => enabled.find(|package| package.id().0 == key),
            LookupStrategy::ByName => enabled.find(|package| {
                package.definition.title.eq_ignore_ascii_case(key)
                    || package.slug.eq_ignore_ascii_case(key)
                    || package
                        .custom_name
                        .as_deref()
                        .is_some_and(|name| name.trim().eq_ignore_ascii_case(key))
            }),
            LookupStrategy::FirstEnabled => enabled.next(),
        }
    }
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LookupStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" | "by_id" => Ok(LookupStrategy::ById),
            "name" | "by_name" => Ok(LookupStrategy::ByName),
            "first_enabled" | "first" => Ok(LookupStrategy::FirstEnabled),
            other => Err(format!("unknown package lookup strategy '{other}'")),
        }
    }
}

/// Package resolved by a lookup, tagged with the strategy that found it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageMatch {
    pub strategy: LookupStrategy,
    pub package: ListingPackage,
}

/// Ordered list of strategies; the first strategy to match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPolicy {
    strategies: Vec<LookupStrategy>,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            strategies: vec![
                LookupStrategy::ById,
                LookupStrategy::ByName,
                LookupStrategy::FirstEnabled,
            ],
        }
    }
}

impl LookupPolicy {
    /// Build a policy, dropping repeated strategies while keeping first-seen order.
    pub fn new(strategies: impl IntoIterator<Item = LookupStrategy>) -> Self {
        let mut ordered = Vec::new();
        for strategy in strategies {
            if !ordered.contains(&strategy) {
                ordered.push(strategy);
            }
        }
        Self {
            strategies: ordered,
        }
    }

    /// Parse a comma separated list such as `id,name,first_enabled`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let strategies = raw
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<LookupStrategy>, String>>()?;
        if strategies.is_empty() {
            return Err("package lookup policy must name at least one strategy".to_string());
        }
        Ok(Self::new(strategies))
    }

    pub fn strategies(&self) -> &[LookupStrategy] {
        &self.strategies
    }

    /// Resolve `key` against enabled packages.
    pub fn resolve(&self, packages: &[ListingPackage], key: &str) -> Option<PackageMatch> {
        self.strategies.iter().find_map(|strategy| {
            strategy.find(packages, key).map(|package| PackageMatch {
                strategy: *strategy,
                package: package.clone(),
            })
        })
    }
}
