use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use staybook::workflows::estimates::{Estimate, EstimateId, EstimateRepository, StayKey};
use staybook::workflows::packages::{
    ListingPackage, PackageFilter, PackageId, PackageRepository, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Packages kept in insertion order so listing catalogs stay stable between calls.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPackageRepository {
    records: Arc<Mutex<Vec<ListingPackage>>>,
}

impl PackageRepository for InMemoryPackageRepository {
    fn insert(&self, package: ListingPackage) -> Result<ListingPackage, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id() == package.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(package.clone());
        Ok(package)
    }

    fn update(&self, package: ListingPackage) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id() == package.id()) {
            Some(slot) => {
                *slot = package;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &PackageId) -> Result<Option<ListingPackage>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|package| package.id() == id).cloned())
    }

    fn list(&self, filter: &PackageFilter) -> Result<Vec<ListingPackage>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|package| filter.matches(package))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEstimateRepository {
    records: Arc<Mutex<HashMap<EstimateId, Estimate>>>,
}

impl EstimateRepository for InMemoryEstimateRepository {
    fn insert(&self, estimate: Estimate) -> Result<Estimate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&estimate.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(estimate.id.clone(), estimate.clone());
        Ok(estimate)
    }

    fn update(&self, estimate: Estimate) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&estimate.id) {
            guard.insert(estimate.id.clone(), estimate);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &EstimateId) -> Result<Option<Estimate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_for_stay(&self, key: &StayKey) -> Result<Option<Estimate>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|estimate| &estimate.stay_key() == key)
            .cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
