//! Shared state behind the REST handlers
//!
//! The cleaned dataset is built once and shared; every request filters
//! and aggregates from scratch on top of it.

use std::io;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::aggregate::Dashboard;
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::FilterSelection;
use crate::loader::{LoadError, TableCache};
use crate::models::DeliveryRecord;

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub areas: Vec<String>,
    pub vehicles: Vec<String>,
    pub late_threshold_minutes: f64,
    pub total_records: usize,
}

pub struct DashboardService {
    tables: Arc<TableCache>,
    late_threshold_minutes: f64,
    histogram_bins: usize,
    cached_dataset: Arc<RwLock<Option<Arc<Dataset>>>>,
}

impl DashboardService {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            tables: Arc::new(TableCache::new(config.data_path.clone())),
            late_threshold_minutes: config.late_threshold_minutes,
            histogram_bins: config.histogram_bins,
            cached_dataset: Arc::new(RwLock::new(None)),
        }
    }

    pub fn histogram_bins(&self) -> usize {
        self.histogram_bins
    }

    pub fn late_threshold_minutes(&self) -> f64 {
        self.late_threshold_minutes
    }

    pub async fn dataset(&self) -> Result<Arc<Dataset>, LoadError> {
        // Check cache first
        {
            let cache = self.cached_dataset.read().await;
            if let Some(dataset) = cache.as_ref() {
                debug!("Dataset served from cache");
                return Ok(Arc::clone(dataset));
            }
        }

        let mut cache = self.cached_dataset.write().await;
        if let Some(dataset) = cache.as_ref() {
            return Ok(Arc::clone(dataset));
        }
        // File read and cleaning run on the blocking pool, not a runtime worker
        let tables = Arc::clone(&self.tables);
        let threshold = self.late_threshold_minutes;
        let dataset = tokio::task::spawn_blocking(move || {
            tables.load().map(|raw| Dataset::build(&raw, threshold))
        })
        .await
        .map_err(|e| LoadError::Io {
            path: self.tables.path().to_path_buf(),
            source: io::Error::other(e),
        })??;
        let dataset = Arc::new(dataset);
        info!(
            "Dataset ready: {} rows, {} areas, {} vehicles",
            dataset.len(),
            dataset.areas().len(),
            dataset.vehicles().len()
        );
        *cache = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Forget the loaded table so the next request reads the file again.
    pub async fn reload(&self) {
        let mut cache = self.cached_dataset.write().await;
        *cache = None;
        self.tables.invalidate();
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, LoadError> {
        let dataset = self.dataset().await?;
        Ok(FilterOptions {
            areas: dataset.areas().iter().cloned().collect(),
            vehicles: dataset.vehicles().iter().cloned().collect(),
            late_threshold_minutes: dataset.late_threshold_minutes(),
            total_records: dataset.len(),
        })
    }

    pub async fn filtered(&self, selection: &FilterSelection) -> Result<Vec<DeliveryRecord>, LoadError> {
        Ok(self.dataset().await?.filtered(selection))
    }

    pub async fn dashboard(
        &self,
        selection: &FilterSelection,
        histogram_bins: Option<usize>,
    ) -> Result<Dashboard, LoadError> {
        let bins = histogram_bins.unwrap_or(self.histogram_bins);
        Ok(self.dataset().await?.dashboard(selection, bins))
    }
}
