//! The cleaned, labelled table built once per load
//!
//! ```text
//!   raw table ──clean──▶ complete rows ──derive_late──▶ Dataset
//!                                                        │
//!                          FilterSelection ──filter──────┤ per interaction
//!                                                        ▼
//!                                                    Dashboard
//! ```

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::aggregate::Dashboard;
use crate::cleaning::clean;
use crate::filter::{distinct_areas, distinct_vehicles, filter, FilterSelection};
use crate::late::derive_late;
use crate::models::{DeliveryRecord, RawRecord};

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<DeliveryRecord>,
    areas: BTreeSet<String>,
    vehicles: BTreeSet<String>,
    late_threshold_minutes: f64,
}

impl Dataset {
    pub fn build(raw: &[RawRecord], late_threshold_minutes: f64) -> Self {
        Self::from_records(derive_late(clean(raw), late_threshold_minutes), late_threshold_minutes)
    }

    pub fn from_records(records: Vec<DeliveryRecord>, late_threshold_minutes: f64) -> Self {
        Self {
            areas: distinct_areas(&records),
            vehicles: distinct_vehicles(&records),
            records,
            late_threshold_minutes,
        }
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }

    pub fn areas(&self) -> &BTreeSet<String> {
        &self.areas
    }

    pub fn vehicles(&self) -> &BTreeSet<String> {
        &self.vehicles
    }

    pub fn late_threshold_minutes(&self) -> f64 {
        self.late_threshold_minutes
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every observed Area and Vehicle selected.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::all(&self.records)
    }

    /// Selected values that never occur in the data.
    pub fn unknown_values<'a>(&self, selection: &'a FilterSelection) -> Vec<&'a str> {
        let areas = selection.areas.iter().filter(|a| !self.areas.contains(*a));
        let vehicles = selection.vehicles.iter().filter(|v| !self.vehicles.contains(*v));
        areas.chain(vehicles).map(String::as_str).collect()
    }

    pub fn filtered(&self, selection: &FilterSelection) -> Vec<DeliveryRecord> {
        let unknown = self.unknown_values(selection);
        if !unknown.is_empty() {
            warn!("Filter values not present in the data: {:?}", unknown);
        }
        let rows = filter(&self.records, selection);
        debug!("Filter kept {} of {} rows", rows.len(), self.records.len());
        rows
    }

    pub fn dashboard(&self, selection: &FilterSelection, histogram_bins: usize) -> Dashboard {
        Dashboard::compute(&self.filtered(selection), histogram_bins)
    }
}
