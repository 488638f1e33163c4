use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::DeliveryRecord;

// ---------------------------------------------------------------------------
// Filter selection: which Area / Vehicle values are selected
// ---------------------------------------------------------------------------

/// Selected values per categorical field.
///
/// An empty set means "no constraint" on that field, not "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub areas: BTreeSet<String>,
    pub vehicles: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<A, V>(areas: A, vehicles: V) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            areas: areas.into_iter().map(Into::into).collect(),
            vehicles: vehicles.into_iter().map(Into::into).collect(),
        }
    }

    /// Everything observed in `table` selected, the session default.
    pub fn all(table: &[DeliveryRecord]) -> Self {
        Self {
            areas: distinct_areas(table),
            vehicles: distinct_vehicles(table),
        }
    }

    pub fn matches(&self, record: &DeliveryRecord) -> bool {
        (self.areas.is_empty() || self.areas.contains(&record.area))
            && (self.vehicles.is_empty() || self.vehicles.contains(&record.vehicle))
    }
}

/// Sorted distinct Area values.
pub fn distinct_areas(table: &[DeliveryRecord]) -> BTreeSet<String> {
    table.iter().map(|r| r.area.clone()).collect()
}

/// Sorted distinct Vehicle values.
pub fn distinct_vehicles(table: &[DeliveryRecord]) -> BTreeSet<String> {
    table.iter().map(|r| r.vehicle.clone()).collect()
}

/// Rows whose Area and Vehicle are both selected, in table order.
pub fn filter(table: &[DeliveryRecord], selection: &FilterSelection) -> Vec<DeliveryRecord> {
    table
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}
