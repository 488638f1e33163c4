//! Run-time settings
//!
//! Environment variables:
//!   LASTMILE_DATA_PATH       - CSV file to load (default: "Last mile Delivery Data.csv")
//!   LASTMILE_LATE_THRESHOLD  - Minutes after which a delivery is late (default: 120)
//!   LASTMILE_HISTOGRAM_BINS  - Delivery-time histogram buckets (default: 30)

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::aggregate::DEFAULT_HISTOGRAM_BINS;
use crate::late::LATE_THRESHOLD_MINUTES;

pub const DEFAULT_DATA_PATH: &str = "Last mile Delivery Data.csv";

pub const ENV_DATA_PATH: &str = "LASTMILE_DATA_PATH";
pub const ENV_LATE_THRESHOLD: &str = "LASTMILE_LATE_THRESHOLD";
pub const ENV_HISTOGRAM_BINS: &str = "LASTMILE_HISTOGRAM_BINS";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub late_threshold_minutes: f64,
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            late_threshold_minutes: LATE_THRESHOLD_MINUTES,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by whatever `LASTMILE_*` variables are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_LATE_THRESHOLD) {
            config.late_threshold_minutes = parse_var(ENV_LATE_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(ENV_HISTOGRAM_BINS) {
            config.histogram_bins = parse_var(ENV_HISTOGRAM_BINS, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.late_threshold_minutes.is_finite() {
            bail!(
                "late threshold must be a finite number of minutes, got {}",
                self.late_threshold_minutes
            );
        }
        if self.histogram_bins == 0 {
            bail!("histogram needs at least one bin");
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: {value:?}"))
}
