//! Last Mile Delivery Performance report
//!
//! Loads the delivery CSV, applies the Area/Vehicle filters and prints
//! the headline metrics, the five charts as text and the first rows of
//! the filtered table.
//!
//! Usage:
//!   ./target/release/last_mile_dashboard [OPTIONS]
//!
//! Examples:
//!   last_mile_dashboard --area "Urban " --area "Metropolitian "
//!   last_mile_dashboard --vehicle van --json
//!   last_mile_dashboard --export filtered.csv

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use last_mile_dashboard::{
    aggregate::Dashboard,
    config::DashboardConfig,
    dataset::Dataset,
    filter::FilterSelection,
    loader::{write_records, TableCache},
    report::{render, ReportOptions},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "last_mile_dashboard")]
#[command(about = "Analyze delivery times, agent performance and operational efficiency")]
struct Args {
    /// CSV file to load (overrides LASTMILE_DATA_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Area to include; repeat for several. Omit to include every area
    #[arg(long = "area")]
    areas: Vec<String>,

    /// Vehicle to include; repeat for several. Omit to include every vehicle
    #[arg(long = "vehicle")]
    vehicles: Vec<String>,

    /// Minutes after which a delivery counts as late
    #[arg(long)]
    late_threshold: Option<f64>,

    /// Delivery-time histogram buckets
    #[arg(long)]
    bins: Option<usize>,

    /// Rows of the filtered table to print
    #[arg(long, default_value = "10")]
    rows: usize,

    /// Print the dashboard as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the filtered rows to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = DashboardConfig::from_env()?;
    if let Some(path) = args.data {
        config.data_path = path;
    }
    if let Some(threshold) = args.late_threshold {
        config.late_threshold_minutes = threshold;
    }
    if let Some(bins) = args.bins {
        config.histogram_bins = bins;
    }
    config.validate()?;

    let tables = TableCache::new(config.data_path.clone());
    let raw = tables.load()?;
    let dataset = Dataset::build(&raw, config.late_threshold_minutes);

    let selection = FilterSelection::new(args.areas, args.vehicles);
    let rows = dataset.filtered(&selection);
    let dashboard = Dashboard::compute(&rows, config.histogram_bins);
    info!("{} of {} deliveries selected", rows.len(), dataset.len());

    if let Some(path) = &args.export {
        write_records(path, &rows).with_context(|| format!("writing {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        let options = ReportOptions {
            late_threshold_minutes: config.late_threshold_minutes,
            raw_rows: args.rows,
        };
        print!("{}", render(&dashboard, &rows, &options)?);
    }

    Ok(())
}
