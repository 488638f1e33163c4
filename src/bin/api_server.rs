//! REST API server for the last mile delivery dashboard
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --port PORT       Port to listen on (default: 8080)
//!   --data PATH       CSV file to serve (default: LASTMILE_DATA_PATH or
//!                     "Last mile Delivery Data.csv")
//!   --late-threshold  Minutes after which a delivery is late
//!   --bins N          Default histogram buckets
//!
//! See `last_mile_dashboard::api` for the endpoint list.

use anyhow::Result;
use clap::Parser;
use last_mile_dashboard::api::{router, DashboardService};
use last_mile_dashboard::config::DashboardConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "REST API for the last mile delivery dashboard")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// CSV file to serve
    #[arg(long)]
    data: Option<PathBuf>,

    /// Minutes after which a delivery counts as late
    #[arg(long)]
    late_threshold: Option<f64>,

    /// Default histogram buckets
    #[arg(long)]
    bins: Option<usize>,
}

fn print_banner(port: u16, config: &DashboardConfig) {
    println!("============================================================");
    println!("         LAST MILE DELIVERY DASHBOARD API");
    println!("============================================================");
    println!();
    println!("  Port:       {}", port);
    println!("  REST:       http://localhost:{}/api/v1/", port);
    println!("  Data:       {}", config.data_path.display());
    println!("  Late after: {} min", config.late_threshold_minutes);
    println!();
    println!("REST Endpoints:");
    println!("  GET  /api/v1/health              Health check");
    println!("  GET  /api/v1/filters             Areas and vehicles");
    println!("  GET  /api/v1/dashboard           Summary + all charts");
    println!("  GET  /api/v1/summary             Headline metrics");
    println!("  GET  /api/v1/charts/weather      Time by weather");
    println!("  GET  /api/v1/charts/category     Orders by category");
    println!("  GET  /api/v1/charts/histogram    Time distribution");
    println!("  GET  /api/v1/charts/age-rating   Age vs rating");
    println!("  GET  /api/v1/charts/stores       Store locations");
    println!("  GET  /api/v1/records             Filtered rows");
    println!("  POST /api/v1/reload              Re-read the CSV");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
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

    print_banner(args.port, &config);

    let service = Arc::new(DashboardService::new(&config));

    // Warm the cache; a failed load is retried by the next request
    if let Err(e) = service.dataset().await {
        tracing::warn!("{}", e);
    }

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    let app = router(service);
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
