//! Sample data generator for the last mile delivery dashboard
//!
//! Writes a CSV shaped like the real delivery export (same columns,
//! same category spellings including their trailing spaces) with a
//! controlled share of dirty cells for the cleaner to deal with.
//!
//! Usage:
//!   cargo run --release --bin generate_sample -- [OPTIONS]
//!
//! Options:
//!   --rows <N>       Number of deliveries (default: 5000)
//!   --noise <F>      Share of rows with one dirty cell (default: 0.05)
//!   --seed <N>       Random seed for reproducibility (optional)
//!   --output <PATH>  Output CSV path (default: "Last mile Delivery Data.csv")

use anyhow::{Context, Result};
use clap::Parser;
use csv::WriterBuilder;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
#[command(about = "Generate a synthetic last mile delivery dataset")]
struct Args {
    /// Number of deliveries to generate
    #[arg(long, default_value = "5000")]
    rows: usize,

    /// Share of rows (0.0 - 1.0) that get one missing or unparsable cell
    #[arg(long, default_value = "0.05")]
    noise: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "Last mile Delivery Data.csv")]
    output: PathBuf,
}

/// One output row, in the column order of the source export
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Order_ID")]
    order_id: String,
    #[serde(rename = "Agent_Age")]
    agent_age: Option<String>,
    #[serde(rename = "Agent_Rating")]
    agent_rating: Option<String>,
    #[serde(rename = "Store_Latitude")]
    store_latitude: Option<String>,
    #[serde(rename = "Store_Longitude")]
    store_longitude: Option<String>,
    #[serde(rename = "Drop_Latitude")]
    drop_latitude: String,
    #[serde(rename = "Drop_Longitude")]
    drop_longitude: String,
    #[serde(rename = "Order_Date")]
    order_date: String,
    #[serde(rename = "Order_Time")]
    order_time: String,
    #[serde(rename = "Pickup_Time")]
    pickup_time: String,
    #[serde(rename = "Weather")]
    weather: Option<String>,
    #[serde(rename = "Traffic")]
    traffic: Option<String>,
    #[serde(rename = "Vehicle")]
    vehicle: String,
    #[serde(rename = "Area")]
    area: String,
    #[serde(rename = "Delivery_Time")]
    delivery_time: String,
    #[serde(rename = "Category")]
    category: Option<String>,
}

/// (weather, extra minutes)
const WEATHER: [(&str, f64); 6] = [
    ("Sunny", -10.0),
    ("Cloudy", 10.0),
    ("Fog", 12.0),
    ("Windy", 0.0),
    ("Stormy", 5.0),
    ("Sandstorms", 3.0),
];

/// (traffic, base minutes)
const TRAFFIC: [(&str, f64); 4] = [
    ("Low ", 80.0),
    ("Medium ", 125.0),
    ("High ", 120.0),
    ("Jam ", 145.0),
];

/// (vehicle, extra minutes)
const VEHICLES: [(&str, f64); 3] = [("motorcycle ", 8.0), ("scooter ", -5.0), ("van", -4.0)];

const AREAS: [&str; 4] = ["Metropolitian ", "Urban ", "Semi-Urban ", "Other"];

const CATEGORIES: [&str; 16] = [
    "Apparel", "Books", "Clothing", "Cosmetics", "Electronics", "Grocery", "Home", "Jewelry",
    "Kitchen", "Outdoors", "Pet Supplies", "Shoes", "Skincare", "Snacks", "Sports", "Toys",
];

/// Store clusters around a handful of city centres
const CITIES: [(f64, f64); 6] = [
    (12.97, 77.59),
    (19.08, 72.88),
    (13.08, 80.27),
    (17.39, 78.49),
    (22.57, 88.36),
    (26.91, 75.79),
];

fn generate_order_id(rng: &mut impl Rng) -> String {
    let prefix: String = (0..4).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
    format!("{}{:09}", prefix, rng.gen_range(0..1_000_000_000u64))
}

fn clock(minutes: u32) -> String {
    let minutes = minutes % (24 * 60);
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

fn generate_row(rng: &mut impl Rng) -> SampleRow {
    let (weather, weather_delay) = *WEATHER.choose(rng).unwrap_or(&WEATHER[0]);
    let (traffic, traffic_base) = *TRAFFIC.choose(rng).unwrap_or(&TRAFFIC[0]);
    let (vehicle, vehicle_delay) = *VEHICLES.choose(rng).unwrap_or(&VEHICLES[0]);
    let area = *AREAS.choose(rng).unwrap_or(&AREAS[0]);
    let category = *CATEGORIES.choose(rng).unwrap_or(&CATEGORIES[0]);
    let (city_lat, city_lon) = *CITIES.choose(rng).unwrap_or(&CITIES[0]);

    // Sum of uniforms: roughly bell-shaped jitter
    let jitter: f64 = (0..4).map(|_| rng.gen_range(-15.0..15.0)).sum();
    let minutes = (traffic_base + weather_delay + vehicle_delay + jitter).clamp(10.0, 270.0);

    let store_lat = city_lat + rng.gen_range(-0.15..0.15);
    let store_lon = city_lon + rng.gen_range(-0.15..0.15);
    let order_minute = rng.gen_range(8 * 60..23 * 60);

    SampleRow {
        order_id: generate_order_id(rng),
        agent_age: Some(rng.gen_range(20..=39).to_string()),
        agent_rating: Some(format!("{:.1}", rng.gen_range(2.5..=5.0))),
        store_latitude: Some(format!("{:.6}", store_lat)),
        store_longitude: Some(format!("{:.6}", store_lon)),
        drop_latitude: format!("{:.6}", store_lat + rng.gen_range(-0.1..0.1)),
        drop_longitude: format!("{:.6}", store_lon + rng.gen_range(-0.1..0.1)),
        order_date: format!("2022-{:02}-{:02}", rng.gen_range(2..=4), rng.gen_range(1..=28)),
        order_time: clock(order_minute),
        pickup_time: clock(order_minute + [5, 10, 15].choose(rng).copied().unwrap_or(10)),
        weather: Some(weather.to_string()),
        traffic: Some(traffic.to_string()),
        vehicle: vehicle.to_string(),
        area: area.to_string(),
        delivery_time: format!("{:.0}", minutes),
        category: Some(category.to_string()),
    }
}

/// Break exactly one cell the way real exports tend to be broken
fn dirty(row: &mut SampleRow, rng: &mut impl Rng) {
    match rng.gen_range(0..7) {
        0 => row.delivery_time = "N/A".to_string(),
        1 => row.weather = None,
        2 => row.traffic = Some("NaN".to_string()),
        3 => row.agent_rating = None,
        4 => row.agent_age = Some("unknown".to_string()),
        5 => {
            row.store_latitude = None;
            row.store_longitude = None;
        }
        _ => row.category = None,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Last Mile Delivery Sample Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Output:           {}", args.output.display());
    println!("Rows:             {}", args.rows);
    println!("Noise:            {:.1}%", args.noise * 100.0);
    if let Some(seed) = args.seed {
        println!("Random seed:      {}", seed);
    }
    println!();

    let noise = if args.noise.is_finite() { args.noise.clamp(0.0, 1.0) } else { 0.0 };
    let mut rng: StdRng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut dirty_rows = 0;
    for i in 0..args.rows {
        let mut row = generate_row(&mut rng);
        if rng.gen_bool(noise) {
            dirty(&mut row, &mut rng);
            dirty_rows += 1;
        }
        writer.serialize(&row)?;

        if (i + 1) % 10000 == 0 {
            println!("   Generated {}/{} rows...", i + 1, args.rows);
        }
    }
    writer.flush()?;

    println!("Wrote {} rows ({} with a dirty cell)", args.rows, dirty_rows);
    Ok(())
}
