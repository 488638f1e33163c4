//! Plain-text rendering of a dashboard for the terminal

use std::fmt::{self, Write};

use crate::aggregate::Dashboard;
use crate::models::DeliveryRecord;

const BAR_WIDTH: f64 = 30.0;

pub struct ReportOptions {
    pub late_threshold_minutes: f64,
    /// Rows of the filtered table to print.
    pub raw_rows: usize,
}

fn print_section_header(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "\n{}", title)?;
    writeln!(out, "{}", "-".repeat(60))
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() {
        return String::new();
    }
    "#".repeat((value / max * BAR_WIDTH).round() as usize)
}

pub fn late_label(threshold_minutes: f64) -> String {
    format!("Late Deliveries (>{}m)", threshold_minutes)
}

pub fn render(
    dashboard: &Dashboard,
    rows: &[DeliveryRecord],
    options: &ReportOptions,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let display = &dashboard.summary_display;

    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "         LAST MILE DELIVERY PERFORMANCE")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "  {:28} {:>14}", "Total Orders", display.total_orders)?;
    writeln!(out, "  {:28} {:>14}", "Avg. Delivery Time", display.avg_delivery_time)?;
    writeln!(out, "  {:28} {:>14}", "Avg. Agent Rating", display.avg_rating)?;
    writeln!(
        out,
        "  {:28} {:>14}",
        late_label(options.late_threshold_minutes),
        display.late_percentage
    )?;

    // Chart 1
    print_section_header(&mut out, "1. IMPACT OF WEATHER ON SPEED (avg minutes)")?;
    let slowest = dashboard
        .weather
        .iter()
        .map(|w| w.mean_duration)
        .fold(0.0, f64::max);
    for w in &dashboard.weather {
        writeln!(
            out,
            "  {:14} {:>8.1}  {}",
            w.weather,
            w.mean_duration,
            bar(w.mean_duration, slowest)
        )?;
    }

    // Chart 2
    print_section_header(&mut out, "2. DELIVERY VOLUME BY CATEGORY")?;
    let total: usize = dashboard.categories.iter().map(|c| c.count).sum();
    for c in &dashboard.categories {
        let pct = c.count as f64 / total as f64 * 100.0;
        writeln!(out, "  {:14} {:>8} ({:>5.1}%)", c.category, c.count, pct)?;
    }

    // Chart 3
    print_section_header(&mut out, "3. DELIVERY TIME DISTRIBUTION")?;
    let busiest = dashboard.histogram.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let last = dashboard.histogram.len().saturating_sub(1);
    for (i, b) in dashboard.histogram.iter().enumerate() {
        let threshold = options.late_threshold_minutes;
        let holds_threshold =
            threshold >= b.low && (threshold < b.high || (i == last && threshold <= b.high));
        writeln!(
            out,
            "  {:>7.1} - {:>7.1} {:>7}  {}{}",
            b.low,
            b.high,
            b.count,
            bar(b.count as f64, busiest),
            if holds_threshold { "  <- Late Threshold" } else { "" }
        )?;
    }

    // Chart 4
    print_section_header(&mut out, "4. AGENT AGE VS. RATING")?;
    if dashboard.age_rating.is_empty() {
        writeln!(out, "  No agents with both age and rating.")?;
    } else {
        let n = dashboard.age_rating.len() as f64;
        let avg_age = dashboard.age_rating.iter().map(|p| p.age).sum::<f64>() / n;
        let avg_rating = dashboard.age_rating.iter().map(|p| p.rating).sum::<f64>() / n;
        let (min_age, max_age) = dashboard
            .age_rating
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.age), hi.max(p.age)));
        writeln!(out, "  Points:        {:>10}", dashboard.age_rating.len())?;
        writeln!(out, "  Age range:     {:>10}", format!("{min_age:.0}-{max_age:.0}"))?;
        writeln!(out, "  Avg age:       {:>10.1}", avg_age)?;
        writeln!(out, "  Avg rating:    {:>10.2}", avg_rating)?;
    }

    // Chart 5
    print_section_header(&mut out, "5. GEOGRAPHIC DISTRIBUTION OF STORES")?;
    if dashboard.store_locations.is_empty() {
        writeln!(out, "  No location data available for map.")?;
    } else {
        let (lat_lo, lat_hi, lon_lo, lon_hi) = dashboard.store_locations.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(a, b, c, d), s| (a.min(s.lat), b.max(s.lat), c.min(s.lon), d.max(s.lon)),
        );
        writeln!(out, "  Stores:        {:>10}", dashboard.store_locations.len())?;
        writeln!(out, "  Latitude:      {:>10.4} .. {:.4}", lat_lo, lat_hi)?;
        writeln!(out, "  Longitude:     {:>10.4} .. {:.4}", lon_lo, lon_hi)?;
    }

    if options.raw_rows > 0 {
        print_section_header(&mut out, "RAW DATA")?;
        writeln!(
            out,
            "  {:16} {:>6} {:>6} {:>5} {:10} {:10} {:12} {:14} {:5}",
            "Order_ID", "Time", "Rating", "Age", "Weather", "Traffic", "Vehicle", "Area", "Late"
        )?;
        for r in rows.iter().take(options.raw_rows) {
            let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
            writeln!(
                out,
                "  {:16} {:>6} {:>6} {:>5} {:10} {:10} {:12} {:14} {:5}",
                r.order_id.as_deref().unwrap_or(""),
                r.delivery_time,
                opt(r.agent_rating),
                opt(r.agent_age),
                r.weather,
                r.traffic,
                r.vehicle,
                r.area,
                r.is_late
            )?;
        }
        if rows.len() > options.raw_rows {
            writeln!(out, "  ... {} more rows", rows.len() - options.raw_rows)?;
        }
    }

    writeln!(out, "\n{}", "=".repeat(60))?;
    Ok(out)
}
