//! Summary metrics and chart aggregates over a filtered table
//!
//! Every function here is a pure transform of its input rows. The
//! shapes are plain serialisable structs; nothing depends on how a chart
//! is eventually drawn.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::DeliveryRecord;

/// Number of histogram bins when the caller does not ask for another.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Group label for rows whose Category is absent.
pub const UNSPECIFIED_CATEGORY: &str = "Unspecified";

// ============================================================================
// Data Structures
// ============================================================================

/// The four headline numbers. Means are NaN when there is nothing to average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub count: usize,
    pub avg_duration: f64,
    pub avg_rating: f64,
    pub late_pct: f64,
}

/// Summary metrics formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDisplay {
    pub total_orders: String,
    pub avg_delivery_time: String,
    pub avg_rating: String,
    pub late_percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherDuration {
    pub weather: String,
    pub mean_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// One histogram bucket, `[low, high)` except the last which is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeRatingPoint {
    pub age: f64,
    pub rating: f64,
    pub vehicle: String,
    pub duration: f64,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Everything the view needs for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: SummaryMetrics,
    pub summary_display: SummaryDisplay,
    pub weather: Vec<WeatherDuration>,
    pub categories: Vec<CategoryCount>,
    pub histogram: Vec<HistogramBin>,
    pub age_rating: Vec<AgeRatingPoint>,
    pub store_locations: Vec<StoreLocation>,
}

impl Dashboard {
    pub fn compute(table: &[DeliveryRecord], histogram_bins: usize) -> Self {
        let summary = summary_metrics(table);
        Self {
            summary,
            summary_display: summary.display(),
            weather: by_weather(table),
            categories: by_category(table),
            histogram: duration_histogram(table, histogram_bins),
            age_rating: age_rating_points(table),
            store_locations: store_locations(table),
        }
    }
}

impl SummaryMetrics {
    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            total_orders: self.count.to_string(),
            avg_delivery_time: format!("{:.1} min", self.avg_duration),
            avg_rating: format!("{:.1} / 5.0", self.avg_rating),
            late_percentage: format!("{:.1}%", self.late_pct),
        }
    }
}

// ============================================================================
// Aggregates
// ============================================================================

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n > 0 {
        sum / n as f64
    } else {
        f64::NAN
    }
}

pub fn summary_metrics(table: &[DeliveryRecord]) -> SummaryMetrics {
    let count = table.len();
    let late = table.iter().filter(|r| r.is_late).count();
    let late_pct = if count > 0 {
        late as f64 / count as f64 * 100.0
    } else {
        0.0
    };

    SummaryMetrics {
        count,
        avg_duration: mean(table.iter().map(|r| r.delivery_time)),
        avg_rating: mean(table.iter().filter_map(|r| r.agent_rating)),
        late_pct,
    }
}

/// Mean duration per Weather value, ordered by weather.
pub fn by_weather(table: &[DeliveryRecord]) -> Vec<WeatherDuration> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in table {
        let entry = groups.entry(record.weather.as_str()).or_insert((0.0, 0));
        entry.0 += record.delivery_time;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(weather, (sum, n))| WeatherDuration {
            weather: weather.to_string(),
            mean_duration: sum / n as f64,
        })
        .collect()
}

/// Row count per Category, ordered by category.
pub fn by_category(table: &[DeliveryRecord]) -> Vec<CategoryCount> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for record in table {
        let category = record.category.as_deref().unwrap_or(UNSPECIFIED_CATEGORY);
        *groups.entry(category).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

/// Equal-width buckets spanning the observed duration range.
pub fn duration_histogram(table: &[DeliveryRecord], bin_count: usize) -> Vec<HistogramBin> {
    let bins = bin_count.max(1);
    let range = table.iter().map(|r| r.delivery_time).fold(None, |acc, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((f64::min(lo, d), f64::max(hi, d))),
    });
    let Some((min, max)) = range else {
        return Vec::new();
    };

    if max == min {
        return vec![HistogramBin {
            low: min,
            high: max,
            count: table.len(),
        }];
    }

    let edges = bin_edges(min, max, bins);
    let mut counts = vec![0usize; bins];
    for record in table {
        // Last edge with edges[i] <= d; `max` itself lands in the closed last bin
        let index = edges.partition_point(|&edge| edge <= record.delivery_time);
        counts[index.saturating_sub(1).min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            low: edges[i],
            high: edges[i + 1],
            count,
        })
        .collect()
}

/// `bins + 1` non-decreasing edges from `min` to `max`.
///
/// Interpolates instead of stepping by `max - min`, which overflows when
/// the range spans most of `f64`.
fn bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let mut edges = Vec::with_capacity(bins + 1);
    edges.push(min);
    for i in 1..bins {
        let t = i as f64 / bins as f64;
        let edge = min * (1.0 - t) + max * t;
        let previous = edges[i - 1];
        edges.push(edge.clamp(previous, max));
    }
    edges.push(max);
    edges
}

/// Scatter points for rows with both age and rating.
pub fn age_rating_points(table: &[DeliveryRecord]) -> Vec<AgeRatingPoint> {
    table
        .iter()
        .filter_map(|r| {
            Some(AgeRatingPoint {
                age: r.agent_age?,
                rating: r.agent_rating?,
                vehicle: r.vehicle.clone(),
                duration: r.delivery_time,
                order_id: r.order_id.clone(),
            })
        })
        .collect()
}

/// Store coordinates for rows with both latitude and longitude.
pub fn store_locations(table: &[DeliveryRecord]) -> Vec<StoreLocation> {
    table
        .iter()
        .filter_map(|r| {
            Some(StoreLocation {
                lat: r.store_latitude?,
                lon: r.store_longitude?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(delivery_time: f64, weather: &str, category: Option<&str>) -> DeliveryRecord {
        DeliveryRecord {
            order_id: Some(format!("o{delivery_time}")),
            delivery_time,
            agent_rating: Some(4.0),
            agent_age: Some(30.0),
            weather: weather.to_string(),
            traffic: "Low ".to_string(),
            vehicle: "van".to_string(),
            area: "Urban ".to_string(),
            category: category.map(str::to_string),
            store_latitude: Some(12.9),
            store_longitude: Some(77.6),
            is_late: delivery_time > 120.0,
        }
    }

    #[test]
    fn test_summary_late_percentage() {
        let table = vec![
            record(90.0, "Sunny", None),
            record(130.0, "Sunny", None),
            record(150.0, "Fog", None),
        ];
        let summary = summary_metrics(&table);
        assert_eq!(summary.count, 3);
        assert!((summary.late_pct - 200.0 / 3.0).abs() < 1e-9);
        assert!((summary.avg_duration - 370.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.display().late_percentage, "66.7%");
    }

    #[test]
    fn test_summary_empty_table() {
        let summary = summary_metrics(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.late_pct, 0.0);
        assert!(summary.avg_duration.is_nan());
        assert!(summary.avg_rating.is_nan());
    }

    #[test]
    fn test_avg_rating_ignores_absent_ratings() {
        let mut unrated = record(60.0, "Sunny", None);
        unrated.agent_rating = None;
        let mut low = record(60.0, "Sunny", None);
        low.agent_rating = Some(3.0);
        let summary = summary_metrics(&[record(60.0, "Sunny", None), low, unrated]);
        assert!((summary.avg_rating - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_display_strings() {
        let summary = SummaryMetrics {
            count: 1234,
            avg_duration: 124.96,
            avg_rating: 4.63,
            late_pct: 45.04,
        };
        let display = summary.display();
        assert_eq!(display.total_orders, "1234");
        assert_eq!(display.avg_delivery_time, "125.0 min");
        assert_eq!(display.avg_rating, "4.6 / 5.0");
        assert_eq!(display.late_percentage, "45.0%");
    }

    #[test]
    fn test_by_weather_means_sorted_by_key() {
        let table = vec![
            record(100.0, "Sunny", None),
            record(50.0, "Fog", None),
            record(200.0, "Sunny", None),
        ];
        let weather = by_weather(&table);
        assert_eq!(
            weather,
            vec![
                WeatherDuration { weather: "Fog".to_string(), mean_duration: 50.0 },
                WeatherDuration { weather: "Sunny".to_string(), mean_duration: 150.0 },
            ]
        );
    }

    #[test]
    fn test_by_weather_exact_string_grouping() {
        let table = vec![record(10.0, "Sunny", None), record(20.0, "Sunny ", None)];
        assert_eq!(by_weather(&table).len(), 2);
    }

    #[test]
    fn test_by_category_counts_unspecified() {
        let table = vec![
            record(10.0, "Sunny", Some("Toys")),
            record(20.0, "Sunny", None),
            record(30.0, "Sunny", Some("Toys")),
        ];
        let categories = by_category(&table);
        assert_eq!(
            categories,
            vec![
                CategoryCount { category: "Toys".to_string(), count: 2 },
                CategoryCount { category: UNSPECIFIED_CATEGORY.to_string(), count: 1 },
            ]
        );
        let total: usize = categories.iter().map(|c| c.count).sum();
        assert_eq!(total, table.len());
    }

    #[test]
    fn test_histogram_spans_range() {
        let table: Vec<_> = (0..=10).map(|d| record(d as f64, "Sunny", None)).collect();
        let histogram = duration_histogram(&table, 5);
        let counts: Vec<usize> = histogram.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 2, 2, 3]);
        assert_eq!(histogram[0].low, 0.0);
        assert_eq!(histogram[4].high, 10.0);
        assert_eq!(histogram[1].low, histogram[0].high);
    }

    #[test]
    fn test_histogram_edge_cases() {
        assert!(duration_histogram(&[], 30).is_empty());

        let flat = vec![record(45.0, "Sunny", None), record(45.0, "Fog", None)];
        let histogram = duration_histogram(&flat, 30);
        assert_eq!(
            histogram,
            vec![HistogramBin { low: 45.0, high: 45.0, count: 2 }]
        );

        let table = vec![record(10.0, "Sunny", None), record(20.0, "Sunny", None)];
        assert_eq!(duration_histogram(&table, 0).len(), 1);
    }

    fn assert_counts_match_bounds(durations: &[f64], histogram: &[HistogramBin]) {
        let last = histogram.len() - 1;
        for (i, bin) in histogram.iter().enumerate() {
            let inside = durations
                .iter()
                .filter(|&&d| bin.low <= d && (d < bin.high || (i == last && d <= bin.high)))
                .count();
            assert_eq!(bin.count, inside, "bin {i} {:?}", bin);
        }
        assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), durations.len());
    }

    #[test]
    fn test_histogram_counts_match_bin_bounds() {
        // Integer durations that sit exactly on computed edges
        for max in [47, 63, 67] {
            let durations: Vec<f64> = (1..=max).map(f64::from).collect();
            let table: Vec<_> = durations.iter().map(|&d| record(d, "Sunny", None)).collect();
            let histogram = duration_histogram(&table, 30);
            assert_eq!(histogram.len(), 30);
            assert_counts_match_bounds(&durations, &histogram);
        }

        for max in 2..=300 {
            for bins in [7, 30] {
                let durations: Vec<f64> = (1..=max).map(f64::from).collect();
                let table: Vec<_> = durations.iter().map(|&d| record(d, "Sunny", None)).collect();
                assert_counts_match_bounds(&durations, &duration_histogram(&table, bins));
            }
        }
    }

    #[test]
    fn test_histogram_extreme_range() {
        let durations = [-1.7e308, 0.0, 1.7e308];
        let table: Vec<_> = durations.iter().map(|&d| record(d, "Sunny", None)).collect();
        let histogram = duration_histogram(&table, 30);

        assert!(histogram.iter().all(|b| b.low.is_finite() && b.high.is_finite()));
        assert_eq!(histogram[0].low, -1.7e308);
        assert_eq!(histogram[29].high, 1.7e308);
        assert_eq!(histogram[0].count, 1);
        assert_eq!(histogram[29].count, 1);
        assert_counts_match_bounds(&durations, &histogram);
    }

    #[test]
    fn test_age_rating_points_skip_incomplete_rows() {
        let mut no_age = record(10.0, "Sunny", None);
        no_age.agent_age = None;
        let mut no_rating = record(20.0, "Sunny", None);
        no_rating.agent_rating = None;
        let points = age_rating_points(&[no_age, record(30.0, "Sunny", None), no_rating]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].duration, 30.0);
        assert_eq!(points[0].order_id.as_deref(), Some("o30"));
    }

    #[test]
    fn test_store_locations_skip_missing_coordinates() {
        let mut no_lon = record(10.0, "Sunny", None);
        no_lon.store_longitude = None;
        let locations = store_locations(&[no_lon, record(20.0, "Sunny", None)]);
        assert_eq!(locations, vec![StoreLocation { lat: 12.9, lon: 77.6 }]);
    }

    #[test]
    fn test_dashboard_on_empty_table() {
        let dashboard = Dashboard::compute(&[], DEFAULT_HISTOGRAM_BINS);
        assert_eq!(dashboard.summary.count, 0);
        assert_eq!(dashboard.summary_display.late_percentage, "0.0%");
        assert!(dashboard.weather.is_empty());
        assert!(dashboard.categories.is_empty());
        assert!(dashboard.histogram.is_empty());
        assert!(dashboard.age_rating.is_empty());
        assert!(dashboard.store_locations.is_empty());
    }
}
