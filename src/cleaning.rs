//! Cleaning: numeric coercion and required-field filtering
//!
//! Unparsable numbers are not errors. They become absent, and a row is
//! only dropped when its duration or one of the required categorical
//! fields ends up absent.

use tracing::info;

use crate::models::{CleanRecord, RawRecord};

/// Cell values read as missing, matching the usual CSV reader defaults.
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Categorical cell: kept verbatim unless it is a missing token.
pub fn categorical(cell: Option<&str>) -> Option<String> {
    cell.filter(|c| !is_missing(c)).map(str::to_string)
}

/// Numeric cell: trimmed and parsed; anything that is not a finite number is absent.
pub fn parse_numeric(cell: Option<&str>) -> Option<f64> {
    cell.filter(|c| !is_missing(c))
        .and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn clean_record(raw: &RawRecord) -> Option<CleanRecord> {
    Some(CleanRecord {
        order_id: categorical(raw.order_id.as_deref()),
        delivery_time: parse_numeric(raw.delivery_time.as_deref())?,
        agent_rating: parse_numeric(raw.agent_rating.as_deref()),
        agent_age: parse_numeric(raw.agent_age.as_deref()),
        weather: categorical(raw.weather.as_deref())?,
        traffic: categorical(raw.traffic.as_deref())?,
        vehicle: categorical(raw.vehicle.as_deref())?,
        area: categorical(raw.area.as_deref())?,
        category: categorical(raw.category.as_deref()),
        store_latitude: parse_numeric(raw.store_latitude.as_deref()),
        store_longitude: parse_numeric(raw.store_longitude.as_deref()),
    })
}

/// Coerce and drop incomplete rows. Surviving rows keep their relative order.
pub fn clean(table: &[RawRecord]) -> Vec<CleanRecord> {
    let cleaned: Vec<CleanRecord> = table.iter().filter_map(clean_record).collect();
    info!(
        "Cleaning kept {} of {} rows ({} dropped)",
        cleaned.len(),
        table.len(),
        table.len() - cleaned.len()
    );
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, duration: &str, weather: &str) -> RawRecord {
        RawRecord {
            order_id: Some(id.to_string()),
            delivery_time: Some(duration.to_string()),
            agent_rating: Some("4.5".to_string()),
            agent_age: Some("31".to_string()),
            weather: Some(weather.to_string()),
            traffic: Some("Low ".to_string()),
            vehicle: Some("van".to_string()),
            area: Some("Urban ".to_string()),
            category: Some("Toys".to_string()),
            store_latitude: Some("12.91".to_string()),
            store_longitude: Some("77.68".to_string()),
        }
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(Some("45")), Some(45.0));
        assert_eq!(parse_numeric(Some(" 4.9 ")), Some(4.9));
        assert_eq!(parse_numeric(Some("-1e2")), Some(-100.0));
        assert_eq!(parse_numeric(Some("N/A")), None);
        assert_eq!(parse_numeric(Some("forty")), None);
        assert_eq!(parse_numeric(Some("inf")), None);
        assert_eq!(parse_numeric(Some("1,000")), None);
        assert_eq!(parse_numeric(None), None);
    }

    #[test]
    fn test_categorical_keeps_exact_text() {
        assert_eq!(categorical(Some("Urban ")), Some("Urban ".to_string()));
        assert_eq!(categorical(Some("NaN")), None);
        assert_eq!(categorical(Some("")), None);
        assert_eq!(categorical(None), None);
    }

    #[test]
    fn test_clean_drops_incomplete_rows() {
        let mut no_weather = raw("b", "45", "Sunny");
        no_weather.weather = None;
        let table = vec![raw("a", "N/A", "Sunny"), no_weather, raw("c", "200", "Fog")];

        let cleaned = clean(&table);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].order_id.as_deref(), Some("c"));
        assert_eq!(cleaned[0].delivery_time, 200.0);
    }

    #[test]
    fn test_clean_coerces_optional_fields_silently() {
        let mut row = raw("a", "90", "Cloudy");
        row.agent_rating = Some("excellent".to_string());
        row.agent_age = None;
        row.store_latitude = Some("NA".to_string());

        let cleaned = clean(&[row]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].agent_rating, None);
        assert_eq!(cleaned[0].agent_age, None);
        assert_eq!(cleaned[0].store_latitude, None);
        assert_eq!(cleaned[0].store_longitude, Some(77.68));
    }

    #[test]
    fn test_infinite_values_are_absent() {
        let mut bad_rating = raw("b", "95", "Sunny");
        bad_rating.agent_rating = Some("-inf".to_string());
        let table = vec![
            raw("a", "inf", "Sunny"),
            raw("c", "-Infinity", "Fog"),
            bad_rating,
        ];

        // An infinite duration is no duration at all, so those rows go
        let cleaned = clean(&table);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].order_id.as_deref(), Some("b"));
        assert_eq!(cleaned[0].agent_rating, None);
        assert!(cleaned.iter().all(|r| r.delivery_time.is_finite()));
    }

    #[test]
    fn test_clean_preserves_order() {
        let table = vec![
            raw("a", "10", "Sunny"),
            raw("b", "x", "Sunny"),
            raw("c", "30", "Windy"),
            raw("d", "40", "Fog"),
        ];
        let ids: Vec<_> = clean(&table)
            .into_iter()
            .filter_map(|r| r.order_id)
            .collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_clean_is_fixed_point() {
        let table = vec![raw("a", "10", "Sunny"), raw("b", "", "Sunny"), raw("c", "30", "")];
        let once = clean(&table);
        let rendered: Vec<RawRecord> = once.iter().map(RawRecord::from).collect();
        assert_eq!(clean(&rendered), once);
    }
}
