use crate::models::{CleanRecord, DeliveryRecord};

/// The source data has no promised time, so a delivery counts as late
/// once it takes longer than this many minutes.
pub const LATE_THRESHOLD_MINUTES: f64 = 120.0;

/// Flag every row late iff its duration is strictly above `threshold_minutes`.
pub fn derive_late(table: Vec<CleanRecord>, threshold_minutes: f64) -> Vec<DeliveryRecord> {
    table
        .into_iter()
        .map(|record| {
            let is_late = record.delivery_time > threshold_minutes;
            record.with_late(is_late)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(delivery_time: f64) -> CleanRecord {
        CleanRecord {
            order_id: None,
            delivery_time,
            agent_rating: None,
            agent_age: None,
            weather: "Sunny".to_string(),
            traffic: "Low ".to_string(),
            vehicle: "van".to_string(),
            area: "Urban ".to_string(),
            category: None,
            store_latitude: None,
            store_longitude: None,
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let flags: Vec<bool> = derive_late(
            vec![record(90.0), record(120.0), record(130.0), record(150.0)],
            LATE_THRESHOLD_MINUTES,
        )
        .iter()
        .map(|r| r.is_late)
        .collect();
        assert_eq!(flags, vec![false, false, true, true]);
    }

    #[test]
    fn test_custom_threshold() {
        let labelled = derive_late(vec![record(45.0), record(61.0)], 60.0);
        assert!(!labelled[0].is_late);
        assert!(labelled[1].is_late);
    }

    #[test]
    fn test_no_rows_dropped_or_reordered() {
        let labelled = derive_late(vec![record(300.0), record(1.0), record(121.0)], 120.0);
        let times: Vec<f64> = labelled.iter().map(|r| r.delivery_time).collect();
        assert_eq!(times, vec![300.0, 1.0, 121.0]);
    }
}
