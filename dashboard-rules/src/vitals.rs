//! Vital status classification and reading selection.

use std::collections::{hash_map::Entry, HashMap};

use dashboard_core::{VitalKind, VitalReading, VitalStatus};

/// Qualitative status of `value` for the given kind.
pub fn classify(value: f64, kind: VitalKind) -> VitalStatus {
    VitalStatus::classify(value, kind)
}

/// Most recent reading of each kind.
///
/// A later reading only replaces the held one when strictly newer, so among
/// readings sharing a timestamp the first one supplied wins. The order of the
/// returned readings across kinds is unspecified.
pub fn latest_per_kind(readings: &[VitalReading]) -> Vec<VitalReading> {
    let mut latest: HashMap<VitalKind, &VitalReading> = HashMap::new();

    for reading in readings {
        match latest.entry(reading.kind) {
            Entry::Occupied(mut entry) => {
                if reading.recorded_at > entry.get().recorded_at {
                    entry.insert(reading);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(reading);
            }
        }
    }

    latest.into_values().cloned().collect()
}

/// Readings of one kind, most recent first. Ties keep their input order.
pub fn history_for_kind(readings: &[VitalReading], kind: VitalKind) -> Vec<VitalReading> {
    let mut history: Vec<VitalReading> = readings
        .iter()
        .filter(|reading| reading.kind == kind)
        .cloned()
        .collect();
    history.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap() + Duration::seconds(offset_secs)
    }

    fn reading(id: &str, kind: VitalKind, value: f64, at: i64) -> VitalReading {
        VitalReading::new(id, kind, value, t(at))
    }

    #[test]
    fn inclusive_bounds_are_normal() {
        for kind in VitalKind::ALL {
            let range = kind.normal_range();
            assert_eq!(classify(range.low, kind), VitalStatus::Normal, "{kind} low");
            assert_eq!(classify(range.high, kind), VitalStatus::Normal, "{kind} high");
            let mid = (range.low + range.high) / 2.0;
            assert_eq!(classify(mid, kind), VitalStatus::Normal, "{kind} mid");
        }
    }

    #[test]
    fn critical_margins_are_exclusive() {
        for kind in VitalKind::ALL {
            let range = kind.normal_range();
            let low_margin = range.low * 0.8;
            let high_margin = range.high * 1.2;
            assert_eq!(classify(low_margin, kind), VitalStatus::Low, "{kind}");
            assert_eq!(classify(low_margin - 0.01, kind), VitalStatus::Critical, "{kind}");
            assert_eq!(classify(high_margin, kind), VitalStatus::Elevated, "{kind}");
            assert_eq!(classify(high_margin + 0.01, kind), VitalStatus::Critical, "{kind}");
        }
    }

    #[test]
    fn heart_rate_reference_points() {
        assert_eq!(classify(47.0, VitalKind::HeartRate), VitalStatus::Critical);
        assert_eq!(classify(50.0, VitalKind::HeartRate), VitalStatus::Low);
        assert_eq!(classify(110.0, VitalKind::HeartRate), VitalStatus::Elevated);
        assert_eq!(classify(98.6, VitalKind::Temperature), VitalStatus::Normal);
        assert_eq!(classify(93.0, VitalKind::OxygenLevel), VitalStatus::Low);
    }

    #[test]
    fn latest_keeps_newest_reading() {
        let readings = vec![
            reading("a", VitalKind::HeartRate, 70.0, 1),
            reading("b", VitalKind::HeartRate, 80.0, 3),
            reading("c", VitalKind::HeartRate, 90.0, 2),
        ];
        let latest = latest_per_kind(&readings);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, "b");
    }

    #[test]
    fn latest_tie_keeps_first_supplied() {
        let readings = vec![
            reading("first", VitalKind::HeartRate, 70.0, 5),
            reading("second", VitalKind::HeartRate, 75.0, 5),
        ];
        let latest = latest_per_kind(&readings);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, "first");
    }

    #[test]
    fn latest_groups_every_kind() {
        let readings = vec![
            reading("hr-1", VitalKind::HeartRate, 70.0, 1),
            reading("bp-1", VitalKind::BloodPressure, 118.0, 1),
            reading("hr-2", VitalKind::HeartRate, 72.0, 10),
            reading("temp-1", VitalKind::Temperature, 98.6, -60),
            reading("bp-2", VitalKind::BloodPressure, 121.0, 0),
        ];
        let mut ids: Vec<String> = latest_per_kind(&readings)
            .into_iter()
            .map(|reading| reading.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["bp-1", "hr-2", "temp-1"]);
    }

    #[test]
    fn latest_of_nothing_is_empty() {
        assert!(latest_per_kind(&[]).is_empty());
    }

    #[test]
    fn latest_reading_then_classify() {
        let readings = vec![
            reading("rest", VitalKind::HeartRate, 72.0, 0),
            reading("spike", VitalKind::HeartRate, 140.0, 1),
        ];
        let latest = latest_per_kind(&readings);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].value, 140.0);
        // 140 is above 100 * 1.2 = 120.
        assert_eq!(classify(latest[0].value, latest[0].kind), VitalStatus::Critical);
        assert_eq!(latest[0].status, VitalStatus::Critical);
    }

    #[test]
    fn history_filters_and_sorts_descending() {
        let readings = vec![
            reading("hr-old", VitalKind::HeartRate, 70.0, 1),
            reading("temp", VitalKind::Temperature, 98.1, 4),
            reading("hr-tie-a", VitalKind::HeartRate, 71.0, 3),
            reading("hr-new", VitalKind::HeartRate, 72.0, 9),
            reading("hr-tie-b", VitalKind::HeartRate, 73.0, 3),
        ];
        let ids: Vec<String> = history_for_kind(&readings, VitalKind::HeartRate)
            .into_iter()
            .map(|reading| reading.id)
            .collect();
        assert_eq!(ids, vec!["hr-new", "hr-tie-a", "hr-tie-b", "hr-old"]);
    }

    #[test]
    fn history_for_absent_kind_is_empty() {
        let readings = vec![reading("hr", VitalKind::HeartRate, 70.0, 1)];
        assert!(history_for_kind(&readings, VitalKind::OxygenLevel).is_empty());
    }
}
