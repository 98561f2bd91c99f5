//! Best-track and forecast-cycle selection.

use cyclone_common::TrackRecord;

/// Technique label of the official best track.
pub const BEST_TECHNIQUE: &str = "BEST";

/// Technique label of the combined analysis (CARQ) used when no best track
/// has been issued yet.
pub const CONSENSUS_TECHNIQUE: &str = "CARQ";

/// Pick the analysis series for the best track.
///
/// Only offset-0 records are considered. BEST records win if there are any,
/// otherwise CARQ, otherwise every analysis record. The result is sorted by
/// cycle time; records sharing a cycle keep their input order.
pub fn select_best_track(records: &[TrackRecord]) -> Vec<&TrackRecord> {
    let analyses: Vec<&TrackRecord> = records
        .iter()
        .filter(|r| r.forecast_offset_hours == 0)
        .collect();

    let preferred = [BEST_TECHNIQUE, CONSENSUS_TECHNIQUE]
        .into_iter()
        .find(|label| analyses.iter().any(|r| r.technique == *label));

    let mut selected: Vec<&TrackRecord> = match preferred {
        Some(label) => analyses.into_iter().filter(|r| r.technique == label).collect(),
        None => analyses,
    };

    selected.sort_by_key(|r| r.cycle_time);
    selected
}

/// Pick the latest forecast cycle of one technique.
///
/// Records whose technique matches (case-insensitive) are narrowed to the
/// most recent cycle time and sorted by forecast offset.
pub fn select_forecast<'a>(records: &'a [TrackRecord], technique: &str) -> Vec<&'a TrackRecord> {
    let matching: Vec<&TrackRecord> = records
        .iter()
        .filter(|r| r.technique.eq_ignore_ascii_case(technique))
        .collect();

    let Some(latest_cycle) = matching.iter().map(|r| r.cycle_time).max() else {
        return Vec::new();
    };

    let mut selected: Vec<&TrackRecord> = matching
        .into_iter()
        .filter(|r| r.cycle_time == latest_cycle)
        .collect();
    selected.sort_by_key(|r| r.forecast_offset_hours);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::record;

    #[test]
    fn test_best_preferred_over_other_labels() {
        let records = vec![
            record("BEST", 12, 0, 11.2, 133.3),
            record("CARQ", 6, 0, 10.6, 134.1),
            record("BEST", 0, 0, 10.0, 135.0),
            record("JTWC", 6, 0, 10.5, 134.2),
        ];
        let best = select_best_track(&records);
        assert_eq!(best.len(), 2);
        assert!(best.iter().all(|r| r.technique == "BEST"));
        assert!(best[0].cycle_time < best[1].cycle_time);
    }

    #[test]
    fn test_carq_fallback() {
        let records = vec![
            record("CARQ", 6, 0, 10.6, 134.1),
            record("JTWC", 6, 0, 10.5, 134.2),
            record("CARQ", 0, 0, 10.0, 135.0),
        ];
        let best = select_best_track(&records);
        assert_eq!(best.len(), 2);
        assert!(best.iter().all(|r| r.technique == "CARQ"));
    }

    #[test]
    fn test_any_analysis_when_no_preferred_label() {
        let records = vec![
            record("JTWC", 6, 0, 10.5, 134.2),
            record("OFCL", 0, 0, 10.0, 135.0),
            record("OFCL", 0, 12, 11.0, 134.0),
        ];
        let best = select_best_track(&records);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].technique, "OFCL");
        assert_eq!(best[1].technique, "JTWC");
    }

    #[test]
    fn test_best_ignores_forecasts() {
        let records = vec![record("BEST", 0, 12, 10.0, 135.0)];
        assert!(select_best_track(&records).is_empty());
    }

    #[test]
    fn test_forecast_latest_cycle_sorted_by_tau() {
        let records = vec![
            record("OFCL", 0, 0, 10.0, 135.0),
            record("OFCL", 0, 12, 11.0, 134.0),
            record("OFCL", 6, 24, 12.0, 133.0),
            record("OFCL", 6, 0, 10.5, 134.5),
            record("OFCL", 6, 12, 11.5, 133.5),
            record("JTWC", 12, 0, 11.0, 134.0),
        ];
        let forecast = select_forecast(&records, "ofcl");
        let taus: Vec<i32> = forecast.iter().map(|r| r.forecast_offset_hours).collect();
        assert_eq!(taus, vec![0, 12, 24]);
        assert!(forecast.iter().all(|r| r.cycle_time == records[2].cycle_time));
    }

    #[test]
    fn test_forecast_unknown_technique() {
        let records = vec![record("OFCL", 0, 0, 10.0, 135.0)];
        assert!(select_forecast(&records, "AVNO").is_empty());
    }
}
