use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One sighting, normalized and ready for formatting.
///
/// Built exactly once per raw observation. `origin` is the label of the
/// query point that produced the observation and `distance_miles` is measured
/// from that same point, truncated toward zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationResult {
    pub origin: String,
    pub species: String,
    pub distance_miles: u32,
    pub count: u32,
    pub observed_at: NaiveDateTime,
    pub location_name: String,
    pub comment: Option<String>,
    pub has_photo: bool,
    pub checklist_url: String,
}

/// Sorts by species name, then origin label, then distance ascending.
///
/// The sort is stable, so applying it to an already-sorted slice is a no-op.
pub fn sort_results(results: &mut [ObservationResult]) {
    results.sort_by(|a, b| {
        a.species
            .cmp(&b.species)
            .then_with(|| a.origin.cmp(&b.origin))
            .then_with(|| a.distance_miles.cmp(&b.distance_miles))
    });
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn result(species: &str, origin: &str, distance_miles: u32, sub_id: &str) -> ObservationResult {
        ObservationResult {
            origin: origin.to_string(),
            species: species.to_string(),
            distance_miles,
            count: 1,
            observed_at: NaiveDate::from_ymd_opt(2026, 10, 1)
                .unwrap()
                .and_hms_opt(6, 30, 0)
                .unwrap(),
            location_name: "Lake Merced".to_string(),
            comment: None,
            has_photo: false,
            checklist_url: format!("https://ebird.org/checklist/{sub_id}"),
        }
    }

    #[test]
    fn sorts_by_species_then_origin_then_distance() {
        let mut results = vec![
            result("Great Horned Owl", "Work", 3, "S1"),
            result("Barn Owl", "Work", 9, "S2"),
            result("Great Horned Owl", "Home", 12, "S3"),
            result("Barn Owl", "Work", 2, "S4"),
            result("Barn Owl", "Home", 40, "S5"),
        ];
        sort_results(&mut results);

        let keys: Vec<(&str, &str, u32)> = results
            .iter()
            .map(|r| (r.species.as_str(), r.origin.as_str(), r.distance_miles))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Barn Owl", "Home", 40),
                ("Barn Owl", "Work", 2),
                ("Barn Owl", "Work", 9),
                ("Great Horned Owl", "Home", 12),
                ("Great Horned Owl", "Work", 3),
            ]
        );
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut results = vec![
            result("Western Screech-Owl", "Home", 5, "S1"),
            result("Barn Owl", "Home", 5, "S2"),
            result("Barn Owl", "Home", 5, "S3"),
            result("Barn Owl", "Cabin", 1, "S4"),
        ];
        sort_results(&mut results);
        let once = results.clone();
        sort_results(&mut results);
        assert_eq!(results, once);
    }

    #[test]
    fn ties_keep_input_order() {
        let mut results = vec![
            result("Barn Owl", "Home", 5, "FIRST"),
            result("Barn Owl", "Home", 5, "SECOND"),
        ];
        sort_results(&mut results);
        assert!(results[0].checklist_url.ends_with("FIRST"));
        assert!(results[1].checklist_url.ends_with("SECOND"));
    }

    #[test]
    fn serializes_timestamp_as_iso_string() {
        let json = serde_json::to_value(result("Barn Owl", "Home", 5, "S1")).unwrap();
        assert_eq!(json["observed_at"], "2026-10-01T06:30:00");
        assert_eq!(json["comment"], serde_json::Value::Null);
    }
}
