//! Merging curated and place-search attractions

use crate::models::PointOfInterest;

/// Keep every primary item, then append the secondary items whose name does
/// not overlap an already accepted name, and truncate to `limit`.
///
/// Two names overlap when either contains the other, ignoring case.
#[must_use]
pub fn merge_attractions(
    primary: Vec<PointOfInterest>,
    secondary: Vec<PointOfInterest>,
    limit: usize,
) -> Vec<PointOfInterest> {
    let mut seen: Vec<String> = primary.iter().map(|p| p.name.to_lowercase()).collect();
    let mut merged = primary;

    for candidate in secondary {
        let name = candidate.name.to_lowercase();
        let duplicate = seen
            .iter()
            .any(|known| known.contains(&name) || name.contains(known.as_str()));
        if !duplicate {
            seen.push(name);
            merged.push(candidate);
        }
    }

    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(name: &str) -> PointOfInterest {
        PointOfInterest::new(name, "Landmark", "")
    }

    fn names(pois: &[PointOfInterest]) -> Vec<&str> {
        pois.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_substring_overlap_both_ways() {
        let merged = merge_attractions(
            vec![poi("Louvre Museum"), poi("Eiffel")],
            vec![
                poi("louvre"),
                poi("The Eiffel Tower"),
                poi("Sainte-Chapelle"),
                poi("Sainte-Chapelle Upper Chapel"),
            ],
            10,
        );
        assert_eq!(names(&merged), ["Louvre Museum", "Eiffel", "Sainte-Chapelle"]);
    }

    #[test]
    fn test_primary_items_are_never_dropped() {
        let primary = vec![poi("Fort"), poi("Fort Aguada"), poi("Fort")];
        let merged = merge_attractions(primary.clone(), vec![poi("Beach")], 10);
        assert_eq!(&merged[..3], &primary[..]);
        assert_eq!(merged[3].name, "Beach");
    }

    #[test]
    fn test_truncates_to_limit() {
        let secondary = (0..20).map(|i| poi(&format!("Place {i:02}x"))).collect();
        let merged = merge_attractions(vec![poi("Start")], secondary, 10);
        assert_eq!(merged.len(), 10);
        assert_eq!(merged[0].name, "Start");
    }

    #[test]
    fn test_empty_primary() {
        let merged = merge_attractions(Vec::new(), vec![poi("A"), poi("B")], 10);
        assert_eq!(names(&merged), ["A", "B"]);
    }
}
