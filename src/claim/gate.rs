use thiserror::Error;

use crate::dataset::AreaDataset;
use crate::domain::Coordinate;
use crate::geometry::contains;

/// Why a claim was refused; displays as user-facing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenialReason {
    #[error("no team selected")]
    NoTeamSelected,
    #[error("location unavailable")]
    LocationUnavailable,
    #[error("unknown area")]
    UnknownArea,
    #[error("not physically inside the area")]
    NotInsideArea,
}

/// Outcome of a claim evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    Allowed,
    Denied(DenialReason),
}

impl ClaimDecision {
    pub fn is_allowed(self) -> bool {
        self == ClaimDecision::Allowed
    }
}

/// Decide whether `team` may claim `area_name` from `location`
///
/// Checks run in a fixed order and the first failure wins: team selected,
/// location known, area present in the dataset, location inside the area.
/// The decision only grants permission; submitting the claim is up to the
/// caller.
pub fn evaluate_claim(
    team: &str,
    area_name: &str,
    location: Option<Coordinate>,
    dataset: &AreaDataset,
) -> ClaimDecision {
    if team.is_empty() {
        return ClaimDecision::Denied(DenialReason::NoTeamSelected);
    }

    let Some(location) = location else {
        return ClaimDecision::Denied(DenialReason::LocationUnavailable);
    };

    let Some(polygon) = dataset.polygon(area_name) else {
        return ClaimDecision::Denied(DenialReason::UnknownArea);
    };

    if contains(location, polygon) {
        ClaimDecision::Allowed
    } else {
        ClaimDecision::Denied(DenialReason::NotInsideArea)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> AreaDataset {
        AreaDataset::from_json_str(
            r#"[{"name": "Park", "coordinates": [[58.580, 16.185], [58.590, 16.185], [58.590, 16.195], [58.580, 16.195]]}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_allowed_inside() {
        let decision = evaluate_claim("Red", "Park", Some(Coordinate::new(58.585, 16.190)), &dataset());
        assert_eq!(decision, ClaimDecision::Allowed);
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_denied_outside() {
        let decision = evaluate_claim("Red", "Park", Some(Coordinate::new(0.0, 0.0)), &dataset());
        assert_eq!(decision, ClaimDecision::Denied(DenialReason::NotInsideArea));
        assert_eq!(DenialReason::NotInsideArea.to_string(), "not physically inside the area");
    }

    #[test]
    fn test_team_checked_first() {
        let ds = dataset();
        let expected = ClaimDecision::Denied(DenialReason::NoTeamSelected);

        assert_eq!(evaluate_claim("", "Park", Some(Coordinate::new(58.585, 16.19)), &ds), expected);
        assert_eq!(evaluate_claim("", "Atlantis", None, &ds), expected);
        assert_eq!(DenialReason::NoTeamSelected.to_string(), "no team selected");
    }

    #[test]
    fn test_location_checked_before_area() {
        let decision = evaluate_claim("Red", "Atlantis", None, &dataset());
        assert_eq!(decision, ClaimDecision::Denied(DenialReason::LocationUnavailable));
        assert_eq!(DenialReason::LocationUnavailable.to_string(), "location unavailable");
    }

    #[test]
    fn test_unknown_area() {
        let ds = dataset();
        for location in [Coordinate::new(58.585, 16.19), Coordinate::new(0.0, 0.0)] {
            assert_eq!(
                evaluate_claim("Red", "Atlantis", Some(location), &ds),
                ClaimDecision::Denied(DenialReason::UnknownArea)
            );
        }
        assert_eq!(DenialReason::UnknownArea.to_string(), "unknown area");
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let ds = dataset();
        assert!(evaluate_claim("Red", "Park", Some(Coordinate::new(58.580, 16.185)), &ds).is_allowed());
        assert!(evaluate_claim("Red", "Park", Some(Coordinate::new(58.585, 16.185)), &ds).is_allowed());
    }
}
