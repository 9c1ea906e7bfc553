use serde::{Deserialize, Serialize};

/// Claim status of an area as stored in the realtime database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    #[default]
    Unclaimed,
    Claimed,
}

/// Placeholder owner written for unclaimed areas
pub const NO_OWNER: &str = "none";

fn default_owner() -> String {
    NO_OWNER.to_string()
}

/// Live game state of one area
///
/// The polygon itself is not part of this record; it is looked up by `name`
/// in the static area dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaState {
    pub name: String,
    #[serde(default)]
    pub status: ClaimStatus,
    #[serde(default = "default_owner")]
    pub claimed_by: String,
    #[serde(default)]
    pub points: i64,
}

impl AreaState {
    pub fn new(name: impl Into<String>, points: i64) -> Self {
        Self {
            name: name.into(),
            status: ClaimStatus::Unclaimed,
            claimed_by: default_owner(),
            points,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.status == ClaimStatus::Claimed
    }

    /// Team currently holding the area, if any
    pub fn owner(&self) -> Option<&str> {
        if self.is_claimed() && self.claimed_by != NO_OWNER {
            Some(&self.claimed_by)
        } else {
            None
        }
    }

    pub fn claim(&mut self, team: &str) {
        self.status = ClaimStatus::Claimed;
        self.claimed_by = team.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_state_defaults() {
        let area: AreaState = serde_json::from_str(r#"{"name": "Park"}"#).unwrap();
        assert_eq!(area.status, ClaimStatus::Unclaimed);
        assert_eq!(area.claimed_by, "none");
        assert_eq!(area.points, 0);
        assert_eq!(area.owner(), None);
    }

    #[test]
    fn test_area_state_claim() {
        let json = r#"{"name": "Park", "status": "unclaimed", "claimedBy": "none", "points": 5}"#;
        let mut area: AreaState = serde_json::from_str(json).unwrap();
        area.claim("Red");
        assert!(area.is_claimed());
        assert_eq!(area.owner(), Some("Red"));

        let value = serde_json::to_value(&area).unwrap();
        assert_eq!(value["status"], "claimed");
        assert_eq!(value["claimedBy"], "Red");
    }
}
