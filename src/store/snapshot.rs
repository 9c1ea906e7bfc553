use std::collections::HashMap;

use crate::domain::{AreaState, Team};

/// Point-in-time copy of the live areas and teams
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub areas: Vec<AreaState>,
    pub teams: Vec<Team>,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub team: String,
    pub color: String,
    pub areas_held: usize,
    pub points: i64,
}

impl Snapshot {
    pub fn area(&self, name: &str) -> Option<&AreaState> {
        self.areas.iter().find(|a| a.name == name)
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Names of areas nobody holds yet
    pub fn unclaimed(&self) -> impl Iterator<Item = &str> {
        self.areas
            .iter()
            .filter(|a| !a.is_claimed())
            .map(|a| a.name.as_str())
    }

    /// Teams ranked by their own `points`
    ///
    /// The store keeps team points itself, so held areas are counted but not
    /// added to the score. Ties are broken by team name so the order is stable
    /// between polls.
    pub fn standings(&self) -> Vec<Standing> {
        let mut held: HashMap<&str, usize> = HashMap::new();
        for owner in self.areas.iter().filter_map(AreaState::owner) {
            *held.entry(owner).or_default() += 1;
        }

        let mut standings: Vec<Standing> = self
            .teams
            .iter()
            .map(|team| Standing {
                team: team.name.clone(),
                color: team.team_color.clone(),
                areas_held: held.get(team.name.as_str()).copied().unwrap_or_default(),
                points: team.points,
            })
            .collect();

        standings.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.team.cmp(&b.team)));
        standings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claimed(name: &str, team: &str, points: i64) -> AreaState {
        let mut area = AreaState::new(name, points);
        area.claim(team);
        area
    }

    fn team(name: &str, points: i64) -> Team {
        Team {
            points,
            ..Team::new(name, "#000")
        }
    }

    #[test]
    fn test_standings_rank_by_points() {
        let snapshot = Snapshot {
            areas: vec![
                claimed("Park", "Blue", 3),
                claimed("Harbour", "Red", 5),
                claimed("Square", "Blue", 4),
                AreaState::new("Station", 10),
            ],
            teams: vec![team("Red", 12), team("Blue", 7), team("Green", 0)],
        };

        let standings = snapshot.standings();
        let order: Vec<&str> = standings.iter().map(|s| s.team.as_str()).collect();

        // area points are not added on top of team points
        assert_eq!(order, vec!["Red", "Blue", "Green"]);
        assert_eq!(standings[0].points, 12);
        assert_eq!(standings[0].areas_held, 1);
        assert_eq!(standings[1].points, 7);
        assert_eq!(standings[1].areas_held, 2);
        assert_eq!(standings[2].areas_held, 0);
    }

    #[test]
    fn test_standings_ties_by_name() {
        let snapshot = Snapshot {
            areas: Vec::new(),
            teams: vec![team("Red", 3), team("Blue", 3), team("Amber", 1)],
        };
        let order: Vec<String> = snapshot.standings().into_iter().map(|s| s.team).collect();
        assert_eq!(order, vec!["Blue", "Red", "Amber"]);
    }

    #[test]
    fn test_unclaimed() {
        let snapshot = Snapshot {
            areas: vec![claimed("Park", "Blue", 3), AreaState::new("Station", 10)],
            teams: Vec::new(),
        };
        assert_eq!(snapshot.unclaimed().collect::<Vec<_>>(), vec!["Station"]);
        assert_eq!(snapshot.area("Park").and_then(|a| a.owner()), Some("Blue"));
        assert!(snapshot.team("Blue").is_none());
    }
}
