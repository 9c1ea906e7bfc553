use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{RealtimeStore, Snapshot, StoreError};
use crate::domain::{AreaState, Coordinate, Position, Team};

/// In-process store with the same semantics as the hosted database
///
/// Useful for tests and for running a game session without a backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RealtimeStore for MemoryStore {
    fn areas(&self) -> Result<Vec<AreaState>, StoreError> {
        Ok(self.lock().areas.clone())
    }

    fn teams(&self) -> Result<Vec<Team>, StoreError> {
        Ok(self.lock().teams.clone())
    }

    fn claim_area(&self, team: &str, area: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        let record = state
            .areas
            .iter_mut()
            .find(|a| a.name == area)
            .ok_or_else(|| StoreError::AreaNotFound(area.to_string()))?;
        record.claim(team);
        Ok(())
    }

    fn set_team_position(&self, team: &str, position: Coordinate) -> Result<(), StoreError> {
        let mut state = self.lock();
        let record = state
            .teams
            .iter_mut()
            .find(|t| t.name == team)
            .ok_or_else(|| StoreError::TeamNotFound(team.to_string()))?;
        record.team_position = Some(Position::now(position));
        Ok(())
    }

    fn add_team(&self, name: &str, color: &str) -> Result<(), StoreError> {
        self.lock().teams.push(Team::new(name, color));
        Ok(())
    }

    fn delete_team(&self, name: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        let index = state
            .teams
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| StoreError::TeamNotFound(name.to_string()))?;
        state.teams.remove(index);
        Ok(())
    }

    fn add_area(&self, name: &str, points: i64) -> Result<(), StoreError> {
        self.lock().areas.push(AreaState::new(name, points));
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(self.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_area("Park", 3).unwrap();
        store.add_area("Harbour", 5).unwrap();
        store.add_team("Red", "#f00").unwrap();
        store.add_team("Blue", "#00f").unwrap();
        store
    }

    #[test]
    fn test_claim_last_write_wins() {
        let store = seeded();

        store.claim_area("Red", "Park").unwrap();
        store.claim_area("Blue", "Park").unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.area("Park").and_then(|a| a.owner()), Some("Blue"));
        assert_eq!(snapshot.area("Harbour").and_then(|a| a.owner()), None);
    }

    #[test]
    fn test_claim_unknown_area() {
        let store = seeded();
        let err = store.claim_area("Red", "Atlantis").unwrap_err();
        assert!(matches!(err, StoreError::AreaNotFound(ref name) if name == "Atlantis"));
    }

    #[test]
    fn test_team_position_and_delete() {
        let store = seeded();

        store
            .set_team_position("Red", Coordinate::new(58.585, 16.19))
            .unwrap();
        let teams = store.teams().unwrap();
        assert_eq!(teams[0].position(), Some(Coordinate::new(58.585, 16.19)));
        assert!(teams[0].team_position.and_then(|p| p.last_updated).is_some());

        store.delete_team("Red").unwrap();
        assert_eq!(store.teams().unwrap().len(), 1);
        assert!(matches!(
            store.delete_team("Red"),
            Err(StoreError::TeamNotFound(_))
        ));
        assert!(matches!(
            store.set_team_position("Red", Coordinate::new(0.0, 0.0)),
            Err(StoreError::TeamNotFound(_))
        ));
    }

    #[test]
    fn test_new_area_is_unclaimed() {
        let store = seeded();
        let areas = store.areas().unwrap();
        assert!(areas.iter().all(|a| !a.is_claimed() && a.claimed_by == "none"));
        assert_eq!(areas[1].points, 5);
    }
}
