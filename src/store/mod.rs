//! Realtime store collaborator: live areas and teams, claim submission

pub mod memory;
pub mod rest;
pub mod snapshot;
pub mod subscription;

pub use memory::MemoryStore;
pub use rest::RestStore;
pub use snapshot::{Snapshot, Standing};
pub use subscription::Subscription;

use thiserror::Error;

use crate::domain::{AreaState, Coordinate, Team};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed")]
    Http(#[from] reqwest::Error),
    #[error("store returned error status {0}")]
    Status(u16),
    #[error("store request failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
    #[error("failed to decode store response")]
    Decode(#[from] serde_json::Error),
    #[error("area {0:?} not found in store")]
    AreaNotFound(String),
    #[error("team {0:?} not found in store")]
    TeamNotFound(String),
}

/// Operations the game needs from the shared realtime database
///
/// Writes are applied by the store as they arrive; concurrent claims on the
/// same area resolve to whichever write lands last.
pub trait RealtimeStore {
    fn areas(&self) -> Result<Vec<AreaState>, StoreError>;

    fn teams(&self) -> Result<Vec<Team>, StoreError>;

    /// Mark `area` as claimed by `team`
    fn claim_area(&self, team: &str, area: &str) -> Result<(), StoreError>;

    /// Record the last known position of `team`
    fn set_team_position(&self, team: &str, position: Coordinate) -> Result<(), StoreError>;

    fn add_team(&self, name: &str, color: &str) -> Result<(), StoreError>;

    fn delete_team(&self, name: &str) -> Result<(), StoreError>;

    /// Register a new unclaimed area worth `points`
    fn add_area(&self, name: &str, points: i64) -> Result<(), StoreError>;

    /// Areas and teams read together
    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot {
            areas: self.areas()?,
            teams: self.teams()?,
        })
    }
}

impl<T: RealtimeStore + ?Sized> RealtimeStore for &T {
    fn areas(&self) -> Result<Vec<AreaState>, StoreError> {
        (**self).areas()
    }

    fn teams(&self) -> Result<Vec<Team>, StoreError> {
        (**self).teams()
    }

    fn claim_area(&self, team: &str, area: &str) -> Result<(), StoreError> {
        (**self).claim_area(team, area)
    }

    fn set_team_position(&self, team: &str, position: Coordinate) -> Result<(), StoreError> {
        (**self).set_team_position(team, position)
    }

    fn add_team(&self, name: &str, color: &str) -> Result<(), StoreError> {
        (**self).add_team(name, color)
    }

    fn delete_team(&self, name: &str) -> Result<(), StoreError> {
        (**self).delete_team(name)
    }

    fn add_area(&self, name: &str, points: i64) -> Result<(), StoreError> {
        (**self).add_area(name, points)
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        (**self).snapshot()
    }
}
