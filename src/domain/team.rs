use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::Coordinate;

/// Last reported position of a team, in the store's record shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Time of the report in milliseconds since the Unix epoch
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<u64>,
}

impl Position {
    /// Position reported at `millis` since the Unix epoch
    pub fn at(c: Coordinate, millis: u64) -> Self {
        Self {
            last_updated: Some(millis),
            ..Self::from(c)
        }
    }

    /// Position reported now
    pub fn now(c: Coordinate) -> Self {
        Self::at(c, now_millis())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl From<Coordinate> for Position {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.lat,
            longitude: c.lng,
            last_updated: None,
        }
    }
}

impl From<Position> for Coordinate {
    fn from(p: Position) -> Self {
        Coordinate::new(p.latitude, p.longitude)
    }
}

/// A team as stored in the realtime database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub team_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_position: Option<Position>,
    #[serde(default)]
    pub points: i64,
}

impl Team {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team_color: color.into(),
            team_position: None,
            points: 0,
        }
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.team_position.map(Coordinate::from)
    }
}
