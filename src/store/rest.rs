use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::time::Duration;

use super::{RealtimeStore, StoreError};
use crate::config::StoreConfig;
use crate::domain::{AreaState, Coordinate, Position, Team};

const USER_AGENT: &str = concat!("areaclaim/", env!("CARGO_PKG_VERSION"));

const AREAS: &str = "areas";
const TEAMS: &str = "teams";

/// Client for a Firebase-style realtime database over its REST interface
///
/// Collections live at `{database_url}/{collection}.json` as objects keyed by
/// push id; records are located by their `name` field.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    database_url: String,
    auth_token: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::from_client(client, config))
    }

    fn from_client(client: Client, config: &StoreConfig) -> Self {
        Self {
            client,
            database_url: config.database_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.database_url, path)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token)]),
            None => request,
        }
    }

    /// Send a request, retrying when the store reports it is overloaded
    fn send(&self, build: impl Fn(&Client) -> RequestBuilder) -> Result<Response, StoreError> {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let wait = self.retry_delay * attempt;
                tracing::warn!(
                    attempt = attempt + 1,
                    max = self.max_retries,
                    wait_secs = wait.as_secs_f32(),
                    "store busy, retrying"
                );
                std::thread::sleep(wait);
            }

            let response = self.with_auth(build(&self.client)).send()?;

            match response.status().as_u16() {
                200..=299 => return Ok(response),
                // 429 = Too Many Requests, 503/504 = overloaded upstream
                429 | 503 | 504 => {
                    last_error = Some(format!(
                        "status {} (attempt {})",
                        response.status(),
                        attempt + 1
                    ));
                }
                status => return Err(StoreError::Status(status)),
            }
        }

        Err(StoreError::RetriesExhausted {
            attempts: self.max_retries,
            last: last_error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Read a whole collection; an absent collection reads as empty
    fn collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<(String, T)>, StoreError> {
        let url = self.url(name);
        let body = self.send(|c| c.get(&url))?.text()?;
        decode_collection(&body)
    }

    /// Push id of the record in `collection` whose `name` equals `name`
    fn find_key(&self, collection: &str, name: &str) -> Result<Option<String>, StoreError> {
        let records: Vec<(String, Value)> = self.collection(collection)?;
        Ok(records
            .into_iter()
            .find(|(_, record)| record.get("name").and_then(Value::as_str) == Some(name))
            .map(|(key, _)| key))
    }

    fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<(), StoreError> {
        let url = self.url(path);
        self.send(|c| c.patch(&url).json(body))?;
        Ok(())
    }

    fn push<B: Serialize>(&self, collection: &str, body: &B) -> Result<(), StoreError> {
        let url = self.url(collection);
        self.send(|c| c.post(&url).json(body))?;
        Ok(())
    }
}

fn decode_collection<T: DeserializeOwned>(body: &str) -> Result<Vec<(String, T)>, StoreError> {
    // Push ids sort chronologically, so key order is insertion order
    let records: Option<BTreeMap<String, T>> = serde_json::from_str(body)?;
    Ok(records.unwrap_or_default().into_iter().collect())
}

impl RealtimeStore for RestStore {
    fn areas(&self) -> Result<Vec<AreaState>, StoreError> {
        let areas: Vec<(String, AreaState)> = self.collection(AREAS)?;
        tracing::debug!(count = areas.len(), "fetched areas");
        Ok(areas.into_iter().map(|(_, a)| a).collect())
    }

    fn teams(&self) -> Result<Vec<Team>, StoreError> {
        let teams: Vec<(String, Team)> = self.collection(TEAMS)?;
        tracing::debug!(count = teams.len(), "fetched teams");
        Ok(teams.into_iter().map(|(_, t)| t).collect())
    }

    fn claim_area(&self, team: &str, area: &str) -> Result<(), StoreError> {
        let key = self
            .find_key(AREAS, area)?
            .ok_or_else(|| StoreError::AreaNotFound(area.to_string()))?;

        self.patch(
            &format!("{AREAS}/{key}"),
            &json!({ "status": "claimed", "claimedBy": team }),
        )?;
        tracing::info!(team, area, "area claimed");
        Ok(())
    }

    fn set_team_position(&self, team: &str, position: Coordinate) -> Result<(), StoreError> {
        let key = self
            .find_key(TEAMS, team)?
            .ok_or_else(|| StoreError::TeamNotFound(team.to_string()))?;

        self.patch(
            &format!("{TEAMS}/{key}"),
            &json!({ "teamPosition": Position::now(position) }),
        )
    }

    fn add_team(&self, name: &str, color: &str) -> Result<(), StoreError> {
        self.push(TEAMS, &Team::new(name, color))?;
        tracing::info!(team = name, "team added");
        Ok(())
    }

    fn delete_team(&self, name: &str) -> Result<(), StoreError> {
        let key = self
            .find_key(TEAMS, name)?
            .ok_or_else(|| StoreError::TeamNotFound(name.to_string()))?;

        let url = self.url(&format!("{TEAMS}/{key}"));
        self.send(|c| c.delete(&url))?;
        tracing::info!(team = name, "team deleted");
        Ok(())
    }

    fn add_area(&self, name: &str, points: i64) -> Result<(), StoreError> {
        self.push(AREAS, &AreaState::new(name, points))
    }
}
