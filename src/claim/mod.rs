//! Geofenced claim gating
//!
//! [`evaluate_claim`] is the pure decision. [`ClaimGate`] feeds it from the
//! injected location and session sources and forwards allowed claims to the
//! realtime store.

pub mod gate;
pub mod location;
pub mod session;

pub use gate::{ClaimDecision, DenialReason, evaluate_claim};
pub use location::{FixedLocation, LatestFix, LocationProvider};
pub use session::{FileSession, MemorySession, SessionError, SessionStore};

use crate::dataset::AreaDataset;
use crate::store::{RealtimeStore, StoreError};

pub struct ClaimGate<'a, L, S> {
    dataset: &'a AreaDataset,
    location: L,
    session: S,
}

impl<'a, L: LocationProvider, S: SessionStore> ClaimGate<'a, L, S> {
    pub fn new(dataset: &'a AreaDataset, location: L, session: S) -> Self {
        Self {
            dataset,
            location,
            session,
        }
    }

    /// Evaluate a claim on `area` using the latest fix and selected team
    ///
    /// The fix may be up to one location interval old.
    pub fn evaluate(&self, area: &str) -> ClaimDecision {
        self.decide(area).1
    }

    fn decide(&self, area: &str) -> (String, ClaimDecision) {
        let team = self.session.selected_team().unwrap_or_default();
        let location = self.location.latest();
        let decision = evaluate_claim(&team, area, location, self.dataset);

        // denials are routine; never above info
        match decision {
            ClaimDecision::Allowed => tracing::debug!(team = %team, area, "claim allowed"),
            ClaimDecision::Denied(reason) => {
                tracing::info!(team = %team, area, %reason, "claim denied")
            }
        }

        (team, decision)
    }

    /// Evaluate and, when allowed, submit the claim to `store`
    pub fn claim<R: RealtimeStore>(&self, area: &str, store: &R) -> Result<ClaimDecision, StoreError> {
        let (team, decision) = self.decide(area);
        if decision.is_allowed() {
            store.claim_area(&team, area)?;
        }
        Ok(decision)
    }

    /// Report the latest fix as the selected team's position
    ///
    /// Does nothing until both a team and a fix are available.
    pub fn report_position<R: RealtimeStore>(&self, store: &R) -> Result<bool, StoreError> {
        match (self.session.selected_team(), self.location.latest()) {
            (Some(team), Some(fix)) if !team.is_empty() => {
                store.set_team_position(&team, fix)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
