//! Registration data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::db::StoreError;
use crate::profile::PlayerId;
use crate::team::TeamId;
use crate::tournament::TournamentId;

/// Registration ID type
pub type RegistrationId = Uuid;

/// Registration status. Any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "PENDING",
            RegistrationStatus::Confirmed => "CONFIRMED",
            RegistrationStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RegistrationStatus::Pending),
            "CONFIRMED" => Ok(RegistrationStatus::Confirmed),
            "CANCELLED" => Ok(RegistrationStatus::Cancelled),
            other => Err(format!("Unknown registration status: {other}")),
        }
    }
}

/// Binds one team to one tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
    pub registered_by: Option<PlayerId>,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// Fields supplied when inserting a registration
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
    pub registered_by: PlayerId,
    pub status: RegistrationStatus,
}

/// Change applied to the tournament's aggregate player counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAdjustment {
    Increment(u32),
    Decrement(u32),
}

impl CounterAdjustment {
    /// Adjustment triggered by moving a registration to `status`.
    ///
    /// PENDING leaves the counter untouched.
    pub fn for_transition(status: RegistrationStatus, member_count: u32) -> Option<Self> {
        match status {
            RegistrationStatus::Confirmed => Some(CounterAdjustment::Increment(member_count)),
            RegistrationStatus::Cancelled => Some(CounterAdjustment::Decrement(member_count)),
            RegistrationStatus::Pending => None,
        }
    }
}

/// Body of a team registration request; also the withdrawal query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterTeamRequest {
    pub team_id: Option<TeamId>,
}

/// Body of a registration status change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRegistrationRequest {
    pub status: Option<String>,
}

/// What happened to the tournament's player counter after a registration change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterSync {
    /// The change does not touch the counter
    NotNeeded,
    Applied(CounterAdjustment),
    /// The counter call failed; the registration change itself stands
    Failed(StoreError),
}

impl CounterSync {
    pub fn is_failed(&self) -> bool {
        matches!(self, CounterSync::Failed(_))
    }
}

/// Result of a registration change together with its counter compensation
#[derive(Debug, Clone)]
pub struct RegistrationChange<T> {
    pub value: T,
    pub counter: CounterSync,
}
