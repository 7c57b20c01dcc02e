//! Tournament data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::profile::PlayerId;

/// Tournament ID type
pub type TournamentId = Uuid;

/// Tournament format. Fixes the team size and the capacity ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TournamentMode {
    #[serde(rename = "8v8")]
    EightVsEight,
    #[serde(rename = "16v16")]
    SixteenVsSixteen,
    #[serde(rename = "32v32")]
    ThirtyTwoVsThirtyTwo,
    #[serde(rename = "64v64")]
    SixtyFourVsSixtyFour,
}

impl TournamentMode {
    pub const ALL: [TournamentMode; 4] = [
        TournamentMode::EightVsEight,
        TournamentMode::SixteenVsSixteen,
        TournamentMode::ThirtyTwoVsThirtyTwo,
        TournamentMode::SixtyFourVsSixtyFour,
    ];

    /// Players per side implied by the mode name.
    pub fn side_size(self) -> u32 {
        match self {
            TournamentMode::EightVsEight => 8,
            TournamentMode::SixteenVsSixteen => 16,
            TournamentMode::ThirtyTwoVsThirtyTwo => 32,
            TournamentMode::SixtyFourVsSixtyFour => 64,
        }
    }

    /// Minimum team `member_count` needed to register.
    pub fn required_members(self) -> u32 {
        self.side_size()
    }

    /// Largest `max_players` a tournament of this mode may be created with.
    ///
    /// Sized for as many 32-player teams as the mode has players per side.
    pub fn max_players_ceiling(self) -> u32 {
        self.side_size() * 32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TournamentMode::EightVsEight => "8v8",
            TournamentMode::SixteenVsSixteen => "16v16",
            TournamentMode::ThirtyTwoVsThirtyTwo => "32v32",
            TournamentMode::SixtyFourVsSixtyFour => "64v64",
        }
    }
}

impl fmt::Display for TournamentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TournamentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("Unknown tournament mode: {s}"))
    }
}

/// Tournament row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub title: String,
    pub mode: TournamentMode,
    pub max_players: u32,
    /// Aggregate of confirmed players, maintained by the counter procedures
    pub registered_players: i32,
    pub is_active: bool,
    pub is_started: bool,
    pub is_completed: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub created_by: PlayerId,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTournament {
    pub title: String,
    pub mode: TournamentMode,
    pub max_players: u32,
    pub start_date: Option<DateTime<Utc>>,
    pub created_by: PlayerId,
}

/// Registration totals for one tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentStats {
    pub tournament_id: TournamentId,
    pub title: String,
    pub max_players: u32,
    pub registered_players: i32,
    pub confirmed_teams: usize,
    pub pending_teams: usize,
    pub confirmed_players: u32,
    pub pending_players: u32,
    pub total_teams: usize,
    pub slots_remaining: i64,
}

/// Body of a tournament creation request, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTournamentRequest {
    pub title: Option<String>,
    pub mode: Option<String>,
    pub max_players: Option<u32>,
    pub start_date: Option<DateTime<Utc>>,
}
