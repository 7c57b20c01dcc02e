//! Team, membership, position and squad models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::profile::{PlayerId, Tier};

/// Team ID type
pub type TeamId = Uuid;

/// Team membership row ID type
pub type MemberId = Uuid;

/// Role archetype a player fills within their team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    #[default]
    Infantry,
    Armor,
    Heli,
    Jet,
    Support,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Infantry,
        Position::Armor,
        Position::Heli,
        Position::Jet,
        Position::Support,
    ];

    /// Vehicle roles whose head count is capped during auto-assignment.
    pub fn is_specialized(self) -> bool {
        matches!(self, Position::Armor | Position::Heli | Position::Jet)
    }

    /// Dense index into per-position counters.
    pub fn index(self) -> usize {
        match self {
            Position::Infantry => 0,
            Position::Armor => 1,
            Position::Heli => 2,
            Position::Jet => 3,
            Position::Support => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Infantry => "INFANTRY",
            Position::Armor => "ARMOR",
            Position::Heli => "HELI",
            Position::Jet => "JET",
            Position::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| format!("Unknown position: {s}"))
    }
}

/// Named sub-group within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Squad {
    Alpha,
    Bravo,
    Charlie,
    Delta,
    Echo,
    Foxtrot,
    Golf,
    Hotel,
}

impl Squad {
    /// Round-robin order used by the draft.
    pub const ROTATION: [Squad; 8] = [
        Squad::Alpha,
        Squad::Bravo,
        Squad::Charlie,
        Squad::Delta,
        Squad::Echo,
        Squad::Foxtrot,
        Squad::Golf,
        Squad::Hotel,
    ];

    /// Squad for the given zero-based slot, wrapping after HOTEL.
    pub fn for_slot(slot: usize) -> Squad {
        Squad::ROTATION[slot % Squad::ROTATION.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Squad::Alpha => "ALPHA",
            Squad::Bravo => "BRAVO",
            Squad::Charlie => "CHARLIE",
            Squad::Delta => "DELTA",
            Squad::Echo => "ECHO",
            Squad::Foxtrot => "FOXTROT",
            Squad::Golf => "GOLF",
            Squad::Hotel => "HOTEL",
        }
    }
}

impl fmt::Display for Squad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Squad {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Squad::ROTATION
            .into_iter()
            .find(|squad| squad.as_str() == s)
            .ok_or_else(|| format!("Unknown squad: {s}"))
    }
}

/// Membership role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Captain,
    Member,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberRole::Captain => "CAPTAIN",
            MemberRole::Member => "MEMBER",
        }
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAPTAIN" => Ok(MemberRole::Captain),
            "MEMBER" => Ok(MemberRole::Member),
            other => Err(format!("Unknown member role: {other}")),
        }
    }
}

/// Team row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub captain_id: Option<PlayerId>,
    /// Cached count of active members, maintained by the store
    pub member_count: u32,
    pub max_members: u32,
}

/// Team membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: MemberId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub role: MemberRole,
    pub position: Option<Position>,
    pub squad_assignment: Option<Squad>,
    pub is_active: bool,
}

/// A membership joined with the member's profile, as read for the draft.
///
/// `profile` is `None` when the membership's player has no resolvable profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub member: TeamMember,
    pub profile: Option<RosterProfile>,
}

/// Profile columns the draft needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterProfile {
    pub id: PlayerId,
    pub username: String,
    pub tier: Option<Tier>,
}

/// A team with its full roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team: Team,
    pub entries: Vec<RosterEntry>,
}

/// Body of a captaincy transfer request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferCaptaincyRequest {
    pub new_captain_id: Option<PlayerId>,
}
