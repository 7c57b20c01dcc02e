//! Draft request, summary and overview models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::{PlayerId, Tier};
use crate::team::{MemberRole, Position, Squad, TeamId};
use crate::tournament::{TournamentId, TournamentMode};

/// How the caller wants players placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Auto,
    Manual,
}

/// One player's position and, optionally, squad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAssignment {
    pub player_id: PlayerId,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_assignment: Option<Squad>,
}

/// Assignments for every listed member of one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub team_id: TeamId,
    pub player_assignments: Vec<PlayerAssignment>,
}

/// Body of `POST /draft/{tournamentId}/assign`.
///
/// An unreadable body is treated as the empty request, which is rejected
/// after the caller has been authorized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub assignment_type: Option<AssignmentType>,
    pub team_assignments: Option<Vec<TeamAssignment>>,
}

/// Outcome of an assignment run. Failed member updates are counted, not undone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSummary {
    pub message: String,
    pub teams_processed: usize,
    pub players_assigned: usize,
    pub failed_assignments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftTournament {
    pub id: TournamentId,
    pub title: String,
    pub mode: TournamentMode,
    pub max_players: u32,
    pub registered_players: i32,
    pub is_started: bool,
}

/// A roster member as shown in the draft. Profile fields are empty when the
/// member has no profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftMember {
    pub id: Option<PlayerId>,
    pub username: Option<String>,
    pub tier: Option<Tier>,
    pub role: MemberRole,
    pub position: Option<Position>,
    pub squad_assignment: Option<Squad>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftTeam {
    pub id: TeamId,
    pub name: String,
    pub captain_id: Option<PlayerId>,
    pub member_count: u32,
    pub members: Vec<DraftMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPlayer {
    #[serde(flatten)]
    pub member: DraftMember,
    pub team_id: TeamId,
    pub team_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStatistics {
    pub total_teams: usize,
    pub total_players: usize,
    /// Keyed by tier name; players without a tier count as BRONZE
    pub players_by_tier: BTreeMap<String, usize>,
    /// Keyed by position name; players without a position count as INFANTRY
    pub players_by_position: BTreeMap<String, usize>,
    pub avg_team_size: usize,
}

/// Confirmed teams of a tournament with their current draft state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOverview {
    pub tournament: DraftTournament,
    pub teams: Vec<DraftTeam>,
    pub players: Vec<DraftPlayer>,
    pub statistics: DraftStatistics,
}

impl DraftStatistics {
    pub fn from_teams(teams: &[DraftTeam]) -> Self {
        let mut stats = DraftStatistics {
            total_teams: teams.len(),
            ..Default::default()
        };

        for member in teams.iter().flat_map(|team| &team.members) {
            stats.total_players += 1;
            let tier = member.tier.unwrap_or_default();
            *stats
                .players_by_tier
                .entry(tier.as_str().to_string())
                .or_default() += 1;
            let position = member.position.unwrap_or_default();
            *stats
                .players_by_position
                .entry(position.as_str().to_string())
                .or_default() += 1;
        }

        if stats.total_teams > 0 {
            stats.avg_team_size =
                (stats.total_players as f64 / stats.total_teams as f64).round() as usize;
        }
        stats
    }
}
