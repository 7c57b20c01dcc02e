//! Draft manager: authorizes and applies auto or manual assignments.

use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use super::models::{
    AssignmentRequest, AssignmentSummary, AssignmentType, DraftMember, DraftOverview,
    DraftPlayer, DraftStatistics, DraftTeam, DraftTournament, TeamAssignment,
};
use super::planner::plan_auto_assignment;
use crate::db::{Repository, StoreError, is_admin};
use crate::errors::ErrorKind;
use crate::profile::PlayerId;
use crate::registration::RegistrationStatus;
use crate::tournament::{Tournament, TournamentId};

/// Draft errors
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),

    #[error("Only tournament creators and admins can assign players")]
    NotCreatorOrAdmin,

    #[error("Only tournament creators and admins can access draft data")]
    OverviewForbidden,

    #[error("Cannot modify assignments after tournament has started")]
    AlreadyStarted,

    #[error("Invalid assignment type or missing data")]
    InvalidRequest,

    #[error("Failed to fetch registrations: {0}")]
    FetchRegistrations(StoreError),

    #[error("Validation failed: {0}")]
    ValidateTeams(StoreError),

    #[error("Failed to fetch tournament data: {0}")]
    FetchDraft(StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DraftError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DraftError::TournamentNotFound(_) => ErrorKind::NotFound,
            DraftError::NotCreatorOrAdmin | DraftError::OverviewForbidden => {
                ErrorKind::Authorization
            }
            DraftError::AlreadyStarted | DraftError::InvalidRequest => ErrorKind::Validation,
            DraftError::FetchRegistrations(_)
            | DraftError::ValidateTeams(_)
            | DraftError::FetchDraft(_)
            | DraftError::Store(_) => ErrorKind::Store,
        }
    }
}

pub type DraftResult<T> = Result<T, DraftError>;

/// Draft manager
#[derive(Clone)]
pub struct DraftManager {
    repo: Arc<dyn Repository>,
}

impl DraftManager {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Assign positions and squads for a tournament that has not started.
    ///
    /// Only the tournament creator or an admin may call this.
    pub async fn assign(
        &self,
        caller: PlayerId,
        tournament_id: TournamentId,
        request: AssignmentRequest,
    ) -> DraftResult<AssignmentSummary> {
        let tournament = self
            .authorize(caller, tournament_id, DraftError::NotCreatorOrAdmin)
            .await?;
        if tournament.is_started {
            return Err(DraftError::AlreadyStarted);
        }

        match (request.assignment_type, request.team_assignments) {
            (Some(AssignmentType::Auto), _) => self.auto_assign(tournament_id).await,
            (Some(AssignmentType::Manual), Some(assignments)) => {
                self.manual_assign(tournament_id, assignments).await
            }
            _ => Err(DraftError::InvalidRequest),
        }
    }

    async fn auto_assign(&self, tournament_id: TournamentId) -> DraftResult<AssignmentSummary> {
        let rosters = self
            .repo
            .team_rosters(tournament_id, RegistrationStatus::Confirmed)
            .await
            .map_err(DraftError::FetchRegistrations)?;

        let plan = plan_auto_assignment(&rosters);
        let failed = self.apply(&plan).await;

        Ok(summarize("Auto-assignment completed", &plan, failed))
    }

    /// Apply caller-supplied assignments. Teams without a confirmed
    /// registration are dropped without error.
    async fn manual_assign(
        &self,
        tournament_id: TournamentId,
        assignments: Vec<TeamAssignment>,
    ) -> DraftResult<AssignmentSummary> {
        let confirmed: HashSet<_> = self
            .repo
            .list_registrations(tournament_id, Some(RegistrationStatus::Confirmed))
            .await
            .map_err(DraftError::ValidateTeams)?
            .into_iter()
            .map(|(registration, _)| registration.team_id)
            .collect();

        let accepted: Vec<_> = assignments
            .into_iter()
            .filter(|assignment| confirmed.contains(&assignment.team_id))
            .collect();

        let failed = self.apply(&accepted).await;

        Ok(summarize("Manual assignment completed", &accepted, failed))
    }

    /// Issue every member update at once and wait for all of them.
    ///
    /// Returns how many failed. Successful updates are kept.
    async fn apply(&self, plan: &[TeamAssignment]) -> usize {
        let updates = plan.iter().flat_map(move |team| {
            team.player_assignments.iter().map(move |player| async move {
                self.repo
                    .update_member_assignment(
                        team.team_id,
                        player.player_id,
                        player.position,
                        player.squad_assignment,
                    )
                    .await
                    .map_err(|err| (player.player_id, err))
            })
        });

        let failures: Vec<_> = join_all(updates)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if !failures.is_empty() {
            log::error!("{} assignment update(s) failed", failures.len());
            for (player_id, err) in &failures {
                log::error!("Assignment for player {player_id} failed: {err}");
            }
        }
        failures.len()
    }

    /// Confirmed teams with their current positions, squads and tiers
    pub async fn overview(
        &self,
        caller: PlayerId,
        tournament_id: TournamentId,
    ) -> DraftResult<DraftOverview> {
        let tournament = self
            .authorize(caller, tournament_id, DraftError::OverviewForbidden)
            .await?;

        let rosters = self
            .repo
            .team_rosters(tournament_id, RegistrationStatus::Confirmed)
            .await
            .map_err(DraftError::FetchDraft)?;

        let teams: Vec<DraftTeam> = rosters
            .into_iter()
            .map(|roster| DraftTeam {
                id: roster.team.id,
                name: roster.team.name,
                captain_id: roster.team.captain_id,
                member_count: roster.team.member_count,
                members: roster
                    .entries
                    .into_iter()
                    .map(|entry| DraftMember {
                        id: entry.profile.as_ref().map(|p| p.id),
                        username: entry.profile.as_ref().map(|p| p.username.clone()),
                        tier: entry.profile.and_then(|p| p.tier),
                        role: entry.member.role,
                        position: entry.member.position,
                        squad_assignment: entry.member.squad_assignment,
                    })
                    .collect(),
            })
            .collect();

        let players = teams
            .iter()
            .flat_map(|team| {
                team.members.iter().map(|member| DraftPlayer {
                    member: member.clone(),
                    team_id: team.id,
                    team_name: team.name.clone(),
                })
            })
            .collect();

        let statistics = DraftStatistics::from_teams(&teams);

        Ok(DraftOverview {
            tournament: DraftTournament {
                id: tournament.id,
                title: tournament.title,
                mode: tournament.mode,
                max_players: tournament.max_players,
                registered_players: tournament.registered_players,
                is_started: tournament.is_started,
            },
            teams,
            players,
            statistics,
        })
    }

    async fn authorize(
        &self,
        caller: PlayerId,
        tournament_id: TournamentId,
        denied: DraftError,
    ) -> DraftResult<Tournament> {
        let tournament = self
            .repo
            .find_tournament(tournament_id)
            .await?
            .ok_or(DraftError::TournamentNotFound(tournament_id))?;

        if tournament.created_by != caller && !is_admin(self.repo.as_ref(), caller).await? {
            return Err(denied);
        }
        Ok(tournament)
    }
}

fn summarize(message: &str, plan: &[TeamAssignment], failed: usize) -> AssignmentSummary {
    AssignmentSummary {
        message: message.to_string(),
        teams_processed: plan.len(),
        players_assigned: plan.iter().map(|t| t.player_assignments.len()).sum(),
        failed_assignments: failed,
    }
}
