//! Tournament manager: creation, lookup and registration statistics.

use super::models::{
    CreateTournamentRequest, NewTournament, Tournament, TournamentId, TournamentMode,
    TournamentStats,
};
use crate::db::{Repository, StoreError};
use crate::errors::ErrorKind;
use crate::profile::PlayerId;
use crate::registration::RegistrationStatus;
use std::sync::Arc;
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found")]
    NotFound(TournamentId),

    #[error("Only team leads and admins can create tournaments")]
    NotTeamLead,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid tournament mode: {0}")]
    InvalidMode(String),

    #[error("Max players for {mode} mode cannot exceed {ceiling}")]
    ExceedsModeCeiling { mode: TournamentMode, ceiling: u32 },

    #[error("Failed to create tournament: {0}")]
    CreateFailed(StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::NotFound(_) => ErrorKind::NotFound,
            TournamentError::NotTeamLead => ErrorKind::Authorization,
            TournamentError::MissingFields
            | TournamentError::InvalidMode(_)
            | TournamentError::ExceedsModeCeiling { .. } => ErrorKind::Validation,
            TournamentError::CreateFailed(_) | TournamentError::Store(_) => ErrorKind::Store,
        }
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    repo: Arc<dyn Repository>,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Create a tournament owned by `caller`.
    ///
    /// Only profiles flagged as team lead or admin may create tournaments, and
    /// `max_players` may not exceed the ceiling of the requested mode.
    pub async fn create_tournament(
        &self,
        caller: PlayerId,
        request: CreateTournamentRequest,
    ) -> TournamentResult<Tournament> {
        let allowed = self
            .repo
            .find_profile(caller)
            .await?
            .is_some_and(|p| p.is_team_lead || p.is_admin);
        if !allowed {
            return Err(TournamentError::NotTeamLead);
        }

        let new = validate_request(caller, request)?;
        let tournament = self
            .repo
            .insert_tournament(&new)
            .await
            .map_err(TournamentError::CreateFailed)?;

        log::info!(
            "Created {} tournament {} ({}) with capacity {}",
            tournament.mode,
            tournament.id,
            tournament.title,
            tournament.max_players
        );
        Ok(tournament)
    }

    /// Fetch a tournament or fail with `NotFound`
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> TournamentResult<Tournament> {
        self.repo
            .find_tournament(tournament_id)
            .await?
            .ok_or(TournamentError::NotFound(tournament_id))
    }

    /// Registration totals, summing each team's current member count
    pub async fn tournament_stats(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<TournamentStats> {
        let tournament = self.get_tournament(tournament_id).await?;
        let registrations = self.repo.list_registrations(tournament_id, None).await?;

        let mut stats = TournamentStats {
            tournament_id,
            title: tournament.title,
            max_players: tournament.max_players,
            registered_players: tournament.registered_players,
            confirmed_teams: 0,
            pending_teams: 0,
            confirmed_players: 0,
            pending_players: 0,
            total_teams: registrations.len(),
            slots_remaining: 0,
        };

        for (registration, member_count) in &registrations {
            match registration.status {
                RegistrationStatus::Confirmed => {
                    stats.confirmed_teams += 1;
                    stats.confirmed_players += member_count;
                }
                RegistrationStatus::Pending => {
                    stats.pending_teams += 1;
                    stats.pending_players += member_count;
                }
                RegistrationStatus::Cancelled => {}
            }
        }
        stats.slots_remaining =
            i64::from(stats.max_players) - i64::from(stats.confirmed_players);

        Ok(stats)
    }
}

fn validate_request(
    caller: PlayerId,
    request: CreateTournamentRequest,
) -> TournamentResult<NewTournament> {
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or(TournamentError::MissingFields)?;
    let mode_name = request.mode.ok_or(TournamentError::MissingFields)?;
    let max_players = request
        .max_players
        .filter(|&n| n > 0)
        .ok_or(TournamentError::MissingFields)?;

    let mode: TournamentMode = mode_name
        .parse()
        .map_err(|_| TournamentError::InvalidMode(mode_name))?;

    let ceiling = mode.max_players_ceiling();
    if max_players > ceiling {
        return Err(TournamentError::ExceedsModeCeiling { mode, ceiling });
    }

    Ok(NewTournament {
        title,
        mode,
        max_players,
        start_date: request.start_date,
        created_by: caller,
    })
}
