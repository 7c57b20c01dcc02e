//! Registration capacity and counter bookkeeping.
//!
//! The registration row and the tournament's `registered_players` counter are
//! written by separate store calls. A failed counter call is logged and
//! reported through [`CounterSync::Failed`]; it never undoes the registration
//! change that triggered it.

use super::models::{
    CounterAdjustment, CounterSync, NewRegistration, RegisterTeamRequest, Registration,
    RegistrationChange, RegistrationId, RegistrationStatus, UpdateRegistrationRequest,
};
use crate::db::{Repository, StoreError, is_admin};
use crate::errors::ErrorKind;
use crate::profile::PlayerId;
use crate::team::TeamId;
use crate::tournament::{TournamentId, TournamentMode};
use std::sync::Arc;
use thiserror::Error;

/// Registration errors
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("team_id is required")]
    MissingTeamId,

    #[error("Invalid status. Must be PENDING, CONFIRMED, or CANCELLED")]
    InvalidStatus,

    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),

    #[error("Team not found")]
    TeamNotFound(TeamId),

    #[error("Registration not found")]
    NotFound,

    #[error("Tournament registration is closed")]
    RegistrationClosed,

    #[error("Tournament has already started")]
    AlreadyStarted,

    #[error("Cannot withdraw from a tournament that has already started")]
    WithdrawAfterStart,

    #[error("Cannot delete a registration for a tournament that has already started")]
    DeleteAfterStart,

    #[error("Only team captains can register their teams")]
    NotCaptain,

    #[error("Only team captains and admins can withdraw registrations")]
    NotCaptainOrAdmin,

    #[error("Only tournament creators and admins can update registrations")]
    NotCreatorOrAdmin,

    #[error("Only tournament creators, team captains and admins can delete registrations")]
    CannotDelete,

    #[error("Team needs at least {required} members for {mode} tournaments")]
    TeamTooSmall { required: u32, mode: TournamentMode },

    #[error("Team is already registered for this tournament")]
    AlreadyRegistered,

    #[error("Tournament has reached maximum capacity")]
    CapacityReached,

    #[error("Failed to register team: {0}")]
    RegisterFailed(StoreError),

    #[error("Failed to withdraw registration: {0}")]
    WithdrawFailed(StoreError),

    #[error("Failed to update registration: {0}")]
    UpdateFailed(StoreError),

    #[error("Failed to delete registration: {0}")]
    DeleteFailed(StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistrationError {
    pub fn kind(&self) -> ErrorKind {
        use RegistrationError::*;
        match self {
            TournamentNotFound(_) | TeamNotFound(_) | NotFound => ErrorKind::NotFound,
            NotCaptain | NotCaptainOrAdmin | NotCreatorOrAdmin | CannotDelete => {
                ErrorKind::Authorization
            }
            MissingTeamId
            | InvalidStatus
            | RegistrationClosed
            | AlreadyStarted
            | WithdrawAfterStart
            | DeleteAfterStart
            | TeamTooSmall { .. }
            | AlreadyRegistered
            | CapacityReached => ErrorKind::Validation,
            RegisterFailed(_) | WithdrawFailed(_) | UpdateFailed(_) | DeleteFailed(_) | Store(_) => {
                ErrorKind::Store
            }
        }
    }
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Registration manager
#[derive(Clone)]
pub struct RegistrationManager {
    repo: Arc<dyn Repository>,
}

impl RegistrationManager {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Register the caller's team for a tournament.
    ///
    /// The registration is created CONFIRMED, so the team's members are added
    /// to the tournament counter right away.
    pub async fn register_team(
        &self,
        caller: PlayerId,
        tournament_id: TournamentId,
        request: RegisterTeamRequest,
    ) -> RegistrationResult<RegistrationChange<Registration>> {
        let team_id = request.team_id.ok_or(RegistrationError::MissingTeamId)?;

        let tournament = self
            .repo
            .find_tournament(tournament_id)
            .await?
            .ok_or(RegistrationError::TournamentNotFound(tournament_id))?;
        if !tournament.is_active {
            return Err(RegistrationError::RegistrationClosed);
        }
        if tournament.is_started {
            return Err(RegistrationError::AlreadyStarted);
        }

        let team = self
            .repo
            .find_team(team_id)
            .await?
            .ok_or(RegistrationError::TeamNotFound(team_id))?;
        if team.captain_id != Some(caller) {
            return Err(RegistrationError::NotCaptain);
        }

        let required = tournament.mode.required_members();
        if team.member_count < required {
            return Err(RegistrationError::TeamTooSmall {
                required,
                mode: tournament.mode,
            });
        }

        if self
            .repo
            .find_registration_for_team(tournament_id, team_id)
            .await?
            .is_some()
        {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let confirmed_players: u64 = self
            .repo
            .list_registrations(tournament_id, Some(RegistrationStatus::Confirmed))
            .await?
            .iter()
            .map(|(_, member_count)| u64::from(*member_count))
            .sum();
        if confirmed_players + u64::from(team.member_count) > u64::from(tournament.max_players) {
            return Err(RegistrationError::CapacityReached);
        }

        let registration = self
            .repo
            .insert_registration(&NewRegistration {
                tournament_id,
                team_id,
                registered_by: caller,
                status: RegistrationStatus::Confirmed,
            })
            .await
            .map_err(RegistrationError::RegisterFailed)?;

        log::info!(
            "Team {} registered for tournament {} with {} players",
            team.name,
            tournament_id,
            team.member_count
        );

        let counter = self
            .apply(
                tournament_id,
                CounterAdjustment::Increment(team.member_count),
            )
            .await;

        Ok(RegistrationChange {
            value: registration,
            counter,
        })
    }

    /// Withdraw a team from a tournament that has not started yet
    pub async fn withdraw(
        &self,
        caller: PlayerId,
        tournament_id: TournamentId,
        team_id: Option<TeamId>,
    ) -> RegistrationResult<RegistrationChange<()>> {
        let team_id = team_id.ok_or(RegistrationError::MissingTeamId)?;

        let tournament = self
            .repo
            .find_tournament(tournament_id)
            .await?
            .ok_or(RegistrationError::TournamentNotFound(tournament_id))?;
        if tournament.is_started {
            return Err(RegistrationError::WithdrawAfterStart);
        }

        let registration = self
            .repo
            .find_registration_for_team(tournament_id, team_id)
            .await?
            .ok_or(RegistrationError::NotFound)?;

        if !self.is_captain(registration.team_id, caller).await?
            && !is_admin(self.repo.as_ref(), caller).await?
        {
            return Err(RegistrationError::NotCaptainOrAdmin);
        }

        self.repo
            .delete_registration(registration.id)
            .await
            .map_err(RegistrationError::WithdrawFailed)?;

        log::info!("Team {team_id} withdrew from tournament {tournament_id}");

        let counter = self.release(&registration).await;
        Ok(RegistrationChange { value: (), counter })
    }

    /// Move a registration to another status.
    ///
    /// Not blocked once the tournament has started. Moving to CONFIRMED adds the
    /// team's current member count to the counter and moving to CANCELLED
    /// subtracts it, whatever the previous status was.
    pub async fn update_status(
        &self,
        caller: PlayerId,
        registration_id: RegistrationId,
        request: UpdateRegistrationRequest,
    ) -> RegistrationResult<RegistrationChange<Registration>> {
        let status: RegistrationStatus = request
            .status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .ok_or(RegistrationError::InvalidStatus)?;

        let registration = self
            .repo
            .find_registration(registration_id)
            .await?
            .ok_or(RegistrationError::NotFound)?;

        if !self.is_creator(registration.tournament_id, caller).await?
            && !is_admin(self.repo.as_ref(), caller).await?
        {
            return Err(RegistrationError::NotCreatorOrAdmin);
        }

        let updated = self
            .repo
            .update_registration_status(registration_id, status)
            .await
            .map_err(RegistrationError::UpdateFailed)?;

        log::info!(
            "Registration {registration_id} moved from {} to {status}",
            registration.status
        );

        let counter = match self.current_member_count(updated.team_id).await {
            Ok(member_count) => match CounterAdjustment::for_transition(status, member_count) {
                Some(adjustment) => self.apply(updated.tournament_id, adjustment).await,
                None => CounterSync::NotNeeded,
            },
            Err(err) => counter_failed(updated.tournament_id, err),
        };

        Ok(RegistrationChange {
            value: updated,
            counter,
        })
    }

    /// Delete a registration by id before its tournament starts
    pub async fn delete_registration(
        &self,
        caller: PlayerId,
        registration_id: RegistrationId,
    ) -> RegistrationResult<RegistrationChange<()>> {
        let registration = self
            .repo
            .find_registration(registration_id)
            .await?
            .ok_or(RegistrationError::NotFound)?;
        let tournament = self.repo.find_tournament(registration.tournament_id).await?;

        let is_creator = tournament.as_ref().is_some_and(|t| t.created_by == caller);
        if !is_creator
            && !self.is_captain(registration.team_id, caller).await?
            && !is_admin(self.repo.as_ref(), caller).await?
        {
            return Err(RegistrationError::CannotDelete);
        }

        if tournament.is_some_and(|t| t.is_started) {
            return Err(RegistrationError::DeleteAfterStart);
        }

        self.repo
            .delete_registration(registration_id)
            .await
            .map_err(RegistrationError::DeleteFailed)?;

        log::info!("Registration {registration_id} deleted");

        let counter = self.release(&registration).await;
        Ok(RegistrationChange { value: (), counter })
    }

    async fn is_captain(&self, team_id: TeamId, player_id: PlayerId) -> RegistrationResult<bool> {
        Ok(self
            .repo
            .find_team(team_id)
            .await?
            .is_some_and(|team| team.captain_id == Some(player_id)))
    }

    async fn is_creator(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
    ) -> RegistrationResult<bool> {
        Ok(self
            .repo
            .find_tournament(tournament_id)
            .await?
            .is_some_and(|t| t.created_by == player_id))
    }

    /// Team size as the store reports it now; a vanished team counts as zero
    async fn current_member_count(&self, team_id: TeamId) -> Result<u32, StoreError> {
        Ok(self
            .repo
            .find_team(team_id)
            .await?
            .map_or(0, |team| team.member_count))
    }

    /// Give back the seats of a removed registration if it was confirmed
    async fn release(&self, registration: &Registration) -> CounterSync {
        if registration.status != RegistrationStatus::Confirmed {
            return CounterSync::NotNeeded;
        }
        match self.current_member_count(registration.team_id).await {
            Ok(member_count) => {
                self.apply(
                    registration.tournament_id,
                    CounterAdjustment::Decrement(member_count),
                )
                .await
            }
            Err(err) => counter_failed(registration.tournament_id, err),
        }
    }

    async fn apply(&self, tournament_id: TournamentId, adjustment: CounterAdjustment) -> CounterSync {
        let result = match adjustment {
            CounterAdjustment::Increment(amount) => {
                self.repo
                    .increment_tournament_players(tournament_id, amount)
                    .await
            }
            CounterAdjustment::Decrement(amount) => {
                self.repo
                    .decrement_tournament_players(tournament_id, amount)
                    .await
            }
        };
        match result {
            Ok(()) => CounterSync::Applied(adjustment),
            Err(err) => counter_failed(tournament_id, err),
        }
    }
}

fn counter_failed(tournament_id: TournamentId, err: StoreError) -> CounterSync {
    log::error!("Player counter for tournament {tournament_id} is out of sync: {err}");
    CounterSync::Failed(err)
}
