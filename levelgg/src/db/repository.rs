//! Repository trait definitions for testability and dependency injection.
//!
//! The engines never issue SQL themselves; every read and write goes through
//! [`Repository`], so the same code runs against PostgreSQL in production and
//! against [`MemoryRepository`](super::MemoryRepository) in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::profile::{PlayerId, Profile};
use crate::registration::{NewRegistration, Registration, RegistrationId, RegistrationStatus};
use crate::team::{MemberId, MemberRole, Position, Squad, Team, TeamId, TeamMember, TeamRoster};
use crate::tournament::{NewTournament, Tournament, TournamentId};

/// Error reported by the backing store. The message is passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Every store operation the engines depend on.
///
/// Each call is independent: nothing here spans a transaction, and the two
/// counter procedures are atomic only for their own row.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> StoreResult<()>;

    async fn find_profile(&self, player_id: PlayerId) -> StoreResult<Option<Profile>>;

    async fn find_tournament(&self, tournament_id: TournamentId)
    -> StoreResult<Option<Tournament>>;

    async fn insert_tournament(&self, tournament: &NewTournament) -> StoreResult<Tournament>;

    async fn find_team(&self, team_id: TeamId) -> StoreResult<Option<Team>>;

    async fn update_team_captain(
        &self,
        team_id: TeamId,
        captain_id: Option<PlayerId>,
    ) -> StoreResult<()>;

    /// Active membership of `player_id` in `team_id`, if any
    async fn find_active_membership(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
    ) -> StoreResult<Option<TeamMember>>;

    async fn update_member_role(&self, member_id: MemberId, role: MemberRole) -> StoreResult<()>;

    /// Set position, and squad when given, on the membership matching
    /// `(team_id, player_id)`. A `None` squad leaves the current one in place.
    async fn update_member_assignment(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
        position: Position,
        squad: Option<Squad>,
    ) -> StoreResult<()>;

    /// Teams holding a registration with `status` for the tournament, with rosters
    /// in membership order and each member's profile joined in
    async fn team_rosters(
        &self,
        tournament_id: TournamentId,
        status: RegistrationStatus,
    ) -> StoreResult<Vec<TeamRoster>>;

    async fn find_registration(
        &self,
        registration_id: RegistrationId,
    ) -> StoreResult<Option<Registration>>;

    async fn find_registration_for_team(
        &self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> StoreResult<Option<Registration>>;

    /// Registrations for a tournament, optionally filtered by status, each paired
    /// with the team's current `member_count` (0 when the team row is gone)
    async fn list_registrations(
        &self,
        tournament_id: TournamentId,
        status: Option<RegistrationStatus>,
    ) -> StoreResult<Vec<(Registration, u32)>>;

    async fn insert_registration(
        &self,
        registration: &NewRegistration,
    ) -> StoreResult<Registration>;

    async fn update_registration_status(
        &self,
        registration_id: RegistrationId,
        status: RegistrationStatus,
    ) -> StoreResult<Registration>;

    async fn delete_registration(&self, registration_id: RegistrationId) -> StoreResult<()>;

    /// Atomic single-row bump of `tournaments.registered_players`
    async fn increment_tournament_players(
        &self,
        tournament_id: TournamentId,
        amount: u32,
    ) -> StoreResult<()>;

    /// Atomic single-row decrease of `tournaments.registered_players`
    async fn decrement_tournament_players(
        &self,
        tournament_id: TournamentId,
        amount: u32,
    ) -> StoreResult<()>;
}

/// Whether `player_id` holds the admin flag. A missing profile is not an admin.
pub async fn is_admin(repo: &dyn Repository, player_id: PlayerId) -> StoreResult<bool> {
    Ok(repo
        .find_profile(player_id)
        .await?
        .is_some_and(|profile| profile.is_admin))
}
