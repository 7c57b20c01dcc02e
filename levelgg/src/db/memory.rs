//! In-process [`Repository`] used by tests and by the server's `--memory` mode.
//!
//! Rows live in plain collections behind a single [`RwLock`]. Fault switches
//! make individual writes fail so partial-failure paths can be exercised
//! without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{Repository, StoreError, StoreResult};
use crate::profile::{PlayerId, Profile};
use crate::registration::{NewRegistration, Registration, RegistrationId, RegistrationStatus};
use crate::team::{
    MemberId, MemberRole, Position, RosterEntry, RosterProfile, Squad, Team, TeamId, TeamMember,
    TeamRoster,
};
use crate::tournament::{NewTournament, Tournament, TournamentId};

#[derive(Default)]
struct Tables {
    profiles: HashMap<PlayerId, Profile>,
    tournaments: HashMap<TournamentId, Tournament>,
    teams: HashMap<TeamId, Team>,
    // Vecs keep insertion order, which stands in for `joined_at` / `registered_at`.
    members: Vec<TeamMember>,
    registrations: Vec<Registration>,
}

#[derive(Default)]
struct Faults {
    assignment_players: HashSet<PlayerId>,
    role_members: HashSet<MemberId>,
    counters: bool,
    unreachable: bool,
}

/// Repository backed by in-memory tables
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    faults: RwLock<Faults>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_profile(&self, profile: Profile) {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.id, profile);
    }

    pub async fn put_tournament(&self, tournament: Tournament) {
        self.tables
            .write()
            .await
            .tournaments
            .insert(tournament.id, tournament);
    }

    pub async fn put_team(&self, team: Team) {
        self.tables.write().await.teams.insert(team.id, team);
    }

    pub async fn put_member(&self, member: TeamMember) {
        self.tables.write().await.members.push(member);
    }

    pub async fn put_registration(&self, registration: Registration) {
        self.tables.write().await.registrations.push(registration);
    }

    pub async fn tournament(&self, tournament_id: TournamentId) -> Option<Tournament> {
        self.tables
            .read()
            .await
            .tournaments
            .get(&tournament_id)
            .cloned()
    }

    pub async fn team(&self, team_id: TeamId) -> Option<Team> {
        self.tables.read().await.teams.get(&team_id).cloned()
    }

    /// Overwrite a team's cached member count
    pub async fn set_member_count(&self, team_id: TeamId, member_count: u32) {
        if let Some(team) = self.tables.write().await.teams.get_mut(&team_id) {
            team.member_count = member_count;
        }
    }

    /// Mark the membership of `player_id` in `team_id` active or inactive
    pub async fn set_member_active(&self, team_id: TeamId, player_id: PlayerId, active: bool) {
        let mut tables = self.tables.write().await;
        for member in tables
            .members
            .iter_mut()
            .filter(|m| m.team_id == team_id && m.player_id == player_id)
        {
            member.is_active = active;
        }
    }

    pub async fn set_started(&self, tournament_id: TournamentId, started: bool) {
        if let Some(t) = self.tables.write().await.tournaments.get_mut(&tournament_id) {
            t.is_started = started;
        }
    }

    pub async fn member(&self, team_id: TeamId, player_id: PlayerId) -> Option<TeamMember> {
        self.tables
            .read()
            .await
            .members
            .iter()
            .find(|m| m.team_id == team_id && m.player_id == player_id)
            .cloned()
    }

    pub async fn registration(&self, registration_id: RegistrationId) -> Option<Registration> {
        self.tables
            .read()
            .await
            .registrations
            .iter()
            .find(|r| r.id == registration_id)
            .cloned()
    }

    /// Make position/squad updates for this player fail
    pub async fn fail_assignment_for(&self, player_id: PlayerId) {
        self.faults
            .write()
            .await
            .assignment_players
            .insert(player_id);
    }

    /// Make role updates on this membership fail
    pub async fn fail_role_update_for(&self, member_id: MemberId) {
        self.faults.write().await.role_members.insert(member_id);
    }

    /// Make both counter procedures fail
    pub async fn fail_counters(&self, fail: bool) {
        self.faults.write().await.counters = fail;
    }

    /// Make every call fail, as if the store were down
    pub async fn set_unreachable(&self, unreachable: bool) {
        self.faults.write().await.unreachable = unreachable;
    }

    async fn check_reachable(&self) -> StoreResult<()> {
        if self.faults.read().await.unreachable {
            return Err(StoreError::new("connection refused"));
        }
        Ok(())
    }

    async fn adjust_counter(&self, tournament_id: TournamentId, delta: i64) -> StoreResult<()> {
        self.check_reachable().await?;
        if self.faults.read().await.counters {
            return Err(StoreError::new("tournament player counter procedure failed"));
        }
        let mut tables = self.tables.write().await;
        if let Some(tournament) = tables.tournaments.get_mut(&tournament_id) {
            tournament.registered_players = (tournament.registered_players as i64 + delta) as i32;
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> StoreResult<()> {
        self.check_reachable().await
    }

    async fn find_profile(&self, player_id: PlayerId) -> StoreResult<Option<Profile>> {
        self.check_reachable().await?;
        Ok(self.tables.read().await.profiles.get(&player_id).cloned())
    }

    async fn find_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> StoreResult<Option<Tournament>> {
        self.check_reachable().await?;
        Ok(self.tournament(tournament_id).await)
    }

    async fn insert_tournament(&self, new: &NewTournament) -> StoreResult<Tournament> {
        self.check_reachable().await?;
        let tournament = Tournament {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            mode: new.mode,
            max_players: new.max_players,
            registered_players: 0,
            is_active: true,
            is_started: false,
            is_completed: false,
            start_date: new.start_date,
            created_by: new.created_by,
            created_at: Utc::now(),
        };
        self.put_tournament(tournament.clone()).await;
        Ok(tournament)
    }

    async fn find_team(&self, team_id: TeamId) -> StoreResult<Option<Team>> {
        self.check_reachable().await?;
        Ok(self.team(team_id).await)
    }

    async fn update_team_captain(
        &self,
        team_id: TeamId,
        captain_id: Option<PlayerId>,
    ) -> StoreResult<()> {
        self.check_reachable().await?;
        if let Some(team) = self.tables.write().await.teams.get_mut(&team_id) {
            team.captain_id = captain_id;
        }
        Ok(())
    }

    async fn find_active_membership(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
    ) -> StoreResult<Option<TeamMember>> {
        self.check_reachable().await?;
        Ok(self
            .tables
            .read()
            .await
            .members
            .iter()
            .find(|m| m.team_id == team_id && m.player_id == player_id && m.is_active)
            .cloned())
    }

    async fn update_member_role(&self, member_id: MemberId, role: MemberRole) -> StoreResult<()> {
        self.check_reachable().await?;
        if self.faults.read().await.role_members.contains(&member_id) {
            return Err(StoreError::new(format!(
                "permission denied for table team_members (member {member_id})"
            )));
        }
        let mut tables = self.tables.write().await;
        if let Some(member) = tables.members.iter_mut().find(|m| m.id == member_id) {
            member.role = role;
        }
        Ok(())
    }

    async fn update_member_assignment(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
        position: Position,
        squad: Option<Squad>,
    ) -> StoreResult<()> {
        self.check_reachable().await?;
        if self
            .faults
            .read()
            .await
            .assignment_players
            .contains(&player_id)
        {
            return Err(StoreError::new(format!(
                "could not update team_members for player {player_id}"
            )));
        }
        let mut tables = self.tables.write().await;
        for member in tables
            .members
            .iter_mut()
            .filter(|m| m.team_id == team_id && m.player_id == player_id)
        {
            member.position = Some(position);
            if squad.is_some() {
                member.squad_assignment = squad;
            }
        }
        Ok(())
    }

    async fn team_rosters(
        &self,
        tournament_id: TournamentId,
        status: RegistrationStatus,
    ) -> StoreResult<Vec<TeamRoster>> {
        self.check_reachable().await?;
        let tables = self.tables.read().await;
        let rosters = tables
            .registrations
            .iter()
            .filter(|r| r.tournament_id == tournament_id && r.status == status)
            .filter_map(|r| tables.teams.get(&r.team_id))
            .map(|team| {
                let entries = tables
                    .members
                    .iter()
                    .filter(|m| m.team_id == team.id)
                    .map(|member| RosterEntry {
                        member: member.clone(),
                        profile: tables.profiles.get(&member.player_id).map(|p| RosterProfile {
                            id: p.id,
                            username: p.username.clone(),
                            tier: p.tier,
                        }),
                    })
                    .collect();
                TeamRoster {
                    team: team.clone(),
                    entries,
                }
            })
            .collect();
        Ok(rosters)
    }

    async fn find_registration(
        &self,
        registration_id: RegistrationId,
    ) -> StoreResult<Option<Registration>> {
        self.check_reachable().await?;
        Ok(self.registration(registration_id).await)
    }

    async fn find_registration_for_team(
        &self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> StoreResult<Option<Registration>> {
        self.check_reachable().await?;
        Ok(self
            .tables
            .read()
            .await
            .registrations
            .iter()
            .find(|r| r.tournament_id == tournament_id && r.team_id == team_id)
            .cloned())
    }

    async fn list_registrations(
        &self,
        tournament_id: TournamentId,
        status: Option<RegistrationStatus>,
    ) -> StoreResult<Vec<(Registration, u32)>> {
        self.check_reachable().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .registrations
            .iter()
            .filter(|r| r.tournament_id == tournament_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .map(|r| {
                let member_count = tables.teams.get(&r.team_id).map_or(0, |t| t.member_count);
                (r.clone(), member_count)
            })
            .collect())
    }

    async fn insert_registration(&self, new: &NewRegistration) -> StoreResult<Registration> {
        self.check_reachable().await?;
        let mut tables = self.tables.write().await;
        if tables
            .registrations
            .iter()
            .any(|r| r.tournament_id == new.tournament_id && r.team_id == new.team_id)
        {
            return Err(StoreError::new(
                "duplicate key value violates unique constraint \"registrations_tournament_id_team_id_key\"",
            ));
        }
        let registration = Registration {
            id: Uuid::new_v4(),
            tournament_id: new.tournament_id,
            team_id: new.team_id,
            registered_by: Some(new.registered_by),
            status: new.status,
            registered_at: Utc::now(),
        };
        tables.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn update_registration_status(
        &self,
        registration_id: RegistrationId,
        status: RegistrationStatus,
    ) -> StoreResult<Registration> {
        self.check_reachable().await?;
        let mut tables = self.tables.write().await;
        let registration = tables
            .registrations
            .iter_mut()
            .find(|r| r.id == registration_id)
            .ok_or_else(|| {
                StoreError::new(
                    "no rows returned by a query that expected to return at least one row",
                )
            })?;
        registration.status = status;
        Ok(registration.clone())
    }

    async fn delete_registration(&self, registration_id: RegistrationId) -> StoreResult<()> {
        self.check_reachable().await?;
        self.tables
            .write()
            .await
            .registrations
            .retain(|r| r.id != registration_id);
        Ok(())
    }

    async fn increment_tournament_players(
        &self,
        tournament_id: TournamentId,
        amount: u32,
    ) -> StoreResult<()> {
        self.adjust_counter(tournament_id, i64::from(amount)).await
    }

    async fn decrement_tournament_players(
        &self,
        tournament_id: TournamentId,
        amount: u32,
    ) -> StoreResult<()> {
        self.adjust_counter(tournament_id, -i64::from(amount)).await
    }
}
