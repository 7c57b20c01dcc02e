//! PostgreSQL implementation of [`Repository`].

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::repository::{Repository, StoreError, StoreResult};
use crate::profile::{PlayerId, Profile, Tier};
use crate::registration::{NewRegistration, Registration, RegistrationId, RegistrationStatus};
use crate::team::{
    MemberId, MemberRole, Position, RosterEntry, RosterProfile, Squad, Team, TeamId, TeamMember,
    TeamRoster,
};
use crate::tournament::{NewTournament, Tournament, TournamentId, TournamentMode};

const TOURNAMENT_COLUMNS: &str = "id, title, mode, max_players, registered_players, is_active, \
     is_started, is_completed, start_date, created_by, created_at";

const REGISTRATION_COLUMNS: &str = "id, tournament_id, team_id, registered_by, status, registered_at";

const MEMBER_COLUMNS: &str = "id, team_id, player_id, role, position, squad_assignment, is_active";

/// Repository over a shared sqlx connection pool
#[derive(Clone)]
pub struct PgRepository {
    pool: Arc<PgPool>,
}

impl PgRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Parse a required enum column
fn parse_column<T: FromStr<Err = String>>(row: &PgRow, column: &str) -> StoreResult<T> {
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(StoreError::new)
}

/// Parse a nullable enum column; unrecognised values read as absent
fn parse_optional<T: FromStr>(row: &PgRow, column: &str) -> StoreResult<Option<T>> {
    let raw: Option<String> = row.try_get(column)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

fn tournament_from_row(row: &PgRow) -> StoreResult<Tournament> {
    Ok(Tournament {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        mode: parse_column::<TournamentMode>(row, "mode")?,
        max_players: non_negative(row.try_get("max_players")?),
        registered_players: row.try_get("registered_players")?,
        is_active: row.try_get("is_active")?,
        is_started: row.try_get("is_started")?,
        is_completed: row.try_get("is_completed")?,
        start_date: row.try_get("start_date")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
    })
}

fn team_from_row(row: &PgRow) -> StoreResult<Team> {
    Ok(Team {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        captain_id: row.try_get("captain_id")?,
        member_count: non_negative(row.try_get("member_count")?),
        max_members: non_negative(row.try_get("max_members")?),
    })
}

fn member_from_row(row: &PgRow) -> StoreResult<TeamMember> {
    Ok(TeamMember {
        id: row.try_get("id")?,
        team_id: row.try_get("team_id")?,
        player_id: row.try_get("player_id")?,
        role: parse_column::<MemberRole>(row, "role")?,
        position: parse_optional::<Position>(row, "position")?,
        squad_assignment: parse_optional::<Squad>(row, "squad_assignment")?,
        is_active: row.try_get("is_active")?,
    })
}

fn registration_from_row(row: &PgRow) -> StoreResult<Registration> {
    Ok(Registration {
        id: row.try_get("id")?,
        tournament_id: row.try_get("tournament_id")?,
        team_id: row.try_get("team_id")?,
        registered_by: row.try_get("registered_by")?,
        status: parse_column::<RegistrationStatus>(row, "status")?,
        registered_at: row.try_get("registered_at")?,
    })
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }

    async fn find_profile(&self, player_id: PlayerId) -> StoreResult<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, username, tier, is_admin, is_team_lead FROM profiles WHERE id = $1",
        )
        .bind(player_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| {
            Ok(Profile {
                id: r.try_get("id")?,
                username: r.try_get("username")?,
                tier: parse_optional::<Tier>(&r, "tier")?,
                is_admin: r.try_get("is_admin")?,
                is_team_lead: r.try_get("is_team_lead")?,
            })
        })
        .transpose()
    }

    async fn find_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> StoreResult<Option<Tournament>> {
        let row = sqlx::query(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1"
        ))
        .bind(tournament_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(tournament_from_row).transpose()
    }

    async fn insert_tournament(&self, tournament: &NewTournament) -> StoreResult<Tournament> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tournaments (title, mode, max_players, start_date, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TOURNAMENT_COLUMNS}
            "#
        ))
        .bind(&tournament.title)
        .bind(tournament.mode.as_str())
        .bind(tournament.max_players as i32)
        .bind(tournament.start_date)
        .bind(tournament.created_by)
        .fetch_one(self.pool.as_ref())
        .await?;

        tournament_from_row(&row)
    }

    async fn find_team(&self, team_id: TeamId) -> StoreResult<Option<Team>> {
        let row = sqlx::query(
            "SELECT id, name, captain_id, member_count, max_members FROM teams WHERE id = $1",
        )
        .bind(team_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(team_from_row).transpose()
    }

    async fn update_team_captain(
        &self,
        team_id: TeamId,
        captain_id: Option<PlayerId>,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE teams SET captain_id = $1 WHERE id = $2")
            .bind(captain_id)
            .bind(team_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn find_active_membership(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
    ) -> StoreResult<Option<TeamMember>> {
        let row = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members \
             WHERE team_id = $1 AND player_id = $2 AND is_active"
        ))
        .bind(team_id)
        .bind(player_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(member_from_row).transpose()
    }

    async fn update_member_role(&self, member_id: MemberId, role: MemberRole) -> StoreResult<()> {
        sqlx::query("UPDATE team_members SET role = $1 WHERE id = $2")
            .bind(role.as_str())
            .bind(member_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn update_member_assignment(
        &self,
        team_id: TeamId,
        player_id: PlayerId,
        position: Position,
        squad: Option<Squad>,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE team_members SET position = $1, squad_assignment = COALESCE($2, squad_assignment) \
             WHERE team_id = $3 AND player_id = $4",
        )
        .bind(position.as_str())
        .bind(squad.map(Squad::as_str))
        .bind(team_id)
        .bind(player_id)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn team_rosters(
        &self,
        tournament_id: TournamentId,
        status: RegistrationStatus,
    ) -> StoreResult<Vec<TeamRoster>> {
        let team_rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.captain_id, t.member_count, t.max_members
            FROM registrations r
            JOIN teams t ON t.id = r.team_id
            WHERE r.tournament_id = $1 AND r.status = $2
            ORDER BY r.registered_at, r.id
            "#,
        )
        .bind(tournament_id)
        .bind(status.as_str())
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut rosters = team_rows
            .iter()
            .map(|row| {
                Ok(TeamRoster {
                    team: team_from_row(row)?,
                    entries: Vec::new(),
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        if rosters.is_empty() {
            return Ok(rosters);
        }

        let team_ids: Vec<Uuid> = rosters.iter().map(|r| r.team.id).collect();
        let member_rows = sqlx::query(
            r#"
            SELECT m.id, m.team_id, m.player_id, m.role, m.position, m.squad_assignment,
                   m.is_active, p.id AS profile_id, p.username, p.tier
            FROM team_members m
            LEFT JOIN profiles p ON p.id = m.player_id
            WHERE m.team_id = ANY($1)
            ORDER BY m.joined_at, m.id
            "#,
        )
        .bind(&team_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        for row in &member_rows {
            let member = member_from_row(row)?;
            let profile_id: Option<Uuid> = row.try_get("profile_id")?;
            let profile = match profile_id {
                Some(id) => Some(RosterProfile {
                    id,
                    username: row.try_get("username")?,
                    tier: parse_optional::<Tier>(row, "tier")?,
                }),
                None => None,
            };
            if let Some(roster) = rosters.iter_mut().find(|r| r.team.id == member.team_id) {
                roster.entries.push(RosterEntry { member, profile });
            }
        }

        Ok(rosters)
    }

    async fn find_registration(
        &self,
        registration_id: RegistrationId,
    ) -> StoreResult<Option<Registration>> {
        let row = sqlx::query(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
        ))
        .bind(registration_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(registration_from_row).transpose()
    }

    async fn find_registration_for_team(
        &self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> StoreResult<Option<Registration>> {
        let row = sqlx::query(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE tournament_id = $1 AND team_id = $2"
        ))
        .bind(tournament_id)
        .bind(team_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(registration_from_row).transpose()
    }

    async fn list_registrations(
        &self,
        tournament_id: TournamentId,
        status: Option<RegistrationStatus>,
    ) -> StoreResult<Vec<(Registration, u32)>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.tournament_id, r.team_id, r.registered_by, r.status, r.registered_at,
                   COALESCE(t.member_count, 0) AS member_count
            FROM registrations r
            LEFT JOIN teams t ON t.id = r.team_id
            WHERE r.tournament_id = $1 AND ($2::TEXT IS NULL OR r.status = $2)
            ORDER BY r.registered_at, r.id
            "#,
        )
        .bind(tournament_id)
        .bind(status.map(RegistrationStatus::as_str))
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter()
            .map(|row| {
                let member_count = non_negative(row.try_get("member_count")?);
                Ok((registration_from_row(row)?, member_count))
            })
            .collect()
    }

    async fn insert_registration(
        &self,
        registration: &NewRegistration,
    ) -> StoreResult<Registration> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO registrations (tournament_id, team_id, registered_by, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(registration.tournament_id)
        .bind(registration.team_id)
        .bind(registration.registered_by)
        .bind(registration.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        registration_from_row(&row)
    }

    async fn update_registration_status(
        &self,
        registration_id: RegistrationId,
        status: RegistrationStatus,
    ) -> StoreResult<Registration> {
        let row = sqlx::query(&format!(
            "UPDATE registrations SET status = $1 WHERE id = $2 RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(registration_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        registration_from_row(&row)
    }

    async fn delete_registration(&self, registration_id: RegistrationId) -> StoreResult<()> {
        sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(registration_id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn increment_tournament_players(
        &self,
        tournament_id: TournamentId,
        amount: u32,
    ) -> StoreResult<()> {
        sqlx::query("SELECT increment_tournament_players($1, $2)")
            .bind(tournament_id)
            .bind(amount as i32)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn decrement_tournament_players(
        &self,
        tournament_id: TournamentId,
        amount: u32,
    ) -> StoreResult<()> {
        sqlx::query("SELECT decrement_tournament_players($1, $2)")
            .bind(tournament_id)
            .bind(amount as i32)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
