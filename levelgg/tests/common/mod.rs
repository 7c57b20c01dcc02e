//! Seeding helpers shared by the integration tests.

#![allow(dead_code)]

use chrono::Utc;
use levelgg::db::MemoryRepository;
use levelgg::profile::{PlayerId, Profile, Tier};
use levelgg::registration::{Registration, RegistrationStatus};
use levelgg::team::{MemberRole, Position, Team, TeamMember};
use levelgg::tournament::{Tournament, TournamentMode};
use std::sync::Arc;
use uuid::Uuid;

pub struct World {
    pub repo: Arc<MemoryRepository>,
    pub creator: PlayerId,
    pub admin: PlayerId,
    pub outsider: PlayerId,
}

pub async fn world() -> World {
    let repo = Arc::new(MemoryRepository::new());
    let creator = Uuid::new_v4();
    let admin = Uuid::new_v4();
    let outsider = Uuid::new_v4();
    repo.insert_profile(Profile::new(creator, "organizer").team_lead())
        .await;
    repo.insert_profile(Profile::new(admin, "moderator").admin()).await;
    repo.insert_profile(Profile::new(outsider, "bystander")).await;
    World {
        repo,
        creator,
        admin,
        outsider,
    }
}

pub async fn tournament(
    repo: &MemoryRepository,
    created_by: PlayerId,
    mode: TournamentMode,
    max_players: u32,
) -> Tournament {
    let tournament = Tournament {
        id: Uuid::new_v4(),
        title: format!("{mode} open"),
        mode,
        max_players,
        registered_players: 0,
        is_active: true,
        is_started: false,
        is_completed: false,
        start_date: None,
        created_by,
        created_at: Utc::now(),
    };
    repo.put_tournament(tournament.clone()).await;
    tournament
}

/// A team of `size` active members with profiles; the first member captains it
pub async fn team(repo: &MemoryRepository, name: &str, size: usize) -> (Team, Vec<TeamMember>) {
    team_with(repo, name, &vec![(Some(Tier::Bronze), None); size]).await
}

pub async fn team_with(
    repo: &MemoryRepository,
    name: &str,
    members: &[(Option<Tier>, Option<Position>)],
) -> (Team, Vec<TeamMember>) {
    let team_id = Uuid::new_v4();
    let mut rows = Vec::with_capacity(members.len());
    for (i, &(tier, position)) in members.iter().enumerate() {
        let player_id = Uuid::new_v4();
        let mut profile = Profile::new(player_id, format!("{name}-{i}"));
        profile.tier = tier;
        repo.insert_profile(profile).await;

        let member = TeamMember {
            id: Uuid::new_v4(),
            team_id,
            player_id,
            role: if i == 0 {
                MemberRole::Captain
            } else {
                MemberRole::Member
            },
            position,
            squad_assignment: None,
            is_active: true,
        };
        repo.put_member(member.clone()).await;
        rows.push(member);
    }

    let team = Team {
        id: team_id,
        name: name.to_string(),
        captain_id: rows.first().map(|m| m.player_id),
        member_count: members.len() as u32,
        max_members: 64,
    };
    repo.put_team(team.clone()).await;
    (team, rows)
}

pub async fn registration(
    repo: &MemoryRepository,
    tournament: &Tournament,
    team: &Team,
    status: RegistrationStatus,
) -> Registration {
    let registration = Registration {
        id: Uuid::new_v4(),
        tournament_id: tournament.id,
        team_id: team.id,
        registered_by: team.captain_id,
        status,
        registered_at: Utc::now(),
    };
    repo.put_registration(registration.clone()).await;
    registration
}

/// Seat a confirmed registration and count its players, as a completed
/// registration would have
pub async fn confirmed(repo: &MemoryRepository, tournament: &Tournament, team: &Team) -> Registration {
    use levelgg::db::Repository;

    let registration = registration(repo, tournament, team, RegistrationStatus::Confirmed).await;
    repo.increment_tournament_players(tournament.id, team.member_count)
        .await
        .unwrap();
    registration
}
