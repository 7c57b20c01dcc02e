//! Integration tests against PostgreSQL.
//!
//! Run with a scratch database:
//! `DATABASE_URL=postgres://... cargo test -p levelgg --test postgres_integration -- --ignored`

use levelgg::db::{Database, DatabaseConfig, PgRepository, Repository};
use levelgg::draft::{AssignmentRequest, AssignmentType, DraftManager};
use levelgg::registration::{
    CounterSync, RegisterTeamRequest, RegistrationManager, RegistrationStatus,
    UpdateRegistrationRequest,
};
use levelgg::tournament::{NewTournament, Tournament, TournamentMode};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

async fn setup_test_db() -> (Arc<PgPool>, Arc<PgRepository>) {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| DatabaseConfig::development().database_url);
    let mut config = DatabaseConfig::with_url(database_url);
    config.max_connections = 5;
    config.min_connections = 1;

    let db = Database::new(&config)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Migrations failed");

    let pool = Arc::new(db.pool().clone());
    (pool.clone(), Arc::new(PgRepository::new(pool)))
}

async fn insert_profile(pool: &PgPool, tier: Option<&str>, team_lead: bool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO profiles (id, username, tier, is_team_lead) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(format!("player-{id}"))
        .bind(tier)
        .bind(team_lead)
        .execute(pool)
        .await
        .unwrap();
    id
}

/// Team of `size` active members; the first one captains it. Returns
/// `(team_id, captain_id)`.
async fn insert_team(pool: &PgPool, size: usize) -> (Uuid, Uuid) {
    let mut players = Vec::with_capacity(size);
    for i in 0..size {
        let tier = if i % 2 == 0 { "GOLD" } else { "SILVER" };
        players.push(insert_profile(pool, Some(tier), false).await);
    }
    let captain = players[0];

    let team_id: Uuid =
        sqlx::query_scalar("INSERT INTO teams (name, captain_id) VALUES ($1, $2) RETURNING id")
            .bind(format!("team-{captain}"))
            .bind(captain)
            .fetch_one(pool)
            .await
            .unwrap();

    for (i, player) in players.iter().enumerate() {
        sqlx::query("INSERT INTO team_members (team_id, player_id, role) VALUES ($1, $2, $3)")
            .bind(team_id)
            .bind(player)
            .bind(if i == 0 { "CAPTAIN" } else { "MEMBER" })
            .execute(pool)
            .await
            .unwrap();
    }
    (team_id, captain)
}

async fn insert_tournament(repo: &PgRepository, created_by: Uuid) -> Tournament {
    repo.insert_tournament(&NewTournament {
        title: "Postgres cup".to_string(),
        mode: TournamentMode::EightVsEight,
        max_players: 64,
        start_date: None,
        created_by,
    })
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_register_then_cancel_moves_counter() {
    let (pool, repo) = setup_test_db().await;
    let creator = insert_profile(&pool, None, true).await;
    let tournament = insert_tournament(&repo, creator).await;
    let (team_id, captain) = insert_team(&pool, 8).await;

    // The member-count trigger keeps the cached count current
    assert_eq!(repo.find_team(team_id).await.unwrap().unwrap().member_count, 8);

    let manager = RegistrationManager::new(repo.clone());
    let change = manager
        .register_team(
            captain,
            tournament.id,
            RegisterTeamRequest {
                team_id: Some(team_id),
            },
        )
        .await
        .unwrap();
    assert!(matches!(change.counter, CounterSync::Applied(_)));
    let after_register = repo.find_tournament(tournament.id).await.unwrap().unwrap();
    assert_eq!(after_register.registered_players, 8);

    let confirmed = repo
        .list_registrations(tournament.id, Some(RegistrationStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].1, 8);

    manager
        .update_status(
            creator,
            change.value.id,
            UpdateRegistrationRequest {
                status: Some("CANCELLED".to_string()),
            },
        )
        .await
        .unwrap();
    let after_cancel = repo.find_tournament(tournament.id).await.unwrap().unwrap();
    assert_eq!(after_cancel.registered_players, 0);

    assert!(
        repo.list_registrations(tournament.id, Some(RegistrationStatus::Confirmed))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        repo.list_registrations(tournament.id, None)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_auto_assignment_round() {
    let (pool, repo) = setup_test_db().await;
    let creator = insert_profile(&pool, None, true).await;
    let tournament = insert_tournament(&repo, creator).await;

    let registrations = RegistrationManager::new(repo.clone());
    for _ in 0..2 {
        let (team_id, captain) = insert_team(&pool, 8).await;
        registrations
            .register_team(
                captain,
                tournament.id,
                RegisterTeamRequest {
                    team_id: Some(team_id),
                },
            )
            .await
            .unwrap();
    }

    let summary = DraftManager::new(repo.clone())
        .assign(
            creator,
            tournament.id,
            AssignmentRequest {
                assignment_type: Some(AssignmentType::Auto),
                team_assignments: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.teams_processed, 2);
    assert_eq!(summary.players_assigned, 16);
    assert_eq!(summary.failed_assignments, 0);

    let rosters = repo
        .team_rosters(tournament.id, RegistrationStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(rosters.len(), 2);
    for roster in &rosters {
        assert_eq!(roster.entries.len(), 8);
        assert!(roster.entries.iter().all(|e| e.profile.is_some()));
        assert!(
            roster
                .entries
                .iter()
                .all(|e| e.member.position.is_some() && e.member.squad_assignment.is_some())
        );
    }
}
