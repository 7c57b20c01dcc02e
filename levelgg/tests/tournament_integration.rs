//! Integration tests for tournament creation and statistics

mod common;

use common::{confirmed, registration, team, tournament, world};
use levelgg::ErrorKind;
use levelgg::registration::RegistrationStatus;
use levelgg::tournament::{
    CreateTournamentRequest, TournamentError, TournamentManager, TournamentMode,
};

fn request(mode: &str, max_players: u32) -> CreateTournamentRequest {
    CreateTournamentRequest {
        title: Some("Weekend Siege".to_string()),
        mode: Some(mode.to_string()),
        max_players: Some(max_players),
        start_date: None,
    }
}

#[tokio::test]
async fn test_team_lead_creates_tournament() {
    let w = world().await;
    let manager = TournamentManager::new(w.repo.clone());

    let created = manager
        .create_tournament(w.creator, request("64v64", 2048))
        .await
        .unwrap();
    assert_eq!(created.mode, TournamentMode::SixtyFourVsSixtyFour);
    assert_eq!(created.created_by, w.creator);
    assert_eq!(created.registered_players, 0);
    assert!(created.is_active && !created.is_started && !created.is_completed);

    let fetched = manager.get_tournament(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_plain_player_cannot_create() {
    let w = world().await;
    let err = TournamentManager::new(w.repo.clone())
        .create_tournament(w.outsider, request("16v16", 64))
        .await
        .unwrap_err();
    assert!(matches!(err, TournamentError::NotTeamLead));
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[tokio::test]
async fn test_admin_capacity_over_ceiling() {
    let w = world().await;
    let err = TournamentManager::new(w.repo.clone())
        .create_tournament(w.admin, request("8v8", 257))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Max players for 8v8 mode cannot exceed 256");
}

#[tokio::test]
async fn test_stats_sum_current_member_counts() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::SixteenVsSixteen, 100).await;
    let (a, _) = team(&w.repo, "a", 16).await;
    let (b, _) = team(&w.repo, "b", 20).await;
    let (c, _) = team(&w.repo, "c", 18).await;
    let (d, _) = team(&w.repo, "d", 17).await;
    confirmed(&w.repo, &t, &a).await;
    confirmed(&w.repo, &t, &b).await;
    registration(&w.repo, &t, &c, RegistrationStatus::Pending).await;
    registration(&w.repo, &t, &d, RegistrationStatus::Cancelled).await;

    let stats = TournamentManager::new(w.repo.clone())
        .tournament_stats(t.id)
        .await
        .unwrap();

    assert_eq!(stats.confirmed_teams, 2);
    assert_eq!(stats.pending_teams, 1);
    assert_eq!(stats.total_teams, 4);
    assert_eq!(stats.confirmed_players, 36);
    assert_eq!(stats.pending_players, 18);
    assert_eq!(stats.registered_players, 36);
    assert_eq!(stats.slots_remaining, 64);
}

#[tokio::test]
async fn test_unknown_tournament() {
    let w = world().await;
    let err = TournamentManager::new(w.repo.clone())
        .tournament_stats(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Tournament not found");
}
