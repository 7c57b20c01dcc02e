//! Integration tests for draft assignment against the in-memory store

mod common;

use common::{confirmed, registration, team, team_with, tournament, world};
use levelgg::ErrorKind;
use levelgg::draft::{
    AssignmentRequest, AssignmentType, DraftError, DraftManager, PlayerAssignment, TeamAssignment,
};
use levelgg::profile::Tier;
use levelgg::registration::RegistrationStatus;
use levelgg::team::{Position, Squad};
use levelgg::tournament::TournamentMode;

fn auto() -> AssignmentRequest {
    AssignmentRequest {
        assignment_type: Some(AssignmentType::Auto),
        team_assignments: None,
    }
}

fn manual(team_assignments: Vec<TeamAssignment>) -> AssignmentRequest {
    AssignmentRequest {
        assignment_type: Some(AssignmentType::Manual),
        team_assignments: Some(team_assignments),
    }
}

#[tokio::test]
async fn test_auto_assign_nine_armor_players() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::EightVsEight, 256).await;
    let (squad, members) =
        team_with(&w.repo, "armor", &[(Some(Tier::Bronze), Some(Position::Armor)); 9]).await;
    confirmed(&w.repo, &t, &squad).await;

    let summary = DraftManager::new(w.repo.clone())
        .assign(w.creator, t.id, auto())
        .await
        .unwrap();

    assert_eq!(summary.message, "Auto-assignment completed");
    assert_eq!(summary.teams_processed, 1);
    assert_eq!(summary.players_assigned, 9);
    assert_eq!(summary.failed_assignments, 0);

    let mut armor = 0;
    for (i, member) in members.iter().enumerate() {
        let stored = w.repo.member(squad.id, member.player_id).await.unwrap();
        if stored.position == Some(Position::Armor) {
            armor += 1;
        } else {
            assert_eq!(stored.position, Some(Position::Infantry));
        }
        assert_eq!(stored.squad_assignment, Some(Squad::for_slot(i)));
    }
    assert_eq!(armor, 1);
}

#[tokio::test]
async fn test_auto_assign_only_confirmed_teams() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::EightVsEight, 256).await;
    let (yes, _) = team(&w.repo, "confirmed", 8).await;
    let (no, no_members) = team(&w.repo, "pending", 8).await;
    let (empty, _) = team(&w.repo, "empty", 0).await;
    confirmed(&w.repo, &t, &yes).await;
    confirmed(&w.repo, &t, &empty).await;
    registration(&w.repo, &t, &no, RegistrationStatus::Pending).await;

    let summary = DraftManager::new(w.repo.clone())
        .assign(w.admin, t.id, auto())
        .await
        .unwrap();

    // The empty roster is still processed
    assert_eq!(summary.teams_processed, 2);
    assert_eq!(summary.players_assigned, 8);
    let untouched = w.repo.member(no.id, no_members[0].player_id).await.unwrap();
    assert_eq!(untouched.squad_assignment, None);
}

#[tokio::test]
async fn test_failed_updates_are_counted_not_rolled_back() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::EightVsEight, 256).await;
    let (squad, members) = team(&w.repo, "partial", 8).await;
    confirmed(&w.repo, &t, &squad).await;
    w.repo.fail_assignment_for(members[2].player_id).await;
    w.repo.fail_assignment_for(members[5].player_id).await;

    let summary = DraftManager::new(w.repo.clone())
        .assign(w.creator, t.id, auto())
        .await
        .unwrap();

    assert_eq!(summary.players_assigned, 8);
    assert_eq!(summary.failed_assignments, 2);
    let applied = w.repo.member(squad.id, members[0].player_id).await.unwrap();
    assert_eq!(applied.squad_assignment, Some(Squad::Alpha));
    let failed = w.repo.member(squad.id, members[2].player_id).await.unwrap();
    assert_eq!(failed.squad_assignment, None);
}

#[tokio::test]
async fn test_manual_assign_drops_unconfirmed_teams() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::EightVsEight, 256).await;
    let (yes, yes_members) = team(&w.repo, "confirmed", 8).await;
    let (no, no_members) = team(&w.repo, "outsider", 8).await;
    confirmed(&w.repo, &t, &yes).await;

    let summary = DraftManager::new(w.repo.clone())
        .assign(
            w.creator,
            t.id,
            manual(vec![
                TeamAssignment {
                    team_id: yes.id,
                    player_assignments: vec![
                        PlayerAssignment {
                            player_id: yes_members[0].player_id,
                            position: Position::Jet,
                            squad_assignment: Some(Squad::Golf),
                        },
                        PlayerAssignment {
                            player_id: yes_members[1].player_id,
                            position: Position::Support,
                            squad_assignment: None,
                        },
                    ],
                },
                TeamAssignment {
                    team_id: no.id,
                    player_assignments: vec![PlayerAssignment {
                        player_id: no_members[0].player_id,
                        position: Position::Heli,
                        squad_assignment: Some(Squad::Alpha),
                    }],
                },
            ]),
        )
        .await
        .unwrap();

    assert_eq!(summary.message, "Manual assignment completed");
    assert_eq!(summary.teams_processed, 1);
    assert_eq!(summary.players_assigned, 2);
    assert_eq!(summary.failed_assignments, 0);

    let jet = w.repo.member(yes.id, yes_members[0].player_id).await.unwrap();
    assert_eq!(jet.position, Some(Position::Jet));
    assert_eq!(jet.squad_assignment, Some(Squad::Golf));
    let untouched = w.repo.member(no.id, no_members[0].player_id).await.unwrap();
    assert_eq!(untouched.position, None);
}

#[tokio::test]
async fn test_assign_guards() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::EightVsEight, 256).await;
    let manager = DraftManager::new(w.repo.clone());

    let err = manager
        .assign(w.creator, uuid::Uuid::new_v4(), auto())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = manager.assign(w.outsider, t.id, auto()).await.unwrap_err();
    assert!(matches!(err, DraftError::NotCreatorOrAdmin));

    let err = manager
        .assign(w.creator, t.id, AssignmentRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid assignment type or missing data");

    let err = manager
        .assign(
            w.creator,
            t.id,
            AssignmentRequest {
                assignment_type: Some(AssignmentType::Manual),
                team_assignments: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DraftError::InvalidRequest));

    w.repo.set_started(t.id, true).await;
    let err = manager.assign(w.admin, t.id, auto()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot modify assignments after tournament has started"
    );
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_auto_assign_is_repeatable() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::SixteenVsSixteen, 512).await;
    let roster: Vec<_> = (0..20)
        .map(|i| {
            let tier = Tier::ALL[i % Tier::ALL.len()];
            let position = Position::ALL[(i * 3) % Position::ALL.len()];
            (Some(tier), Some(position))
        })
        .collect();
    let (squad, members) = team_with(&w.repo, "steady", &roster).await;
    confirmed(&w.repo, &t, &squad).await;
    let manager = DraftManager::new(w.repo.clone());

    manager.assign(w.creator, t.id, auto()).await.unwrap();
    let mut first = Vec::new();
    for m in &members {
        first.push(w.repo.member(squad.id, m.player_id).await.unwrap());
    }

    manager.assign(w.creator, t.id, auto()).await.unwrap();
    for (before, m) in first.iter().zip(&members) {
        let after = w.repo.member(squad.id, m.player_id).await.unwrap();
        assert_eq!(before.squad_assignment, after.squad_assignment);
    }
}

#[tokio::test]
async fn test_overview_statistics() {
    let w = world().await;
    let t = tournament(&w.repo, w.creator, TournamentMode::EightVsEight, 256).await;
    let (a, _) = team_with(
        &w.repo,
        "alpha",
        &[
            (Some(Tier::Diamond), Some(Position::Heli)),
            (None, None),
            (Some(Tier::Silver), Some(Position::Support)),
        ],
    )
    .await;
    let (b, _) = team(&w.repo, "bravo", 2).await;
    confirmed(&w.repo, &t, &a).await;
    confirmed(&w.repo, &t, &b).await;
    let manager = DraftManager::new(w.repo.clone());

    let err = manager.overview(w.outsider, t.id).await.unwrap_err();
    assert!(matches!(err, DraftError::OverviewForbidden));

    let overview = manager.overview(w.creator, t.id).await.unwrap();
    assert_eq!(overview.tournament.id, t.id);
    assert_eq!(overview.teams.len(), 2);
    assert_eq!(overview.players.len(), 5);

    let stats = &overview.statistics;
    assert_eq!(stats.total_teams, 2);
    assert_eq!(stats.total_players, 5);
    assert_eq!(stats.players_by_tier["BRONZE"], 3);
    assert_eq!(stats.players_by_tier["DIAMOND"], 1);
    assert_eq!(stats.players_by_position["INFANTRY"], 3);
    assert_eq!(stats.players_by_position["HELI"], 1);
    // 5 / 2 = 2.5 rounds to 3
    assert_eq!(stats.avg_team_size, 3);
}
