//! Integration tests for captaincy transfer

mod common;

use common::{team, world};
use levelgg::ErrorKind;
use levelgg::team::{MemberRole, TeamError, TeamManager, TransferCaptaincyRequest};

fn to(player: uuid::Uuid) -> TransferCaptaincyRequest {
    TransferCaptaincyRequest {
        new_captain_id: Some(player),
    }
}

#[tokio::test]
async fn test_transfer_swaps_roles() {
    let w = world().await;
    let (squad, members) = team(&w.repo, "relay", 4).await;
    let old = members[0].player_id;
    let new = members[2].player_id;

    let updated = TeamManager::new(w.repo.clone())
        .transfer_captaincy(old, squad.id, to(new))
        .await
        .unwrap();

    assert_eq!(updated.captain_id, Some(new));
    assert_eq!(
        w.repo.member(squad.id, old).await.unwrap().role,
        MemberRole::Member
    );
    assert_eq!(
        w.repo.member(squad.id, new).await.unwrap().role,
        MemberRole::Captain
    );
}

#[tokio::test]
async fn test_admin_may_transfer() {
    let w = world().await;
    let (squad, members) = team(&w.repo, "override", 3).await;

    let updated = TeamManager::new(w.repo.clone())
        .transfer_captaincy(w.admin, squad.id, to(members[1].player_id))
        .await
        .unwrap();
    assert_eq!(updated.captain_id, Some(members[1].player_id));
}

#[tokio::test]
async fn test_role_failure_rolls_back_captain_only() {
    let w = world().await;
    let (squad, members) = team(&w.repo, "rollback", 4).await;
    let old = members[0].player_id;
    w.repo.fail_role_update_for(members[1].id).await;

    let err = TeamManager::new(w.repo.clone())
        .transfer_captaincy(old, squad.id, to(members[1].player_id))
        .await
        .unwrap_err();

    assert!(matches!(err, TeamError::RoleUpdateFailed(_)));
    assert!(err.to_string().starts_with("Failed to update member role: "));
    assert_eq!(err.kind(), ErrorKind::Store);
    assert_eq!(w.repo.team(squad.id).await.unwrap().captain_id, Some(old));
    // The demotion is not undone
    assert_eq!(
        w.repo.member(squad.id, old).await.unwrap().role,
        MemberRole::Member
    );
}

#[tokio::test]
async fn test_transfer_guards() {
    let w = world().await;
    let (squad, members) = team(&w.repo, "guarded", 3).await;
    let captain = members[0].player_id;
    let manager = TeamManager::new(w.repo.clone());

    let err = manager
        .transfer_captaincy(captain, squad.id, TransferCaptaincyRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "new_captain_id is required");

    let err = manager
        .transfer_captaincy(captain, uuid::Uuid::new_v4(), to(members[1].player_id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = manager
        .transfer_captaincy(members[1].player_id, squad.id, to(members[2].player_id))
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::NotCaptainOrAdmin));

    let err = manager
        .transfer_captaincy(captain, squad.id, to(w.outsider))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "New captain must be an active team member");
    assert_eq!(w.repo.team(squad.id).await.unwrap().captain_id, Some(captain));
}

#[tokio::test]
async fn test_inactive_member_cannot_become_captain() {
    let w = world().await;
    let (squad, members) = team(&w.repo, "benched", 3).await;
    let captain = members[0].player_id;
    let benched = members[2].player_id;
    w.repo.set_member_active(squad.id, benched, false).await;

    let err = TeamManager::new(w.repo.clone())
        .transfer_captaincy(captain, squad.id, to(benched))
        .await
        .unwrap_err();

    assert!(matches!(err, TeamError::NotActiveMember));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(w.repo.team(squad.id).await.unwrap().captain_id, Some(captain));
    assert_eq!(
        w.repo.member(squad.id, benched).await.unwrap().role,
        MemberRole::Member
    );
}

#[tokio::test]
async fn test_inactive_former_captain_keeps_role_row() {
    let w = world().await;
    let (squad, members) = team(&w.repo, "departed", 3).await;
    let former = members[0].player_id;
    let successor = members[1].player_id;
    w.repo.set_member_active(squad.id, former, false).await;

    let updated = TeamManager::new(w.repo.clone())
        .transfer_captaincy(w.admin, squad.id, to(successor))
        .await
        .unwrap();

    assert_eq!(updated.captain_id, Some(successor));
    assert_eq!(
        w.repo.member(squad.id, successor).await.unwrap().role,
        MemberRole::Captain
    );
    let former_row = w.repo.member(squad.id, former).await.unwrap();
    assert_eq!(former_row.role, MemberRole::Captain);
    assert!(!former_row.is_active);
}
