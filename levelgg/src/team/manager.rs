//! Team captaincy management.

use super::models::{MemberRole, Team, TeamId, TransferCaptaincyRequest};
use crate::db::{Repository, StoreError, is_admin};
use crate::errors::ErrorKind;
use crate::profile::PlayerId;
use std::sync::Arc;
use thiserror::Error;

/// Team errors
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("new_captain_id is required")]
    MissingNewCaptain,

    #[error("Team not found")]
    NotFound(TeamId),

    #[error("Only current team captain or admin can transfer captaincy")]
    NotCaptainOrAdmin,

    #[error("New captain must be an active team member")]
    NotActiveMember,

    #[error("Failed to update team captain: {0}")]
    CaptainUpdateFailed(StoreError),

    /// The new captain's role could not be set; the captain change was rolled back
    #[error("Failed to update member role: {0}")]
    RoleUpdateFailed(StoreError),

    #[error("Failed to fetch updated team: {0}")]
    FetchFailed(StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TeamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TeamError::MissingNewCaptain | TeamError::NotActiveMember => ErrorKind::Validation,
            TeamError::NotFound(_) => ErrorKind::NotFound,
            TeamError::NotCaptainOrAdmin => ErrorKind::Authorization,
            TeamError::CaptainUpdateFailed(_)
            | TeamError::RoleUpdateFailed(_)
            | TeamError::FetchFailed(_)
            | TeamError::Store(_) => ErrorKind::Store,
        }
    }
}

pub type TeamResult<T> = Result<T, TeamError>;

/// Steps of a captaincy transfer. Only the captain change is ever undone.
#[derive(Debug)]
enum TransferStep {
    AssignCaptain,
    DemoteFormerCaptain,
    PromoteNewCaptain,
    RollBack(StoreError),
    Finished,
}

/// Team manager
#[derive(Clone)]
pub struct TeamManager {
    repo: Arc<dyn Repository>,
}

impl TeamManager {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn get_team(&self, team_id: TeamId) -> TeamResult<Team> {
        self.repo
            .find_team(team_id)
            .await?
            .ok_or(TeamError::NotFound(team_id))
    }

    /// Hand the captaincy of `team_id` to another active member.
    ///
    /// Runs three independent writes: the team's captain, the former captain's
    /// role, then the new captain's role. If the last write fails the captain
    /// change is reverted; a completed demotion is left in place.
    pub async fn transfer_captaincy(
        &self,
        caller: PlayerId,
        team_id: TeamId,
        request: TransferCaptaincyRequest,
    ) -> TeamResult<Team> {
        let new_captain = request
            .new_captain_id
            .ok_or(TeamError::MissingNewCaptain)?;
        let team = self.get_team(team_id).await?;

        if team.captain_id != Some(caller) && !is_admin(self.repo.as_ref(), caller).await? {
            return Err(TeamError::NotCaptainOrAdmin);
        }

        let membership = self
            .repo
            .find_active_membership(team_id, new_captain)
            .await?
            .ok_or(TeamError::NotActiveMember)?;

        let mut step = TransferStep::AssignCaptain;
        loop {
            step = match step {
                TransferStep::AssignCaptain => {
                    self.repo
                        .update_team_captain(team_id, Some(new_captain))
                        .await
                        .map_err(TeamError::CaptainUpdateFailed)?;
                    TransferStep::DemoteFormerCaptain
                }
                TransferStep::DemoteFormerCaptain => {
                    if let Some(former) = team.captain_id {
                        self.demote(team_id, former).await;
                    }
                    TransferStep::PromoteNewCaptain
                }
                TransferStep::PromoteNewCaptain => {
                    match self
                        .repo
                        .update_member_role(membership.id, MemberRole::Captain)
                        .await
                    {
                        Ok(()) => TransferStep::Finished,
                        Err(err) => TransferStep::RollBack(err),
                    }
                }
                TransferStep::RollBack(err) => {
                    log::warn!(
                        "Captaincy transfer on team {team_id} failed at role update, restoring captain: {err}"
                    );
                    if let Err(rollback_err) =
                        self.repo.update_team_captain(team_id, team.captain_id).await
                    {
                        log::error!(
                            "Failed to restore captain of team {team_id}: {rollback_err}"
                        );
                    }
                    return Err(TeamError::RoleUpdateFailed(err));
                }
                TransferStep::Finished => break,
            };
        }

        log::info!("Team {team_id} captaincy transferred to {new_captain}");

        self.repo
            .find_team(team_id)
            .await
            .map_err(TeamError::FetchFailed)?
            .ok_or(TeamError::NotFound(team_id))
    }

    /// Best effort: the former captain becomes a plain member if still active
    async fn demote(&self, team_id: TeamId, former: PlayerId) {
        let membership = match self.repo.find_active_membership(team_id, former).await {
            Ok(Some(membership)) => membership,
            Ok(None) => return,
            Err(err) => {
                log::warn!("Could not look up former captain {former} of team {team_id}: {err}");
                return;
            }
        };
        if let Err(err) = self
            .repo
            .update_member_role(membership.id, MemberRole::Member)
            .await
        {
            log::warn!("Could not demote former captain {former} of team {team_id}: {err}");
        }
    }
}
