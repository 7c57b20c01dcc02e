//! Team API handlers.

use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
};
use levelgg::{
    PlayerId,
    team::{Team, TeamError, TeamId, TransferCaptaincyRequest},
};
use serde::{Deserialize, Serialize};

use super::{AppState, error::ApiError, extract::ApiPath};
use crate::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferCaptaincyResponse {
    pub message: String,
    pub team: Team,
}

/// Hand the captaincy to another active member.
///
/// # Request Body
///
/// ```json
/// { "new_captain_id": "0d7c0f5e-2a3b-4c5d-8e9f-101112131415" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing `new_captain_id` or target not an active member
/// - `403 Forbidden`: caller is neither the current captain nor an admin
/// - `404 Not Found`: team doesn't exist
/// - `500 Internal Server Error`: a write failed; the captain change is reverted
///   when the role update fails
pub async fn transfer_captaincy(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    ApiPath(team_id): ApiPath<TeamId>,
    body: Result<Json<TransferCaptaincyRequest>, JsonRejection>,
) -> Result<Json<TransferCaptaincyResponse>, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    match state
        .team_manager
        .transfer_captaincy(caller, team_id, request)
        .await
    {
        Ok(team) => {
            metrics::captaincy_transfers("transferred");
            Ok(Json(TransferCaptaincyResponse {
                message: "Team captaincy transferred successfully".to_string(),
                team,
            }))
        }
        Err(err) => {
            if matches!(err, TeamError::RoleUpdateFailed(_)) {
                metrics::captaincy_transfers("rolled_back");
            }
            Err(err.into())
        }
    }
}
