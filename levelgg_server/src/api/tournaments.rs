//! Tournament API handlers: creation, statistics, team registration and
//! withdrawal.

use axum::{
    Json,
    extract::{
        Extension, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use levelgg::{
    PlayerId,
    registration::{RegisterTeamRequest, Registration},
    tournament::{CreateTournamentRequest, Tournament, TournamentId, TournamentStats},
};
use serde::{Deserialize, Serialize};

use super::{AppState, error::ApiError, extract::ApiPath};
use crate::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create a tournament. Team leads and admins only.
///
/// Returns `201 Created` with the tournament.
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    body: Result<Json<CreateTournamentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let tournament = state
        .tournament_manager
        .create_tournament(caller, request)
        .await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// Public registration totals for a tournament
pub async fn tournament_stats(
    State(state): State<AppState>,
    ApiPath(tournament_id): ApiPath<TournamentId>,
) -> Result<Json<TournamentStats>, ApiError> {
    Ok(Json(
        state.tournament_manager.tournament_stats(tournament_id).await?,
    ))
}

/// Register the caller's team.
///
/// # Request Body
///
/// ```json
/// { "team_id": "5b0a5f0e-8c59-4a53-9d6e-0b5f5a8f3c11" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: closed, started, team too small, full or duplicate
/// - `403 Forbidden`: caller is not the team's captain
/// - `404 Not Found`: tournament or team doesn't exist
pub async fn register_team(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    ApiPath(tournament_id): ApiPath<TournamentId>,
    body: Result<Json<RegisterTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let change = state
        .registration_manager
        .register_team(caller, tournament_id, request)
        .await?;

    metrics::registrations_created();
    if change.counter.is_failed() {
        metrics::player_counter_failures("register");
    }

    Ok((StatusCode::CREATED, Json(change.value)))
}

/// Withdraw a team: `DELETE /tournaments/{id}/register?team_id=`
pub async fn withdraw_team(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    ApiPath(tournament_id): ApiPath<TournamentId>,
    query: Result<Query<RegisterTeamRequest>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let team_id = query.ok().and_then(|Query(q)| q.team_id);
    let change = state
        .registration_manager
        .withdraw(caller, tournament_id, team_id)
        .await?;

    metrics::registrations_removed("withdraw");
    if change.counter.is_failed() {
        metrics::player_counter_failures("withdraw");
    }

    Ok(Json(MessageResponse {
        message: "Registration withdrawn successfully".to_string(),
    }))
}
