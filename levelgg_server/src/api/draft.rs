//! Draft API handlers.
//!
//! ```bash
//! curl -X POST http://localhost:8080/api/draft/$TOURNAMENT/assign \
//!   -H "Authorization: Bearer TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"assignment_type": "auto"}'
//! ```

use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
};
use levelgg::{
    PlayerId,
    draft::{AssignmentRequest, AssignmentSummary, AssignmentType, DraftOverview},
    tournament::TournamentId,
};

use super::{AppState, error::ApiError, extract::ApiPath};
use crate::metrics;

/// Run auto or manual assignment for a tournament.
///
/// # Errors
///
/// - `400 Bad Request`: tournament started, unknown assignment type or missing data
/// - `401 Unauthorized`: missing or invalid token
/// - `403 Forbidden`: caller is neither the creator nor an admin
/// - `404 Not Found`: tournament doesn't exist
pub async fn assign_players(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    ApiPath(tournament_id): ApiPath<TournamentId>,
    body: Result<Json<AssignmentRequest>, JsonRejection>,
) -> Result<Json<AssignmentSummary>, ApiError> {
    // Unreadable bodies are rejected after authorization
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let kind = match request.assignment_type {
        Some(AssignmentType::Manual) => "manual",
        _ => "auto",
    };

    let summary = state
        .draft_manager
        .assign(caller, tournament_id, request)
        .await?;

    metrics::draft_players_assigned(kind, summary.players_assigned);
    metrics::draft_failed_assignments(kind, summary.failed_assignments);

    Ok(Json(summary))
}

/// Confirmed teams, players and draft statistics for a tournament
pub async fn draft_overview(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    ApiPath(tournament_id): ApiPath<TournamentId>,
) -> Result<Json<DraftOverview>, ApiError> {
    Ok(Json(
        state.draft_manager.overview(caller, tournament_id).await?,
    ))
}
