//! Registration API handlers for creators and admins.

use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
};
use levelgg::{
    PlayerId,
    registration::{Registration, RegistrationId, UpdateRegistrationRequest},
};
use serde::{Deserialize, Serialize};

use super::{AppState, error::ApiError, extract::ApiPath};
use crate::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRegistrationResponse {
    pub success: bool,
    pub registration: Registration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRegistrationResponse {
    pub success: bool,
    pub message: String,
}

/// Change a registration's status.
///
/// # Request Body
///
/// ```json
/// { "status": "CANCELLED" }
/// ```
pub async fn update_registration(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    ApiPath(registration_id): ApiPath<RegistrationId>,
    body: Result<Json<UpdateRegistrationRequest>, JsonRejection>,
) -> Result<Json<UpdateRegistrationResponse>, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let change = state
        .registration_manager
        .update_status(caller, registration_id, request)
        .await?;

    metrics::registration_status_changes(change.value.status.as_str());
    if change.counter.is_failed() {
        metrics::player_counter_failures("update_status");
    }

    Ok(Json(UpdateRegistrationResponse {
        success: true,
        registration: change.value,
    }))
}

pub async fn delete_registration(
    State(state): State<AppState>,
    Extension(caller): Extension<PlayerId>,
    ApiPath(registration_id): ApiPath<RegistrationId>,
) -> Result<Json<DeleteRegistrationResponse>, ApiError> {
    let change = state
        .registration_manager
        .delete_registration(caller, registration_id)
        .await?;

    metrics::registrations_removed("delete");
    if change.counter.is_failed() {
        metrics::player_counter_failures("delete");
    }

    Ok(Json(DeleteRegistrationResponse {
        success: true,
        message: "Registration deleted successfully".to_string(),
    }))
}
