//! Roster management: CRUD plus bulk import/export.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::api::routes::auth::require_admin;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::bulk::{self, BulkRow, ImportSummary};
use crate::models::{validate_picks, Participant, Pick, Team};
use crate::storage;

#[derive(Debug, Deserialize)]
pub struct ParticipantPayload {
    pub name: String,
    #[serde(default)]
    pub registration_order: Option<u32>,
    pub picks: Vec<Pick>,
}

/// GET /api/participants — the roster in signup order.
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    let mut participants = storage::read_participants(&state.storage)?;
    participants.sort_by_key(|p| p.registration_order);
    Ok(Json(participants))
}

/// POST /api/participants — register a participant (admin only).
pub async fn create_participant(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ParticipantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&headers, &state.config.auth)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Unprocessable(
            "participant name must not be empty".to_string(),
        ));
    }

    validate_picks(&payload.picks, state.config.pool.picks_per_participant)
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;

    let teams = storage::read_teams(&state.storage)?;
    check_known_teams(&payload.picks, &teams)?;

    let mut participants = storage::read_participants(&state.storage)?;
    if participants
        .iter()
        .any(|p| p.name.eq_ignore_ascii_case(&name))
    {
        return Err(ApiError::Conflict(format!(
            "participant '{}' already exists",
            name
        )));
    }

    let registration_order = match payload.registration_order.filter(|&o| o > 0) {
        Some(order) => {
            if participants.iter().any(|p| p.registration_order == order) {
                return Err(ApiError::Conflict(format!(
                    "registration order {} is already taken",
                    order
                )));
            }
            order
        }
        None => next_registration_order(&participants),
    };

    let participant = Participant::new(name, registration_order, payload.picks);
    info!(
        "Registered participant '{}' (order {})",
        participant.name, participant.registration_order
    );

    participants.push(participant.clone());
    storage::write_participants(&state.storage, &participants)?;

    Ok((StatusCode::CREATED, Json(participant)))
}

/// PUT /api/participants/:id — update name and/or picks (admin only).
pub async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ParticipantPayload>,
) -> Result<Json<Participant>, ApiError> {
    require_admin(&headers, &state.config.auth)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Unprocessable(
            "participant name must not be empty".to_string(),
        ));
    }

    validate_picks(&payload.picks, state.config.pool.picks_per_participant)
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;

    let teams = storage::read_teams(&state.storage)?;
    check_known_teams(&payload.picks, &teams)?;

    let mut participants = storage::read_participants(&state.storage)?;
    let index = participants
        .iter()
        .position(|p| p.id.as_str() == id)
        .ok_or_else(|| ApiError::NotFound(format!("participant {}", id)))?;

    if participants
        .iter()
        .enumerate()
        .any(|(i, p)| i != index && p.name.eq_ignore_ascii_case(&name))
    {
        return Err(ApiError::Conflict(format!(
            "participant '{}' already exists",
            name
        )));
    }

    let registration_order = match payload.registration_order.filter(|&o| o > 0) {
        Some(order) => {
            if participants
                .iter()
                .enumerate()
                .any(|(i, p)| i != index && p.registration_order == order)
            {
                return Err(ApiError::Conflict(format!(
                    "registration order {} is already taken",
                    order
                )));
            }
            order
        }
        None => participants[index].registration_order,
    };

    // The id is derived from the name, so a rename changes it.
    let mut updated = Participant::new(name, registration_order, payload.picks);
    updated.created_at = participants[index].created_at;
    participants[index] = updated.clone();

    storage::write_participants(&state.storage, &participants)?;
    Ok(Json(updated))
}

/// DELETE /api/participants/:id — remove from the roster (admin only).
/// History snapshots are keyed by name and remain untouched.
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&headers, &state.config.auth)?;

    let mut participants = storage::read_participants(&state.storage)?;
    let before = participants.len();
    participants.retain(|p| p.id.as_str() != id);

    if participants.len() == before {
        return Err(ApiError::NotFound(format!("participant {}", id)));
    }

    storage::write_participants(&state.storage, &participants)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/participants/import — bulk roster import (admin only).
pub async fn import_participants(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(rows): Json<Vec<BulkRow>>,
) -> Result<Json<ImportSummary>, ApiError> {
    require_admin(&headers, &state.config.auth)?;

    let summary = bulk::apply_import(
        &state.storage,
        &rows,
        state.config.pool.picks_per_participant,
    )?;
    Ok(Json(summary))
}

/// GET /api/participants/export — flat roster rows (admin only).
pub async fn export_participants(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BulkRow>>, ApiError> {
    require_admin(&headers, &state.config.auth)?;

    let mut participants = storage::read_participants(&state.storage)?;
    participants.sort_by_key(|p| p.registration_order);

    let teams = storage::read_teams(&state.storage)?;
    let by_external_id = teams
        .into_iter()
        .map(|t| (t.external_id, t))
        .collect();

    Ok(Json(bulk::export_rows(&participants, &by_external_id)))
}

fn next_registration_order(participants: &[Participant]) -> u32 {
    participants
        .iter()
        .map(|p| p.registration_order)
        .max()
        .unwrap_or(0)
        + 1
}

/// Every picked team must exist in the standings. Skipped while the
/// standings store is still empty (before the first sync).
fn check_known_teams(picks: &[Pick], teams: &[Team]) -> Result<(), ApiError> {
    if teams.is_empty() {
        return Ok(());
    }
    for pick in picks {
        if !teams.iter().any(|t| t.external_id == pick.team_id) {
            return Err(ApiError::Unprocessable(format!(
                "unknown team id {}",
                pick.team_id
            )));
        }
    }
    Ok(())
}
