use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Team;
use crate::storage;

/// GET /api/teams — all known teams, alphabetical.
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
    let mut teams = storage::read_teams(&state.storage)?;
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(teams))
}

/// GET /api/standings — the league table in position order.
pub async fn standings(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
    let mut teams = storage::read_teams(&state.storage)?;
    teams.sort_by_key(|t| t.position);
    Ok(Json(teams))
}
