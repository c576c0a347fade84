use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine;
use crate::models::{LeaderboardResponse, Team};
use crate::storage;

/// GET /api/ranking — the live leaderboard, computed on demand from the
/// current standings and roster.
pub async fn ranking(State(state): State<AppState>) -> Result<Json<LeaderboardResponse>, ApiError> {
    let teams = storage::read_teams(&state.storage)?;
    let participants = storage::read_participants(&state.storage)?;

    let updated_at = teams
        .iter()
        .map(|t| t.updated_at)
        .max()
        .unwrap_or_else(Utc::now)
        .to_rfc3339();

    let by_external_id: HashMap<u32, Team> =
        teams.into_iter().map(|t| (t.external_id, t)).collect();

    let entries = engine::compute_leaderboard(
        &participants,
        &by_external_id,
        state.config.pool.picks_per_participant,
    );

    Ok(Json(LeaderboardResponse {
        updated_at,
        entries,
    }))
}
