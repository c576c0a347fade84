//! Sync administration endpoints.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::routes::auth::require_admin;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::sync::{SyncError, SyncState};

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub teams_synced: u32,
    pub snapshots_recorded: u32,
    pub round_number: u32,
    pub session_date: String,
    pub duration_ms: u64,
}

async fn run_sync(state: &AppState) -> Result<Json<SyncReport>, ApiError> {
    // The orchestrator itself rejects a second sync while one is in
    // flight, so concurrent triggers cannot interleave two pipelines.
    match state.sync.sync_once().await {
        Ok(r) => Ok(Json(SyncReport {
            teams_synced: r.teams_synced,
            snapshots_recorded: r.snapshots_recorded,
            round_number: r.round_number,
            session_date: r.session_date.to_string(),
            duration_ms: r.duration.as_millis() as u64,
        })),
        Err(e @ SyncError::AlreadyRunning) => Err(ApiError::Conflict(e.to_string())),
        Err(e @ SyncError::Fetch(_)) => Err(ApiError::Upstream(e.to_string())),
        Err(e @ SyncError::TooFewTeams { .. }) => Err(ApiError::Upstream(e.to_string())),
        Err(e @ SyncError::Storage(_)) => Err(ApiError::Internal(e.to_string())),
    }
}

/// POST /api/admin/sync — run a sync now (admin only).
pub async fn trigger_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SyncReport>, ApiError> {
    require_admin(&headers, &state.config.auth)?;
    run_sync(&state).await
}

/// GET /api/admin/sync/status
pub async fn sync_status(State(state): State<AppState>) -> Json<SyncState> {
    let current = state.sync_state.read().await;
    Json(current.clone())
}

#[derive(Debug, Deserialize)]
pub struct CronParams {
    pub token: Option<String>,
}

/// GET|POST /api/cron/sync?token=… — unattended sync for schedulers.
/// Guarded by the cron secret instead of a bearer token.
pub async fn cron_sync(
    State(state): State<AppState>,
    Query(params): Query<CronParams>,
) -> Result<Json<SyncReport>, ApiError> {
    if params.token.as_deref() != Some(state.config.auth.cron_secret.as_str()) {
        return Err(ApiError::Forbidden("Invalid cron token".to_string()));
    }
    run_sync(&state).await
}

#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub season_year: u32,
    pub picks_per_participant: usize,
    pub min_teams_protection: usize,
    pub source_base_url: String,
    pub tournament_id: u32,
    pub season_id: u32,
}

/// GET /api/admin/config — effective pool settings, secrets excluded.
pub async fn show_config(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ConfigView>, ApiError> {
    require_admin(&headers, &state.config.auth)?;

    let config = &state.config;
    Ok(Json(ConfigView {
        season_year: config.pool.season_year,
        picks_per_participant: config.pool.picks_per_participant,
        min_teams_protection: config.pool.min_teams_protection,
        source_base_url: config.source.base_url.clone(),
        tournament_id: config.source.tournament_id,
        season_id: config.source.season_id,
    }))
}
