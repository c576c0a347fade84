use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::history;
use crate::models::Snapshot;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Case-insensitive substring filter on participant name.
    pub participant: Option<String>,
}

/// GET /api/history — snapshot time series, session date ascending.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Snapshot>>, ApiError> {
    let rows = history::get_history(&state.storage, params.participant.as_deref())?;
    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::test_support::setup_test_state;
    use crate::history::record_snapshot;
    use crate::models::LeaderboardEntry;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn entry(name: &str, total: i64, rank: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            participant_name: name.to_string(),
            registration_order: rank,
            total,
            per_pick_points: vec![],
            per_pick_team_ids: vec![],
            per_pick_positions: vec![],
            per_pick_team_names: vec![],
            per_pick_short_codes: vec![],
        }
    }

    #[tokio::test]
    async fn test_history_endpoint() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let date = NaiveDate::from_ymd_opt(2026, 5, 12).unwrap();
        record_snapshot(
            &state.storage,
            date,
            8,
            &[entry("Nery", 20, 1), entry("Bruno", 15, 2)],
        )
        .unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/history").await;

        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["participant_name"], "Nery");
        assert_eq!(rows[0]["session_date"], "2026-05-12");
        assert_eq!(rows[0]["round_number"], 8);
    }

    #[tokio::test]
    async fn test_history_participant_filter() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let date = NaiveDate::from_ymd_opt(2026, 5, 12).unwrap();
        record_snapshot(
            &state.storage,
            date,
            8,
            &[entry("Nery", 20, 1), entry("Bruno", 15, 2)],
        )
        .unwrap();

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/history?participant=bru").await;

        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["participant_name"], "Bruno");
    }

    #[tokio::test]
    async fn test_history_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let app = build_router(state);
        let (status, json) = get_json(app, "/api/history").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 0);
    }
}
