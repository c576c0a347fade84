//! Leaderboard history.
//!
//! On each sync the current leaderboard is frozen into one snapshot row
//! per participant, keyed by the session date. Re-running a sync within
//! the same session replaces that date's rows (a single atomic store
//! write); a new session date appends. Rows carry the participant name,
//! not an id, so history survives roster churn.

use chrono::{Datelike, Days, FixedOffset, NaiveDate, Utc, Weekday};
use tracing::info;

use crate::models::{LeaderboardEntry, Snapshot, Team};
use crate::storage::{self, StorageConfig, StorageError};

/// Brasília is UTC-3 year-round (no DST since 2019).
const BRT_OFFSET_SECS: i32 = -3 * 3600;

/// Today's calendar date in Brasília time.
pub fn brasilia_today() -> NaiveDate {
    let offset = FixedOffset::east_opt(BRT_OFFSET_SECS).expect("valid fixed offset");
    Utc::now().with_timezone(&offset).date_naive()
}

/// Closing date of the session containing `date`.
///
/// League rounds are played Sat-Mon and Wed-Thu; the pool closes the
/// books on the following Tuesday or Friday respectively.
pub fn session_date_for(date: NaiveDate) -> NaiveDate {
    let days_ahead = match date.weekday() {
        Weekday::Mon => 1, // -> Tue
        Weekday::Tue => 0,
        Weekday::Wed => 2, // -> Fri
        Weekday::Thu => 1,
        Weekday::Fri => 0,
        Weekday::Sat => 3, // -> Tue
        Weekday::Sun => 2,
    };
    date + Days::new(days_ahead)
}

/// The league round active right now: the highest `played` count across
/// the table. Used only to label history data points.
pub fn current_round(teams: &[Team]) -> u32 {
    teams.iter().map(|t| t.played).max().unwrap_or(0)
}

/// Freeze the given leaderboard as the snapshot set for `session_date`.
///
/// Replace semantics per date: any existing rows for that date are
/// dropped and the new rows written in their place, in one atomic store
/// write. Rows for other dates are untouched. Returns the number of
/// rows recorded.
pub fn record_snapshot(
    config: &StorageConfig,
    session_date: NaiveDate,
    round_number: u32,
    leaderboard: &[LeaderboardEntry],
) -> Result<usize, StorageError> {
    if leaderboard.is_empty() {
        info!("History: no leaderboard entries, nothing to record.");
        return Ok(0);
    }

    let mut snapshots = storage::read_snapshots(config)?;
    let before = snapshots.len();
    snapshots.retain(|s| s.session_date != session_date);
    let replaced = before - snapshots.len();

    for entry in leaderboard {
        snapshots.push(Snapshot {
            session_date,
            round_number,
            participant_name: entry.participant_name.clone(),
            score: entry.total,
            rank: entry.rank,
        });
    }

    storage::write_snapshots(config, &snapshots)?;

    if replaced > 0 {
        info!(
            "History: session {} overwritten ({} rows replaced, {} recorded).",
            session_date,
            replaced,
            leaderboard.len()
        );
    } else {
        info!(
            "History: session {}, round {} — {} rows recorded.",
            session_date,
            round_number,
            leaderboard.len()
        );
    }

    Ok(leaderboard.len())
}

/// Query the history time series, ordered by session date ascending and
/// rank ascending within a date. An optional filter restricts rows to
/// participants whose name contains the filter, case-insensitively.
pub fn get_history(
    config: &StorageConfig,
    participant_filter: Option<&str>,
) -> Result<Vec<Snapshot>, StorageError> {
    let mut snapshots = storage::read_snapshots(config)?;

    if let Some(filter) = participant_filter {
        let needle = filter.to_lowercase();
        snapshots.retain(|s| s.participant_name.to_lowercase().contains(&needle));
    }

    snapshots.sort_by(|a, b| {
        a.session_date
            .cmp(&b.session_date)
            .then_with(|| a.rank.cmp(&b.rank))
    });

    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(name: &str, order: u32, total: i64, rank: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            participant_name: name.to_string(),
            registration_order: order,
            total,
            per_pick_points: vec![],
            per_pick_team_ids: vec![],
            per_pick_positions: vec![],
            per_pick_team_names: vec![],
            per_pick_short_codes: vec![],
        }
    }

    fn test_config(tmp: &TempDir) -> StorageConfig {
        StorageConfig::new(tmp.path().to_path_buf())
    }

    #[test]
    fn test_session_date_all_weekdays() {
        // 2026-05-11 is a Monday.
        let cases = [
            (ymd(2026, 5, 11), ymd(2026, 5, 12)), // Mon -> Tue
            (ymd(2026, 5, 12), ymd(2026, 5, 12)), // Tue -> Tue
            (ymd(2026, 5, 13), ymd(2026, 5, 15)), // Wed -> Fri
            (ymd(2026, 5, 14), ymd(2026, 5, 15)), // Thu -> Fri
            (ymd(2026, 5, 15), ymd(2026, 5, 15)), // Fri -> Fri
            (ymd(2026, 5, 16), ymd(2026, 5, 19)), // Sat -> next Tue
            (ymd(2026, 5, 17), ymd(2026, 5, 19)), // Sun -> next Tue
        ];
        for (input, expected) in cases {
            assert_eq!(session_date_for(input), expected, "input {}", input);
        }
    }

    #[test]
    fn test_current_round_is_max_played() {
        let mut a = Team::new(1, "A".into(), "a".into(), "A".into());
        let mut b = Team::new(2, "B".into(), "b".into(), "B".into());
        a.played = 7;
        b.played = 8;
        assert_eq!(current_round(&[a, b]), 8);
        assert_eq!(current_round(&[]), 0);
    }

    #[test]
    fn test_record_snapshot_writes_one_row_per_entry() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let board = vec![entry("A", 1, 20, 1), entry("B", 2, 15, 2)];

        let n = record_snapshot(&config, ymd(2026, 5, 12), 8, &board).unwrap();
        assert_eq!(n, 2);

        let rows = get_history(&config, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].participant_name, "A");
        assert_eq!(rows[0].score, 20);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].round_number, 8);
    }

    #[test]
    fn test_record_snapshot_same_date_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let date = ymd(2026, 5, 12);
        let board = vec![entry("A", 1, 20, 1), entry("B", 2, 15, 2)];

        record_snapshot(&config, date, 8, &board).unwrap();
        record_snapshot(&config, date, 8, &board).unwrap();

        let rows = get_history(&config, None).unwrap();
        assert_eq!(rows.len(), 2, "no duplicates, no residue");
    }

    #[test]
    fn test_record_snapshot_same_date_replaces_scores_and_round() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let date = ymd(2026, 5, 12);

        record_snapshot(&config, date, 8, &[entry("A", 1, 20, 1)]).unwrap();
        // Same-date resync after another match finished: new score, new round.
        record_snapshot(&config, date, 9, &[entry("A", 1, 23, 1)]).unwrap();

        let rows = get_history(&config, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, 23);
        assert_eq!(rows[0].round_number, 9);
    }

    #[test]
    fn test_record_snapshot_new_date_appends() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        record_snapshot(&config, ymd(2026, 5, 12), 8, &[entry("A", 1, 20, 1)]).unwrap();
        record_snapshot(&config, ymd(2026, 5, 15), 9, &[entry("A", 1, 24, 1)]).unwrap();

        let rows = get_history(&config, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].session_date, ymd(2026, 5, 12));
        assert_eq!(rows[1].session_date, ymd(2026, 5, 15));
    }

    #[test]
    fn test_record_snapshot_empty_leaderboard_is_noop() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        assert_eq!(record_snapshot(&config, ymd(2026, 5, 12), 8, &[]).unwrap(), 0);
        assert!(get_history(&config, None).unwrap().is_empty());
    }

    #[test]
    fn test_history_ordered_by_date_then_rank() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        // Record the later date first; the query must still sort ascending.
        record_snapshot(
            &config,
            ymd(2026, 5, 15),
            9,
            &[entry("B", 2, 24, 1), entry("A", 1, 20, 2)],
        )
        .unwrap();
        record_snapshot(
            &config,
            ymd(2026, 5, 12),
            8,
            &[entry("A", 1, 20, 1), entry("B", 2, 15, 2)],
        )
        .unwrap();

        let rows = get_history(&config, None).unwrap();
        let keys: Vec<(NaiveDate, u32)> =
            rows.iter().map(|s| (s.session_date, s.rank)).collect();
        assert_eq!(
            keys,
            vec![
                (ymd(2026, 5, 12), 1),
                (ymd(2026, 5, 12), 2),
                (ymd(2026, 5, 15), 1),
                (ymd(2026, 5, 15), 2),
            ]
        );
    }

    #[test]
    fn test_history_filter_is_case_insensitive_substring() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        record_snapshot(
            &config,
            ymd(2026, 5, 12),
            8,
            &[entry("Nery", 1, 20, 1), entry("Bruno", 2, 15, 2)],
        )
        .unwrap();

        let rows = get_history(&config, Some("nery")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].participant_name, "Nery");

        let rows = get_history(&config, Some("ER")).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_history_survives_participant_removal() {
        // Snapshots are keyed by name, never joined against the roster:
        // querying history requires no participant store at all.
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        record_snapshot(&config, ymd(2026, 5, 12), 8, &[entry("Nery", 1, 20, 1)]).unwrap();

        // Roster is empty, history still answers.
        assert!(storage::read_participants(&config).unwrap().is_empty());
        let rows = get_history(&config, Some("Nery")).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
