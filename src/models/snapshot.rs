//! Historical leaderboard snapshots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One participant's score and rank at one sync session date.
///
/// Snapshots reference participants by name rather than id on purpose:
/// history must survive a participant being deleted or reimported with
/// a fresh id. Rows are immutable once a session date has passed; a
/// re-sync on the same date replaces that date's rows wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Calendar date identifying the sync session (time axis for charts)
    pub session_date: NaiveDate,

    /// League round active at sync time; chart label only, never an
    /// ordering key
    pub round_number: u32,

    pub participant_name: String,

    /// The participant's total at that session
    pub score: i64,

    /// The participant's rank at that session
    pub rank: u32,
}
