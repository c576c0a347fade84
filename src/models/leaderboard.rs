//! Derived leaderboard structures.
//!
//! Entries are recomputed from (participants, standings) on every
//! request and never persisted; only snapshots of them are.

use serde::{Deserialize, Serialize};

/// One ranked participant on the leaderboard.
///
/// All `per_pick_*` vectors have length N and are ordered by ascending
/// pick priority (slot 0 is the priority-1 pick). The team name, short
/// code and table position are read-through display fields copied from
/// the current standings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank after tie-breaking
    pub rank: u32,

    pub participant_name: String,
    pub registration_order: u32,

    /// Sum of the picked teams' current points
    pub total: i64,

    pub per_pick_points: Vec<i64>,
    pub per_pick_team_ids: Vec<u32>,
    pub per_pick_positions: Vec<u32>,
    pub per_pick_team_names: Vec<String>,
    pub per_pick_short_codes: Vec<String>,
}

/// Leaderboard API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    /// When the response was computed
    pub updated_at: String,

    pub entries: Vec<LeaderboardEntry>,
}
