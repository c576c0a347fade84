//! # Pool Tracker
//!
//! A season-long prediction pool tracker for the Brazilian league.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, participants, snapshots)
//! - **engine**: Leaderboard computation and tie-breaking
//! - **history**: Per-session snapshot recording and queries
//! - **bulk**: Flat-row roster import/export
//! - **storage**: Filesystem persistence (JSONL)
//! - **fetch**: Standings source client
//! - **sync**: Sync orchestration
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod bulk;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod history;
pub mod models;
pub mod storage;
pub mod sync;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num * multiplier))
}
