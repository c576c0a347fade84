//! Ranking engine.
//!
//! Turns (participants, current standings) into an ordered, tie-broken
//! leaderboard. Pure and deterministic: no storage access, no clock, no
//! side effects. The caller passes a consistent view of both stores.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{LeaderboardEntry, Participant, Team};

/// Compute the leaderboard for the given participants against the
/// current standings.
///
/// `standings_by_external_id` maps the durable team id to its current
/// table row. A pick referencing a team absent from the map contributes
/// 0 points (and position 0, empty name/code) rather than failing.
/// `n_picks` fixes the per-pick vector length; participants with fewer
/// stored picks get zero-filled trailing slots.
pub fn compute_leaderboard(
    participants: &[Participant],
    standings_by_external_id: &HashMap<u32, Team>,
    n_picks: usize,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = participants
        .iter()
        .map(|p| build_entry(p, standings_by_external_id, n_picks))
        .collect();

    entries.sort_by(compare_entries);

    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = (idx + 1) as u32;
    }

    entries
}

/// Materialize one unranked entry (rank is assigned after sorting).
fn build_entry(
    participant: &Participant,
    standings: &HashMap<u32, Team>,
    n_picks: usize,
) -> LeaderboardEntry {
    let picks = participant.picks_by_priority();

    let mut per_pick_points = Vec::with_capacity(n_picks);
    let mut per_pick_team_ids = Vec::with_capacity(n_picks);
    let mut per_pick_positions = Vec::with_capacity(n_picks);
    let mut per_pick_team_names = Vec::with_capacity(n_picks);
    let mut per_pick_short_codes = Vec::with_capacity(n_picks);
    let mut total: i64 = 0;

    for slot in 0..n_picks {
        match picks.get(slot) {
            Some(pick) => match standings.get(&pick.team_id) {
                Some(team) => {
                    total += team.points;
                    per_pick_points.push(team.points);
                    per_pick_team_ids.push(team.external_id);
                    per_pick_positions.push(team.position);
                    per_pick_team_names.push(team.name.clone());
                    per_pick_short_codes.push(team.short_code.clone());
                }
                None => {
                    // Team vanished from the standings (renamed upstream,
                    // relegation-season data gap). Degrade to zero.
                    per_pick_points.push(0);
                    per_pick_team_ids.push(pick.team_id);
                    per_pick_positions.push(0);
                    per_pick_team_names.push(String::new());
                    per_pick_short_codes.push(String::new());
                }
            },
            None => {
                per_pick_points.push(0);
                per_pick_team_ids.push(0);
                per_pick_positions.push(0);
                per_pick_team_names.push(String::new());
                per_pick_short_codes.push(String::new());
            }
        }
    }

    LeaderboardEntry {
        rank: 0,
        participant_name: participant.name.clone(),
        registration_order: participant.registration_order,
        total,
        per_pick_points,
        per_pick_team_ids,
        per_pick_positions,
        per_pick_team_names,
        per_pick_short_codes,
    }
}

/// The composite leaderboard ordering: total descending, then the
/// per-priority points cascade descending (slot 0 first), then
/// registration order ascending. Registration order is unique, so this
/// is a total order with no residual ties.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total
        .cmp(&a.total)
        .then_with(|| {
            for (pa, pb) in a.per_pick_points.iter().zip(b.per_pick_points.iter()) {
                match pb.cmp(pa) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            Ordering::Equal
        })
        .then_with(|| a.registration_order.cmp(&b.registration_order))
}
