//! League team standings row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, TeamId};

/// One row of the league table.
///
/// The whole standings store is overwritten on each successful sync;
/// `external_id` is the durable key that reconciles a team across syncs,
/// while the derived `id` may be regenerated at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Derived identifier (content hash of the external id)
    pub id: TeamId,

    /// Durable identifier from the sports-data source
    pub external_id: u32,

    /// Full team name
    pub name: String,

    /// URL-friendly name
    pub slug: String,

    /// Short display code (e.g. "FLA")
    pub short_code: String,

    /// Current position in the league table (1 = leader)
    pub position: u32,

    /// Current league points
    pub points: i64,

    /// Matches played
    pub played: u32,

    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,

    /// When this row was last refreshed
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a team row with a derived id.
    pub fn new(external_id: u32, name: String, slug: String, short_code: String) -> Self {
        let id = EntityId::generate(&["team", &external_id.to_string()]);
        Self {
            id,
            external_id,
            name,
            slug,
            short_code,
            position: 0,
            points: 0,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            updated_at: Utc::now(),
        }
    }

    /// Goal difference.
    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }
}
