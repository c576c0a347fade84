//! Pool participant and their ordered team picks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EntityId, ParticipantId};

/// A single team pick with its tie-break priority (1 = most significant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// External team id (durable key into the standings store)
    pub team_id: u32,

    /// Priority slot, 1..=N, each value used exactly once
    pub priority: u32,
}

/// A pool participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Derived identifier (content hash of the name)
    pub id: ParticipantId,

    /// Display name; unique case-insensitively across the pool
    pub name: String,

    /// Signup sequence number; unique, the tie-break of last resort
    pub registration_order: u32,

    /// Exactly N picks whose priorities form a permutation of 1..=N
    pub picks: Vec<Pick>,

    /// When the participant was registered
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Create a participant with a derived id. Picks are stored sorted
    /// by ascending priority.
    pub fn new(name: String, registration_order: u32, mut picks: Vec<Pick>) -> Self {
        let id = EntityId::generate(&["participant", &name]);
        picks.sort_by_key(|p| p.priority);
        Self {
            id,
            name,
            registration_order,
            picks,
            created_at: Utc::now(),
        }
    }

    /// Picks ordered by ascending priority.
    pub fn picks_by_priority(&self) -> Vec<Pick> {
        let mut picks = self.picks.clone();
        picks.sort_by_key(|p| p.priority);
        picks
    }
}

/// Violations of the pick-set invariant, reported at write time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected {expected} picks, got {got}")]
    WrongPickCount { expected: usize, got: usize },

    #[error("duplicate team id {0} in picks")]
    DuplicateTeam(u32),

    #[error("priorities must be a permutation of 1..={0}")]
    BadPriorities(u32),

    #[error("participant name must not be empty")]
    EmptyName,
}

/// Validate a pick set against the pool invariant: exactly `n` picks,
/// distinct team ids, priorities a permutation of 1..=n.
pub fn validate_picks(picks: &[Pick], n: usize) -> Result<(), ValidationError> {
    if picks.len() != n {
        return Err(ValidationError::WrongPickCount {
            expected: n,
            got: picks.len(),
        });
    }

    let mut team_ids: Vec<u32> = picks.iter().map(|p| p.team_id).collect();
    team_ids.sort_unstable();
    if let Some(dup) = team_ids.windows(2).find(|w| w[0] == w[1]) {
        return Err(ValidationError::DuplicateTeam(dup[0]));
    }

    let mut priorities: Vec<u32> = picks.iter().map(|p| p.priority).collect();
    priorities.sort_unstable();
    let expected: Vec<u32> = (1..=n as u32).collect();
    if priorities != expected {
        return Err(ValidationError::BadPriorities(n as u32));
    }

    Ok(())
}
