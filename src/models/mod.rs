//! Core data models for the pool tracker.

mod ids;
mod leaderboard;
mod participant;
mod snapshot;
mod team;

pub use ids::*;
pub use leaderboard::*;
pub use participant::*;
pub use snapshot::*;
pub use team::*;
