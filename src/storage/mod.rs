//! Filesystem persistence.
//!
//! JSONL files are the source of truth:
//! - `teams.jsonl` — the current league table, overwritten on sync
//! - `participants.jsonl` — the participant roster
//! - `snapshots.jsonl` — the append-only leaderboard history

mod jsonl;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Participant, Snapshot, Team};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read the full standings store.
pub fn read_teams(config: &StorageConfig) -> Result<Vec<Team>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Team).read_all()
}

/// Overwrite the standings store wholesale.
pub fn write_teams(config: &StorageConfig, teams: &[Team]) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::Team).write_all_atomic(teams)
}

/// Read the participant roster.
pub fn read_participants(config: &StorageConfig) -> Result<Vec<Participant>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Participant).read_all()
}

/// Overwrite the participant roster.
pub fn write_participants(
    config: &StorageConfig,
    participants: &[Participant],
) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::Participant).write_all_atomic(participants)
}

/// Read all history snapshots.
pub fn read_snapshots(config: &StorageConfig) -> Result<Vec<Snapshot>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Snapshot).read_all()
}

/// Overwrite the snapshot history. Atomic: either the whole new file is
/// visible or the old one is untouched.
pub fn write_snapshots(
    config: &StorageConfig,
    snapshots: &[Snapshot],
) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::Snapshot).write_all_atomic(snapshots)
}
