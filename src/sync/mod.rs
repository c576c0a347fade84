//! Sync orchestrator.
//!
//! Coordinates the refresh pipeline:
//! 1. Fetch the current standings from the source
//! 2. Overwrite the standings store
//! 3. Compute the leaderboard and freeze it into the session's snapshot
//!
//! A sync that returns suspiciously few teams is rejected before any
//! write, so a truncated upstream response can never wipe the table.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{error, info};

use crate::config::PoolConfig;
use crate::engine;
use crate::fetch::StandingsFetcher;
use crate::history;
use crate::models::Team;
use crate::storage::{self, StorageConfig};

/// Errors that can occur during sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::fetch::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("Source returned {got} teams, expected at least {expected}")]
    TooFewTeams { got: usize, expected: usize },

    #[error("A sync is already running")]
    AlreadyRunning,
}

/// State of the sync machinery, exposed via the API.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncState {
    pub status: SyncStatus,
    pub last_sync_started: Option<DateTime<Utc>>,
    pub last_sync_completed: Option<DateTime<Utc>>,
    pub teams_synced: u32,
    pub snapshots_recorded: u32,
    pub last_session_date: Option<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// Result of a single sync run.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub teams_synced: u32,
    pub snapshots_recorded: u32,
    pub round_number: u32,
    pub session_date: chrono::NaiveDate,
    pub duration: Duration,
}

/// Sync orchestrator.
pub struct SyncOrchestrator {
    pool: PoolConfig,
    fetcher: StandingsFetcher,
    storage: StorageConfig,
    state: Arc<RwLock<SyncState>>,
}

impl SyncOrchestrator {
    pub fn new(pool: PoolConfig, fetcher: StandingsFetcher, storage: StorageConfig) -> Self {
        Self {
            pool,
            fetcher,
            storage,
            state: Arc::new(RwLock::new(SyncState::default())),
        }
    }

    /// Share the state handle with the API layer.
    pub fn state_handle(&self) -> Arc<RwLock<SyncState>> {
        self.state.clone()
    }

    /// Get current sync state.
    pub async fn state(&self) -> SyncState {
        self.state.read().await.clone()
    }

    /// Run a single sync operation.
    ///
    /// At most one sync runs at a time: the idle-to-running transition
    /// happens under the state write lock, so a second caller observes
    /// `Running` and gets `AlreadyRunning` instead of a second pipeline.
    pub async fn sync_once(&self) -> Result<SyncResult, SyncError> {
        {
            let mut state = self.state.write().await;
            if state.status == SyncStatus::Running {
                return Err(SyncError::AlreadyRunning);
            }
            state.status = SyncStatus::Running;
            state.last_sync_started = Some(Utc::now());
            state.errors.clear();
        }

        let start = std::time::Instant::now();
        info!("Starting standings sync");

        let result = self.run_pipeline().await;

        {
            let mut state = self.state.write().await;
            state.last_sync_completed = Some(Utc::now());
            match &result {
                Ok(r) => {
                    state.status = SyncStatus::Completed;
                    state.teams_synced = r.teams_synced;
                    state.snapshots_recorded = r.snapshots_recorded;
                    state.last_session_date = Some(r.session_date.to_string());
                }
                Err(e) => {
                    state.status = SyncStatus::Failed;
                    state.errors.push(e.to_string());
                }
            }
        }

        match result {
            Ok(mut r) => {
                r.duration = start.elapsed();
                info!(
                    "Sync completed: {} teams, round {}, {} snapshot rows for {} in {:?}",
                    r.teams_synced, r.round_number, r.snapshots_recorded, r.session_date, r.duration
                );
                Ok(r)
            }
            Err(e) => {
                error!("Sync failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self) -> Result<SyncResult, SyncError> {
        let teams = self.fetcher.fetch_standings().await?;

        if teams.len() < self.pool.min_teams_protection {
            return Err(SyncError::TooFewTeams {
                got: teams.len(),
                expected: self.pool.min_teams_protection,
            });
        }

        storage::write_teams(&self.storage, &teams)?;

        let participants = storage::read_participants(&self.storage)?;
        let session_date = history::session_date_for(history::brasilia_today());
        let round_number = history::current_round(&teams);

        let snapshots_recorded = if participants.is_empty() {
            info!("No participants registered, skipping snapshot");
            0
        } else {
            let by_external_id: std::collections::HashMap<u32, Team> =
                teams.iter().map(|t| (t.external_id, t.clone())).collect();
            let board = engine::compute_leaderboard(
                &participants,
                &by_external_id,
                self.pool.picks_per_participant,
            );
            history::record_snapshot(&self.storage, session_date, round_number, &board)?
        };

        Ok(SyncResult {
            teams_synced: teams.len() as u32,
            snapshots_recorded: snapshots_recorded as u32,
            round_number,
            session_date,
            duration: Duration::ZERO,
        })
    }

    /// Run periodic sync in the background.
    pub async fn run_periodic(self: Arc<Self>, every: Duration) {
        let mut ticker = interval(every);

        info!("Starting periodic sync every {:?}", every);

        loop {
            ticker.tick().await;

            match self.sync_once().await {
                Ok(result) => {
                    info!(
                        "Periodic sync completed: {} teams, {} snapshot rows",
                        result.teams_synced, result.snapshots_recorded
                    );
                }
                Err(e) => {
                    error!("Periodic sync failed: {}", e);
                }
            }
        }
    }
}
