use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::fetch::{FetchError, StandingsFetcher};
use crate::storage::StorageConfig;
use crate::sync::{SyncOrchestrator, SyncState};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub config: Arc<AppConfig>,
    pub sync: Arc<SyncOrchestrator>,
    /// Same handle the orchestrator writes; routes read it for status.
    pub sync_state: Arc<RwLock<SyncState>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, FetchError> {
        let storage = StorageConfig::new(config.data_dir.clone());
        let fetcher = StandingsFetcher::new(config.source.clone())?;
        let sync = Arc::new(SyncOrchestrator::new(
            config.pool.clone(),
            fetcher,
            storage.clone(),
        ));
        let sync_state = sync.state_handle();

        Ok(Self {
            storage: Arc::new(storage),
            config: Arc::new(config),
            sync,
            sync_state,
        })
    }
}
