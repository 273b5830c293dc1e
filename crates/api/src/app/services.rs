use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use storefront_catalog::{CatalogInfo, CatalogStore, LoadError};

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The blocking load task panicked or was cancelled.
    #[error("reload task failed: {0}")]
    Task(String),
}

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppServices {
    catalog: Arc<CatalogStore>,
    snapshot_path: PathBuf,
}

impl AppServices {
    pub fn new(catalog: Arc<CatalogStore>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            snapshot_path: snapshot_path.into(),
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Re-read the snapshot file and swap it in.
    ///
    /// The file is read asynchronously and decoded on the blocking pool; readers
    /// only wait for the final swap. Dropping this future before the decode
    /// starts abandons the reload without touching the store.
    pub async fn reload(&self) -> Result<CatalogInfo, ReloadError> {
        let bytes = tokio::fs::read(&self.snapshot_path).await.map_err(|e| {
            tracing::warn!(path = %self.snapshot_path.display(), error = %e, "catalog snapshot unreadable");
            LoadError::io(&self.snapshot_path, e)
        })?;

        let catalog = Arc::clone(&self.catalog);
        let info = tokio::task::spawn_blocking(move || catalog.load(&bytes))
            .await
            .map_err(|e| ReloadError::Task(e.to_string()))??;
        Ok(info)
    }
}

/// Reload the snapshot every `every`, starting one interval from now.
///
/// Failures are logged; the previous catalog keeps serving.
pub fn spawn_periodic_reload(services: Arc<AppServices>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = services.reload().await {
                tracing::error!(error = %e, "periodic catalog reload failed; keeping previous catalog");
            }
        }
    })
}
