//! Dataset lifecycle: initial load, shared access, background refresh

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::DatasetConfig;

use super::error::DataError;
use super::loader;
use super::snapshot::Snapshot;

/// Owns the current [`Snapshot`] and refreshes it in the background.
///
/// Readers call [`snapshot`](Self::snapshot) and get an `Arc` clone they
/// can hold for the whole request; a concurrent reload never changes
/// data under them. Replacement is a single pointer swap under a short
/// write lock, so a reload that fails leaves the previous snapshot in
/// place untouched.
pub struct DatasetService {
    config: DatasetConfig,
    current: RwLock<Arc<Snapshot>>,
}

impl DatasetService {
    /// Load the dataset once and wrap it for shared access.
    ///
    /// The initial load is fail-fast: serving queries against no data at
    /// all is worse than refusing to start.
    pub fn init(config: DatasetConfig) -> Result<Self, DataError> {
        let snapshot = loader::load(&config.dir)?;
        tracing::debug!(
            records = snapshot.len(),
            dir = %config.dir.display(),
            "Initial dataset snapshot loaded"
        );
        Ok(Self {
            config,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// The current snapshot; cheap to call per request
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Rebuild the snapshot from the source directory and swap it in.
    ///
    /// On failure the previous snapshot stays current and the error is
    /// returned to the caller.
    pub fn reload(&self) -> Result<(), DataError> {
        let snapshot = loader::load(&self.config.dir)?;
        let records = snapshot.len();
        *self.current.write() = Arc::new(snapshot);
        tracing::debug!(records, "Dataset snapshot refreshed");
        Ok(())
    }

    /// Spawn the periodic reload task, if refresh is enabled.
    ///
    /// Returns `None` when `reload_secs` is 0. The task exits when the
    /// shutdown channel flips; a failed reload logs a warning and keeps
    /// the stale snapshot.
    pub fn start_reload_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        if self.config.reload_secs == 0 {
            tracing::debug!("Dataset refresh disabled (reload_secs = 0)");
            return None;
        }

        let service = Arc::clone(self);
        let period = Duration::from_secs(self.config.reload_secs);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick fires immediately; skip it, we loaded at init
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // CSV reads are blocking file I/O, keep them off
                        // the async workers
                        let worker = Arc::clone(&service);
                        match tokio::task::spawn_blocking(move || worker.reload()).await {
                            Ok(Ok(())) => {}
                            Ok(Err(err)) => {
                                tracing::warn!(error = %err, "Dataset refresh failed, keeping previous snapshot");
                            }
                            Err(err) => {
                                tracing::warn!(error = %err, "Dataset refresh task failed");
                            }
                        }
                    }
                    _ = async { let _ = shutdown_rx.wait_for(|&v| v).await; } => {
                        tracing::debug!("Dataset refresh task stopping");
                        break;
                    }
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::write_fixture_dataset;
    use std::fs;

    fn config_for(dir: &std::path::Path, reload_secs: u64) -> DatasetConfig {
        DatasetConfig {
            dir: dir.to_path_buf(),
            reload_secs,
        }
    }

    #[test]
    fn test_init_loads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());

        let service = DatasetService::init(config_for(dir.path(), 0)).unwrap();
        assert_eq!(service.snapshot().len(), 5);
    }

    #[test]
    fn test_init_fails_fast_on_missing_relation() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        fs::remove_file(dir.path().join("movies.csv")).unwrap();

        assert!(DatasetService::init(config_for(dir.path(), 0)).is_err());
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        let service = DatasetService::init(config_for(dir.path(), 0)).unwrap();

        fs::write(
            dir.path().join("tickets.csv"),
            "ticket_id,movie_id,theater_id,show_id,customer_id,seat_type,total,purchase_time\n\
             t1,m1,th1,s1,c1,standard,10.0,2024-01-01 18:00:00\n",
        )
        .unwrap();

        service.reload().unwrap();
        assert_eq!(service.snapshot().len(), 1);
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        let service = DatasetService::init(config_for(dir.path(), 0)).unwrap();
        let before = service.snapshot();

        fs::remove_file(dir.path().join("tickets.csv")).unwrap();

        assert!(service.reload().is_err());
        let after = service.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_readers_keep_their_snapshot_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        let service = DatasetService::init(config_for(dir.path(), 0)).unwrap();

        let held = service.snapshot();
        fs::write(
            dir.path().join("tickets.csv"),
            "ticket_id,movie_id,theater_id,show_id,customer_id,seat_type,total,purchase_time\n",
        )
        .unwrap();
        service.reload().unwrap();

        // The held Arc still sees the old data
        assert_eq!(held.len(), 5);
        assert!(service.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_reload_task_disabled_when_period_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        let service = Arc::new(DatasetService::init(config_for(dir.path(), 0)).unwrap());

        let (_tx, rx) = watch::channel(false);
        assert!(service.start_reload_task(rx).is_none());
    }

    #[tokio::test]
    async fn test_reload_task_refreshes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        let service = Arc::new(DatasetService::init(config_for(dir.path(), 1)).unwrap());
        assert_eq!(service.snapshot().len(), 5);

        fs::write(
            dir.path().join("tickets.csv"),
            "ticket_id,movie_id,theater_id,show_id,customer_id,seat_type,total,purchase_time\n\
             t1,m1,th1,s1,c1,standard,10.0,2024-01-01 18:00:00\n",
        )
        .unwrap();

        let (tx, rx) = watch::channel(false);
        let handle = service.start_reload_task(rx).unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        while service.snapshot().len() != 1 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "snapshot was never refreshed"
            );
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_reload_task_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dataset(dir.path());
        let service = Arc::new(DatasetService::init(config_for(dir.path(), 3600)).unwrap());

        let (tx, rx) = watch::channel(false);
        let handle = service.start_reload_task(rx).unwrap();
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_millis(200), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
