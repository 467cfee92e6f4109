//! Holder of the most recent device snapshot.
//!
//! Lifecycle: empty at startup, populated by the first discovery or diff,
//! then replaced wholesale by every later one. Snapshots are never merged
//! and never persisted.
//!
//! Requests that read the baseline and then replace it must hold the
//! [`StoreGuard`] from [`ScanStore::lock`] across the whole sequence so a
//! concurrent request cannot replace the baseline in between.

use tokio::sync::{Mutex, MutexGuard};

use lanscan_core::types::Snapshot;

#[derive(Debug, Default)]
pub struct ScanStore {
    inner: Mutex<Option<Snapshot>>,
}

/// Exclusive access to the stored snapshot.
pub struct StoreGuard<'a> {
    slot: MutexGuard<'a, Option<Snapshot>>,
}

impl StoreGuard<'_> {
    pub fn current(&self) -> Option<&Snapshot> {
        self.slot.as_ref()
    }

    /// Install `snapshot` as the new baseline, returning the previous one.
    pub fn replace(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        tracing::debug!(
            scan_id = %snapshot.scan_id,
            devices = snapshot.devices.len(),
            "Snapshot replaced"
        );
        self.slot.replace(snapshot)
    }
}

impl ScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the snapshot.
    pub async fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            slot: self.inner.lock().await,
        }
    }

    pub async fn current_snapshot(&self) -> Option<Snapshot> {
        self.lock().await.current().cloned()
    }

    pub async fn replace(&self, snapshot: Snapshot) -> Option<Snapshot> {
        self.lock().await.replace(snapshot)
    }
}
