//! Access Snapshot Store
//!
//! Holds the currently published [`AccessSnapshot`] behind an `Arc` so any
//! number of readers can resolve against it without holding a lock.
//! Publishing swaps the `Arc`; readers that already cloned the old one keep a
//! consistent view until they drop it.
//!
//! A generation counter prevents a reload that started before an
//! invalidation from publishing stale data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use sqlx::PgPool;

use crate::access::AccessSnapshot;
use crate::db::{self, StoreResult};

/// Thread-safe holder of the published snapshot.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<AccessSnapshot>>,
    /// Incremented on every publish and invalidation.
    generation: AtomicU64,
}

impl SnapshotStore {
    pub fn new(snapshot: AccessSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
        }
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Arc<AccessSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Publish a new snapshot unconditionally. Returns the new generation.
    pub fn replace(&self, snapshot: AccessSnapshot) -> u64 {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Mark the published data as outdated.
    ///
    /// Reloads that began before this call will not publish.
    pub fn invalidate(&self) {
        let _guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Publish `snapshot` only if the generation is still `expected`.
    ///
    /// Returns `true` if the snapshot was published.
    pub fn publish_if_current(&self, expected: u64, snapshot: AccessSnapshot) -> bool {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != expected {
            return false;
        }
        *guard = Arc::new(snapshot);
        self.generation.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// Load a fresh snapshot from storage and publish it.
    ///
    /// Returns `false` when an invalidation raced with the load; the caller
    /// should reload again.
    #[tracing::instrument(skip(self, pool))]
    pub async fn reload(&self, pool: &PgPool) -> StoreResult<bool> {
        let before = self.generation();
        let snapshot = db::load_snapshot(pool).await?;
        let services = snapshot.catalog().len();

        let published = self.publish_if_current(before, snapshot);
        if published {
            tracing::info!(services, "Access snapshot published");
        } else {
            tracing::debug!("Discarded access snapshot invalidated during load");
        }
        Ok(published)
    }
}
