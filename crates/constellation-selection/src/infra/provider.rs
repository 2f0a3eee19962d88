//! Snapshot providers
//!
//! The engine never reads stars, relationships or profiles itself. A provider
//! materializes the full per-user snapshot before a run.

use async_trait::async_trait;
use constellation_common::{ConstellationError, Result};
use dashmap::DashMap;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::context::Snapshot;

/// Source of per-user selection snapshots
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Fetch the current snapshot for a user
    async fn fetch(&self, user_id: &Uuid) -> Result<Snapshot>;
}

/// In-memory provider
///
/// Uses DashMap for concurrent access across per-user evaluations.
#[derive(Default)]
pub struct InMemorySnapshotProvider {
    snapshots: DashMap<Uuid, Snapshot>,
}

impl InMemorySnapshotProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the snapshot of a user
    pub fn insert(&self, user_id: Uuid, snapshot: Snapshot) {
        self.snapshots.insert(user_id, snapshot);
    }

    pub fn remove(&self, user_id: &Uuid) -> Option<Snapshot> {
        self.snapshots.remove(user_id).map(|(_, snapshot)| snapshot)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait]
impl SnapshotProvider for InMemorySnapshotProvider {
    async fn fetch(&self, user_id: &Uuid) -> Result<Snapshot> {
        self.snapshots
            .get(user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ConstellationError::Provider(format!("No snapshot for user {}", user_id)))
    }
}
