//! Selection service
//!
//! Fetches a user's snapshot, validates it into a [`SelectionContext`], runs
//! the selector and records metrics. Users are independent, so several can be
//! evaluated concurrently.

use chrono::{DateTime, Utc};
use constellation_common::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::context::SelectionContext;
use crate::infra::provider::SnapshotProvider;
use crate::selection::{ExperimentSelector, SelectionReport};
use crate::telemetry::SelectionMetrics;
use crate::SelectionConfig;

/// Engine front door for callers that work by user id
pub struct SelectionService {
    provider: Arc<dyn SnapshotProvider>,
    selector: ExperimentSelector,
    metrics: SelectionMetrics,
}

impl SelectionService {
    pub fn new(
        provider: Arc<dyn SnapshotProvider>,
        config: SelectionConfig,
        metrics: SelectionMetrics,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            selector: ExperimentSelector::new(config)?,
            metrics,
        })
    }

    pub fn metrics(&self) -> &SelectionMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &SelectionConfig {
        self.selector.config()
    }

    /// Run a selection for one user
    #[instrument(skip(self))]
    pub async fn select_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<SelectionReport> {
        let snapshot = self.provider.fetch(&user_id).await?;
        let ctx = SelectionContext::new(snapshot).map_err(|e| {
            warn!(user_id = %user_id, error = %e, "Snapshot rejected");
            e
        })?;

        let started = Instant::now();
        let report = self.selector.select_with_report(&ctx, now);
        self.metrics.observe(&report, started.elapsed());

        Ok(report)
    }

    /// Run selections for several users concurrently, in input order
    pub async fn select_for_users(
        &self,
        user_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> Vec<(Uuid, Result<SelectionReport>)> {
        let runs = user_ids.iter().map(|&user_id| async move {
            (user_id, self.select_for_user(user_id, now).await)
        });
        join_all(runs).await
    }
}
