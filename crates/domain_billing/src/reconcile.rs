//! Reconciliation of partial two-phase failures
//!
//! When the remote billing call succeeds but the subsequent local write
//! fails, local and remote state disagree and no automatic retry is safe
//! (retrying a create would mint a second remote resource). The sync manager
//! records each such outcome here so operators can reconcile manually. The
//! in-memory queue is the default; a durable outbox can implement the same
//! trait without touching the manager.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_kernel::{DomainPort, PlanId};
use serde::Serialize;
use std::fmt;
use tokio::sync::RwLock;

/// Which two-phase operation diverged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOperation::Create => write!(f, "create"),
            SyncOperation::Update => write!(f, "update"),
            SyncOperation::Delete => write!(f, "delete"),
        }
    }
}

/// A recorded divergence between local and remote plan state
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationEntry {
    pub operation: SyncOperation,
    /// Local id, when one existed at failure time (absent for create)
    pub plan_id: Option<PlanId>,
    /// Remote id the provider call acted on or returned
    pub remote_id: Option<String>,
    /// The local store error that caused the divergence
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

impl ReconciliationEntry {
    pub fn new(
        operation: SyncOperation,
        plan_id: Option<PlanId>,
        remote_id: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            plan_id,
            remote_id,
            message: message.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Sink for divergence records
#[async_trait]
pub trait ReconciliationQueue: DomainPort {
    /// Records a divergence; must not fail the calling operation
    async fn record(&self, entry: ReconciliationEntry);

    /// Returns all recorded divergences, oldest first
    async fn pending(&self) -> Vec<ReconciliationEntry>;
}

/// Process-local reconciliation queue
#[derive(Debug, Default)]
pub struct InMemoryReconciliationQueue {
    entries: RwLock<Vec<ReconciliationEntry>>,
}

impl InMemoryReconciliationQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryReconciliationQueue {}

#[async_trait]
impl ReconciliationQueue for InMemoryReconciliationQueue {
    async fn record(&self, entry: ReconciliationEntry) {
        self.entries.write().await.push(entry);
    }

    async fn pending(&self) -> Vec<ReconciliationEntry> {
        self.entries.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_preserves_insertion_order() {
        let queue = InMemoryReconciliationQueue::new();
        queue
            .record(ReconciliationEntry::new(
                SyncOperation::Create,
                None,
                Some("plan_1".to_string()),
                "insert failed",
            ))
            .await;
        queue
            .record(ReconciliationEntry::new(
                SyncOperation::Delete,
                Some(PlanId::new()),
                Some("plan_2".to_string()),
                "delete failed",
            ))
            .await;

        let pending = queue.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].operation, SyncOperation::Create);
        assert_eq!(pending[1].operation, SyncOperation::Delete);
    }
}
