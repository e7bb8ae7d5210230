//! Two-phase plan synchronization
//!
//! [`PlanSyncManager`] owns the sequencing of every plan mutation against the
//! billing provider and the local store:
//!
//! ```text
//! Started -> RemoteCallIssued -> RemoteFailed            (abort, no local write)
//!                             -> RemoteSucceeded
//!                                  -> LocalCallIssued -> LocalFailed    (Inconsistent)
//!                                                     -> LocalSucceeded (done)
//! ```
//!
//! Ordering is always remote-first and fail-closed: a remote failure prevents
//! the local write, so a rejected create leaves no orphaned local record and a
//! rejected update/delete leaves the local record untouched. There are no
//! retries and no compensation; the manager reports the first failure.
//!
//! Mutations on the same plan id are serialized through a per-id async mutex.
//! The store and provider themselves remain unsynchronized shared resources;
//! no lock is held by anyone else across the two calls.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use core_kernel::PlanId;

use crate::error::PlanSyncError;
use crate::plan::{NewPlan, Plan, PlanPatch};
use crate::ports::{BillingProviderPort, PlanStore};
use crate::reconcile::{ReconciliationEntry, ReconciliationQueue, SyncOperation};

/// Keeps a local plan record and its remote billing counterpart consistent
/// across create, update, and delete
pub struct PlanSyncManager {
    provider: Arc<dyn BillingProviderPort>,
    store: Arc<dyn PlanStore>,
    reconciliation: Arc<dyn ReconciliationQueue>,
    /// Per-plan mutation locks; an entry lives only while some task holds or
    /// awaits it, so unknown ids cannot grow the map
    locks: Mutex<HashMap<PlanId, Arc<Mutex<()>>>>,
}

impl PlanSyncManager {
    pub fn new(
        provider: Arc<dyn BillingProviderPort>,
        store: Arc<dyn PlanStore>,
        reconciliation: Arc<dyn ReconciliationQueue>,
    ) -> Self {
        Self {
            provider,
            store,
            reconciliation,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a plan remotely, then locally
    ///
    /// The provider call runs first; on rejection the operation aborts with
    /// the provider's message and no local record exists. On success the
    /// returned remote identifier is attached to the single local insert.
    #[instrument(skip(self, plan), fields(plan_name = %plan.name))]
    pub async fn create(&self, plan: NewPlan) -> Result<Plan, PlanSyncError> {
        let remote = self
            .provider
            .create_plan(&plan)
            .await
            .map_err(|e| PlanSyncError::RemoteFailure(e.message))?;

        match self.store.insert(plan, remote.id.clone()).await {
            Ok(created) => {
                info!(plan_id = %created.id, remote_id = %remote.id, "plan created");
                Ok(created)
            }
            Err(store_err) => {
                self.diverged(SyncOperation::Create, None, Some(remote.id), store_err)
                    .await
            }
        }
    }

    /// Updates a plan remotely, then locally
    ///
    /// The local record is looked up first; a missing id fails with
    /// `NotFound` before any remote call. The remote update is scoped to the
    /// found record's own `remote_id`.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: PlanId, patch: PlanPatch) -> Result<Plan, PlanSyncError> {
        let lock = self.entity_lock(id).await;
        let guard = lock.lock().await;
        let result = self.update_locked(id, patch).await;
        drop(guard);
        self.release_lock(id, lock).await;
        result
    }

    async fn update_locked(&self, id: PlanId, patch: PlanPatch) -> Result<Plan, PlanSyncError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(PlanSyncError::NotFound(id))?;
        let remote_id = existing
            .remote_id
            .clone()
            .ok_or_else(|| PlanSyncError::RemoteFailure("plan has no remote billing id".into()))?;

        self.provider
            .update_plan(&remote_id, &patch)
            .await
            .map_err(|e| PlanSyncError::RemoteFailure(e.message))?;

        match self.store.update(id, patch).await {
            Ok(updated) => {
                info!(plan_id = %id, remote_id = %remote_id, "plan updated");
                Ok(updated)
            }
            Err(store_err) => {
                self.diverged(SyncOperation::Update, Some(id), Some(remote_id), store_err)
                    .await
            }
        }
    }

    /// Deletes a plan remotely, then locally
    ///
    /// Returns the deleted id as confirmation. On remote rejection the local
    /// record is retained, which is consistent: the remote resource still
    /// exists.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: PlanId) -> Result<PlanId, PlanSyncError> {
        let lock = self.entity_lock(id).await;
        let guard = lock.lock().await;
        let result = self.delete_locked(id).await;
        drop(guard);
        self.release_lock(id, lock).await;
        result
    }

    async fn delete_locked(&self, id: PlanId) -> Result<PlanId, PlanSyncError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(PlanSyncError::NotFound(id))?;
        let remote_id = existing
            .remote_id
            .clone()
            .ok_or_else(|| PlanSyncError::RemoteFailure("plan has no remote billing id".into()))?;

        self.provider
            .delete_plan(&remote_id)
            .await
            .map_err(|e| PlanSyncError::RemoteFailure(e.message))?;

        match self.store.delete(id).await {
            Ok(()) => {
                info!(plan_id = %id, remote_id = %remote_id, "plan deleted");
                Ok(id)
            }
            Err(store_err) => {
                self.diverged(SyncOperation::Delete, Some(id), Some(remote_id), store_err)
                    .await
            }
        }
    }

    /// Looks up a plan, failing with `NotFound` when absent
    pub async fn get(&self, id: PlanId) -> Result<Plan, PlanSyncError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(PlanSyncError::NotFound(id))
    }

    /// Returns all plans
    pub async fn list(&self) -> Result<Vec<Plan>, PlanSyncError> {
        Ok(self.store.list().await?)
    }

    /// Records a phase-two failure and surfaces it as `Inconsistent`
    ///
    /// Reached only after the remote call succeeded: local and remote now
    /// disagree, and a simple retry is unsafe.
    async fn diverged<T>(
        &self,
        operation: SyncOperation,
        plan_id: Option<PlanId>,
        remote_id: Option<String>,
        store_err: core_kernel::PortError,
    ) -> Result<T, PlanSyncError> {
        let message = store_err.to_string();
        error!(
            %operation,
            ?plan_id,
            ?remote_id,
            error = %message,
            "local write failed after successful remote call; reconciliation required"
        );
        self.reconciliation
            .record(ReconciliationEntry::new(
                operation,
                plan_id,
                remote_id.clone(),
                message.clone(),
            ))
            .await;
        Err(PlanSyncError::Inconsistent {
            operation,
            remote_id,
            message,
        })
    }

    async fn entity_lock(&self, id: PlanId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(id).or_default().clone()
    }

    /// Prunes the lock entry once no other task holds or awaits it
    ///
    /// Clones are only handed out under the map mutex, so with our own clone
    /// dropped a strong count of one means the map's clone is the last. A
    /// contended entry is kept, and every waiter reuses the same mutex.
    async fn release_lock(&self, id: PlanId, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(lock);
        if locks.get(&id).is_some_and(|entry| Arc::strong_count(entry) == 1) {
            locks.remove(&id);
        }
    }

    #[cfg(test)]
    async fn lock_count(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::BillingInterval;
    use crate::ports::mock::{MockBillingProvider, MockPlanStore};
    use crate::reconcile::InMemoryReconciliationQueue;
    use rust_decimal::Decimal;

    fn new_plan(name: &str) -> NewPlan {
        NewPlan {
            name: name.to_string(),
            amount: Decimal::new(1000, 2),
            currency: "usd".to_string(),
            interval: BillingInterval::Month,
            description: None,
        }
    }

    struct Harness {
        provider: Arc<MockBillingProvider>,
        store: Arc<MockPlanStore>,
        queue: Arc<InMemoryReconciliationQueue>,
        manager: PlanSyncManager,
    }

    fn harness() -> Harness {
        let provider = Arc::new(MockBillingProvider::new());
        let store = Arc::new(MockPlanStore::new());
        let queue = Arc::new(InMemoryReconciliationQueue::new());
        let manager = PlanSyncManager::new(provider.clone(), store.clone(), queue.clone());
        Harness {
            provider,
            store,
            queue,
            manager,
        }
    }

    #[tokio::test]
    async fn create_attaches_provider_id() {
        let h = harness();
        h.provider.set_next_remote_id("plan_xyz").await;
        let plan = h.manager.create(new_plan("Basic")).await.unwrap();
        assert_eq!(plan.remote_id.as_deref(), Some("plan_xyz"));
        assert_eq!(h.store.count().await, 1);
    }

    #[tokio::test]
    async fn update_without_remote_id_fails_closed() {
        let h = harness();
        // A record that predates provider onboarding: no remote id.
        let mut plan = Plan::from_new(new_plan("Legacy"), "tmp".to_string());
        plan.remote_id = None;
        let store = MockPlanStore::with_plans(vec![plan.clone()]).await;
        let manager = PlanSyncManager::new(h.provider.clone(), Arc::new(store), h.queue.clone());

        let err = manager
            .update(plan.id, PlanPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanSyncError::RemoteFailure(_)));
    }

    #[tokio::test]
    async fn create_failure_after_remote_success_records_reconciliation() {
        let h = harness();
        h.store.fail_writes().await;

        let err = h.manager.create(new_plan("Basic")).await.unwrap_err();
        assert!(err.is_inconsistent());

        let pending = h.queue.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].operation, SyncOperation::Create);
        assert!(pending[0].remote_id.is_some());
    }

    #[tokio::test]
    async fn delete_returns_confirming_id() {
        let h = harness();
        let plan = h.manager.create(new_plan("Basic")).await.unwrap();
        let deleted = h.manager.delete(plan.id).await.unwrap();
        assert_eq!(deleted, plan.id);
        assert!(h.store.find_by_id(plan.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutations_on_unknown_ids_leave_no_lock_entries() {
        let h = harness();
        for _ in 0..8 {
            assert!(h
                .manager
                .update(PlanId::new(), PlanPatch::default())
                .await
                .is_err());
            assert!(h.manager.delete(PlanId::new()).await.is_err());
        }
        // Rejected lookups must not let client-supplied ids accumulate.
        assert_eq!(h.manager.lock_count().await, 0);
    }

    #[tokio::test]
    async fn lock_entries_are_pruned_when_released() {
        let h = harness();
        let plan = h.manager.create(new_plan("Basic")).await.unwrap();

        h.manager
            .update(
                plan.id,
                PlanPatch {
                    name: Some("Plus".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(h.manager.lock_count().await, 0);

        h.manager.delete(plan.id).await.unwrap();
        assert_eq!(h.manager.lock_count().await, 0);
    }

    #[tokio::test]
    async fn get_and_list_pass_through() {
        let h = harness();
        let a = h.manager.create(new_plan("A")).await.unwrap();
        let b = h.manager.create(new_plan("B")).await.unwrap();

        assert_eq!(h.manager.get(a.id).await.unwrap().id, a.id);
        let all = h.manager.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(h.manager.get(PlanId::new()).await.unwrap_err().is_not_found());
        let _ = b;
    }
}
