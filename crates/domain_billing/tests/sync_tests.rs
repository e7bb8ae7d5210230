//! Behavioral tests for two-phase plan synchronization
//!
//! These tests drive `PlanSyncManager` through purpose-built recording ports
//! so they can assert call ordering across the provider/store boundary, not
//! just final state.

use async_trait::async_trait;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PlanId, PortError,
};
use domain_billing::{
    BillingInterval, BillingProviderPort, InMemoryReconciliationQueue, NewPlan, Plan,
    PlanPatch, PlanStore, PlanSyncError, PlanSyncManager, ProviderError,
    ReconciliationQueue, RemotePlan, SyncOperation,
};

/// Ordered record of every port call, shared between the two doubles
type Calls = Arc<Mutex<Vec<String>>>;

fn record(calls: &Calls, entry: impl Into<String>) {
    calls.lock().unwrap().push(entry.into());
}

/// Provider double with a scripted outcome
struct ScriptedProvider {
    calls: Calls,
    /// `Err(message)` rejects every call; `Ok(id)` is returned from create
    outcome: Mutex<Result<String, String>>,
}

impl ScriptedProvider {
    fn succeeding(calls: Calls, remote_id: &str) -> Self {
        Self {
            calls,
            outcome: Mutex::new(Ok(remote_id.to_string())),
        }
    }

    fn failing(calls: Calls, message: &str) -> Self {
        Self {
            calls,
            outcome: Mutex::new(Err(message.to_string())),
        }
    }

    fn scripted(&self) -> Result<String, ProviderError> {
        self.outcome
            .lock()
            .unwrap()
            .clone()
            .map_err(ProviderError::new)
    }
}

impl DomainPort for ScriptedProvider {}

#[async_trait]
impl HealthCheckable for ScriptedProvider {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "scripted-provider".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl BillingProviderPort for ScriptedProvider {
    async fn create_plan(&self, _plan: &NewPlan) -> Result<RemotePlan, ProviderError> {
        record(&self.calls, "provider.create");
        self.scripted().map(|id| RemotePlan { id })
    }

    async fn update_plan(
        &self,
        remote_id: &str,
        _patch: &PlanPatch,
    ) -> Result<RemotePlan, ProviderError> {
        record(&self.calls, format!("provider.update({})", remote_id));
        self.scripted().map(|_| RemotePlan {
            id: remote_id.to_string(),
        })
    }

    async fn delete_plan(&self, remote_id: &str) -> Result<(), ProviderError> {
        record(&self.calls, format!("provider.delete({})", remote_id));
        self.scripted().map(|_| ())
    }
}

/// Store double tracking writes in the shared call log
#[derive(Default)]
struct TrackedStore {
    calls: Calls,
    plans: Mutex<HashMap<PlanId, Plan>>,
    fail_writes: Mutex<bool>,
}

impl TrackedStore {
    fn new(calls: Calls) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    fn seeded(calls: Calls, plans: Vec<Plan>) -> Self {
        let store = Self::new(calls);
        for plan in plans {
            store.plans.lock().unwrap().insert(plan.id, plan);
        }
        store
    }

    fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    fn count(&self) -> usize {
        self.plans.lock().unwrap().len()
    }

    fn snapshot(&self, id: PlanId) -> Option<Plan> {
        self.plans.lock().unwrap().get(&id).cloned()
    }

    fn writable(&self) -> Result<(), PortError> {
        if *self.fail_writes.lock().unwrap() {
            Err(PortError::internal("disk full"))
        } else {
            Ok(())
        }
    }
}

impl DomainPort for TrackedStore {}

#[async_trait]
impl PlanStore for TrackedStore {
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PortError> {
        record(&self.calls, format!("store.find({})", id));
        Ok(self.plans.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Plan>, PortError> {
        Ok(self.plans.lock().unwrap().values().cloned().collect())
    }

    async fn insert(&self, plan: NewPlan, remote_id: String) -> Result<Plan, PortError> {
        record(&self.calls, format!("store.insert({})", remote_id));
        self.writable()?;
        let plan = Plan::from_new(plan, remote_id);
        self.plans.lock().unwrap().insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn update(&self, id: PlanId, patch: PlanPatch) -> Result<Plan, PortError> {
        record(&self.calls, format!("store.update({})", id));
        self.writable()?;
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Plan", id))?;
        plan.apply(&patch);
        Ok(plan.clone())
    }

    async fn delete(&self, id: PlanId) -> Result<(), PortError> {
        record(&self.calls, format!("store.delete({})", id));
        self.writable()?;
        self.plans
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Plan", id))
    }
}

fn basic_plan() -> NewPlan {
    test_utils::PlanBuilder::new().build()
}

fn manager(
    provider: Arc<ScriptedProvider>,
    store: Arc<TrackedStore>,
) -> (PlanSyncManager, Arc<InMemoryReconciliationQueue>) {
    let queue = Arc::new(InMemoryReconciliationQueue::new());
    (
        PlanSyncManager::new(provider, store, queue.clone()),
        queue,
    )
}

// --- no orphan on create failure --------------------------------------------

/// Scenario: create with {name:"Basic", price:10}, provider declines the card.
#[tokio::test]
async fn rejected_create_leaves_no_local_record() {
    let calls = Calls::default();
    let provider = Arc::new(ScriptedProvider::failing(calls.clone(), "card declined"));
    let store = Arc::new(TrackedStore::new(calls.clone()));
    let (manager, queue) = manager(provider, store.clone());

    let err = manager.create(basic_plan()).await.unwrap_err();
    match err {
        PlanSyncError::RemoteFailure(message) => assert_eq!(message, "card declined"),
        other => panic!("expected RemoteFailure, got {:?}", other),
    }

    // The local insert was never attempted, the store is empty, and nothing
    // needs reconciling.
    assert_eq!(store.count(), 0);
    let log = calls.lock().unwrap().clone();
    assert_eq!(log, vec!["provider.create"]);
    assert!(queue.pending().await.is_empty());
}

// --- remote-first ordering on create ----------------------------------------

#[tokio::test]
async fn create_calls_provider_before_store_and_persists_its_id() {
    let calls = Calls::default();
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "plan_123"));
    let store = Arc::new(TrackedStore::new(calls.clone()));
    let (manager, _) = manager(provider, store.clone());

    let plan = manager.create(basic_plan()).await.unwrap();

    assert_eq!(plan.remote_id.as_deref(), Some("plan_123"));
    assert_eq!(store.count(), 1);
    let log = calls.lock().unwrap().clone();
    assert_eq!(log, vec!["provider.create", "store.insert(plan_123)"]);
}

// --- existence precedes remote mutation -------------------------------------

#[tokio::test]
async fn update_of_missing_plan_never_reaches_the_provider() {
    let calls = Calls::default();
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "plan_123"));
    let store = Arc::new(TrackedStore::new(calls.clone()));
    let (manager, _) = manager(provider, store);

    let missing = PlanId::new();
    let err = manager
        .update(missing, PlanPatch::default())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let log = calls.lock().unwrap().clone();
    assert_eq!(log, vec![format!("store.find({})", missing)]);
}

#[tokio::test]
async fn delete_of_missing_plan_never_reaches_the_provider() {
    let calls = Calls::default();
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "plan_123"));
    let store = Arc::new(TrackedStore::new(calls.clone()));
    let (manager, _) = manager(provider, store);

    let err = manager.delete(PlanId::new()).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(calls
        .lock()
        .unwrap()
        .iter()
        .all(|c| !c.starts_with("provider.")));
}

// --- no partial apply on update/delete failure ------------------------------

#[tokio::test]
async fn rejected_update_leaves_record_unmodified() {
    let calls = Calls::default();
    let existing = Plan::from_new(basic_plan(), "plan_123".to_string());
    let before = existing.clone();
    let provider = Arc::new(ScriptedProvider::failing(calls.clone(), "rate limited"));
    let store = Arc::new(TrackedStore::seeded(calls.clone(), vec![existing.clone()]));
    let (manager, _) = manager(provider, store.clone());

    let patch = PlanPatch {
        name: Some("Premium".to_string()),
        amount: Some(Decimal::from(99)),
        ..Default::default()
    };
    let err = manager.update(existing.id, patch).await.unwrap_err();
    assert!(matches!(err, PlanSyncError::RemoteFailure(_)));

    // Byte-for-byte: every field equals the pre-call snapshot.
    assert_eq!(store.snapshot(existing.id), Some(before));
}

#[tokio::test]
async fn rejected_delete_retains_local_record() {
    let calls = Calls::default();
    let existing = Plan::from_new(basic_plan(), "plan_123".to_string());
    let provider = Arc::new(ScriptedProvider::failing(calls.clone(), "cannot delete"));
    let store = Arc::new(TrackedStore::seeded(calls.clone(), vec![existing.clone()]));
    let (manager, _) = manager(provider, store.clone());

    assert!(manager.delete(existing.id).await.is_err());
    assert_eq!(store.snapshot(existing.id), Some(existing));
}

// --- update/delete are scoped to the record's own remote id ------------------

#[tokio::test]
async fn remote_calls_use_the_found_records_remote_id() {
    let calls = Calls::default();
    let plan_a = Plan::from_new(basic_plan(), "plan_aaa".to_string());
    let plan_b = Plan::from_new(basic_plan(), "plan_bbb".to_string());
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "unused"));
    let store = Arc::new(TrackedStore::seeded(
        calls.clone(),
        vec![plan_a.clone(), plan_b.clone()],
    ));
    let (manager, _) = manager(provider, store);

    manager
        .update(plan_a.id, PlanPatch::default())
        .await
        .unwrap();
    manager.delete(plan_b.id).await.unwrap();

    let log = calls.lock().unwrap().clone();
    assert!(log.contains(&"provider.update(plan_aaa)".to_string()));
    assert!(log.contains(&"provider.delete(plan_bbb)".to_string()));
}

// --- scenario: successful delete --------------------------------------------

#[tokio::test]
async fn successful_delete_removes_the_local_record() {
    let calls = Calls::default();
    let existing = Plan::from_new(basic_plan(), "plan_123".to_string());
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "unused"));
    let store = Arc::new(TrackedStore::seeded(calls.clone(), vec![existing.clone()]));
    let (manager, _) = manager(provider.clone(), store.clone());

    let confirmed = manager.delete(existing.id).await.unwrap();
    assert_eq!(confirmed, existing.id);
    assert!(store.snapshot(existing.id).is_none());
    assert!(calls
        .lock()
        .unwrap()
        .contains(&"provider.delete(plan_123)".to_string()));
}

// --- inconsistent outcomes are recorded -------------------------------------

#[tokio::test]
async fn update_store_failure_after_remote_success_is_inconsistent() {
    let calls = Calls::default();
    let existing = Plan::from_new(basic_plan(), "plan_123".to_string());
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "unused"));
    let store = Arc::new(TrackedStore::seeded(calls.clone(), vec![existing.clone()]));
    let (manager, queue) = manager(provider, store.clone());

    store.fail_writes();
    let err = manager
        .update(existing.id, PlanPatch::default())
        .await
        .unwrap_err();

    assert!(err.is_inconsistent());
    let pending = queue.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].operation, SyncOperation::Update);
    assert_eq!(pending[0].plan_id, Some(existing.id));
    assert_eq!(pending[0].remote_id.as_deref(), Some("plan_123"));
}

#[tokio::test]
async fn delete_store_failure_after_remote_success_is_inconsistent() {
    let calls = Calls::default();
    let existing = Plan::from_new(basic_plan(), "plan_123".to_string());
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "unused"));
    let store = Arc::new(TrackedStore::seeded(calls.clone(), vec![existing.clone()]));
    let (manager, queue) = manager(provider, store.clone());

    store.fail_writes();
    let err = manager.delete(existing.id).await.unwrap_err();

    assert!(err.is_inconsistent());
    // The remote resource is gone but the local row survived the failed write.
    assert!(calls
        .lock()
        .unwrap()
        .contains(&"provider.delete(plan_123)".to_string()));
    assert!(store.snapshot(existing.id).is_some());

    let pending = queue.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].operation, SyncOperation::Delete);
    assert_eq!(pending[0].plan_id, Some(existing.id));
    assert_eq!(pending[0].remote_id.as_deref(), Some("plan_123"));
}

// --- concurrency: same-id mutations serialize -------------------------------

#[tokio::test]
async fn concurrent_updates_on_one_plan_both_complete() {
    let calls = Calls::default();
    let existing = Plan::from_new(basic_plan(), "plan_123".to_string());
    let provider = Arc::new(ScriptedProvider::succeeding(calls.clone(), "unused"));
    let store = Arc::new(TrackedStore::seeded(calls.clone(), vec![existing.clone()]));
    let queue = Arc::new(InMemoryReconciliationQueue::new());
    let manager = Arc::new(PlanSyncManager::new(provider, store.clone(), queue));

    let first = {
        let manager = manager.clone();
        let id = existing.id;
        tokio::spawn(async move {
            manager
                .update(
                    id,
                    PlanPatch {
                        name: Some("First".to_string()),
                        ..Default::default()
                    },
                )
                .await
        })
    };
    let second = {
        let manager = manager.clone();
        let id = existing.id;
        tokio::spawn(async move {
            manager
                .update(
                    id,
                    PlanPatch {
                        name: Some("Second".to_string()),
                        ..Default::default()
                    },
                )
                .await
        })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // Serialized execution: each update's find/remote/local triple is
    // contiguous in the log, never interleaved with the other's.
    let log = calls.lock().unwrap().clone();
    let ops: Vec<&str> = log
        .iter()
        .map(|c| c.split('(').next().unwrap())
        .collect();
    assert_eq!(
        ops,
        vec![
            "store.find",
            "provider.update",
            "store.update",
            "store.find",
            "provider.update",
            "store.update",
        ]
    );

    // Last writer wins; the record carries one of the two names.
    let name = store.snapshot(existing.id).unwrap().name;
    assert!(name == "First" || name == "Second");
}

// --- property: a failing provider never mutates local state ------------------

fn arb_patch() -> impl Strategy<Value = PlanPatch> {
    (
        proptest::option::of("[A-Za-z]{1,12}"),
        proptest::option::of(0i64..1_000_000),
        proptest::option::of(prop_oneof![Just("usd"), Just("eur"), Just("gbp")]),
        proptest::option::of(prop_oneof![
            Just(BillingInterval::Month),
            Just(BillingInterval::Year)
        ]),
    )
        .prop_map(|(name, cents, currency, interval)| PlanPatch {
            name,
            amount: cents.map(|c| Decimal::new(c, 2)),
            currency: currency.map(str::to_string),
            interval,
            description: None,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn failing_remote_update_never_changes_local_fields(patch in arb_patch()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let calls = Calls::default();
            let existing = Plan::from_new(basic_plan(), "plan_123".to_string());
            let before = existing.clone();
            let provider =
                Arc::new(ScriptedProvider::failing(calls.clone(), "provider down"));
            let store =
                Arc::new(TrackedStore::seeded(calls.clone(), vec![existing.clone()]));
            let (manager, _) = manager(provider, store.clone());

            let _ = manager.update(existing.id, patch).await;
            assert_eq!(store.snapshot(existing.id), Some(before));
        });
    }
}
