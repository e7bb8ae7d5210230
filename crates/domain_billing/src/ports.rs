//! Billing Domain Ports
//!
//! Two port traits isolate the sync manager from its collaborators:
//!
//! - [`BillingProviderPort`] performs the plan calls against the external
//!   billing provider. Every non-success outcome, transport or application
//!   level, is normalized to [`ProviderError`] before it reaches the manager.
//! - [`PlanStore`] is the persistence abstraction for the authoritative local
//!   record (PostgreSQL in production, in-memory in tests).
//!
//! The store and the provider have no awareness of each other; sequencing is
//! owned entirely by [`crate::sync::PlanSyncManager`].

use async_trait::async_trait;
use core_kernel::{DomainPort, HealthCheckable, PlanId, PortError};
use serde::Deserialize;
use thiserror::Error;

use crate::plan::{NewPlan, Plan, PlanPatch};

/// Normalized error from the billing provider
///
/// Whatever the provider returned (HTTP status, error envelope, transport
/// failure) is flattened into a single human-readable message, which callers
/// pass through to clients verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Success payload from a remote plan create/update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemotePlan {
    /// Provider-assigned identifier, e.g. `plan_1MzF9x...`
    pub id: String,
}

/// Port to the external billing provider
#[async_trait]
pub trait BillingProviderPort: DomainPort + HealthCheckable {
    /// Creates the plan at the provider, returning its remote identifier
    async fn create_plan(&self, plan: &NewPlan) -> Result<RemotePlan, ProviderError>;

    /// Updates the remote plan identified by `remote_id`
    ///
    /// The identifier must be the one stored on the local record being
    /// updated, never a global or default target.
    async fn update_plan(&self, remote_id: &str, patch: &PlanPatch)
        -> Result<RemotePlan, ProviderError>;

    /// Deletes the remote plan identified by `remote_id`
    async fn delete_plan(&self, remote_id: &str) -> Result<(), ProviderError>;
}

/// Port to the local plan store
#[async_trait]
pub trait PlanStore: DomainPort {
    /// Looks up a plan, returning `None` when absent
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PortError>;

    /// Returns all plans
    async fn list(&self) -> Result<Vec<Plan>, PortError>;

    /// Persists a new plan with the provider-assigned `remote_id` attached
    ///
    /// Single local write; there is no pre-insert placeholder record.
    async fn insert(&self, plan: NewPlan, remote_id: String) -> Result<Plan, PortError>;

    /// Applies a partial update to an existing plan
    async fn update(&self, id: PlanId, patch: PlanPatch) -> Result<Plan, PortError>;

    /// Removes a plan by id
    async fn delete(&self, id: PlanId) -> Result<(), PortError>;
}

/// In-memory mock ports for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::RwLock;

    /// In-memory mock of the billing provider
    ///
    /// Succeeds by default, assigning sequential `plan_N` identifiers. A
    /// scripted failure message makes every call return that error until
    /// cleared.
    #[derive(Debug, Default)]
    pub struct MockBillingProvider {
        fail_with: RwLock<Option<String>>,
        next_id: AtomicU64,
        fixed_id: RwLock<Option<String>>,
    }

    impl MockBillingProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent call fail with `message`
        pub async fn fail_with(&self, message: impl Into<String>) {
            *self.fail_with.write().await = Some(message.into());
        }

        /// Restores the default success behavior
        pub async fn succeed(&self) {
            *self.fail_with.write().await = None;
        }

        /// Forces the next create to return a specific remote id
        pub async fn set_next_remote_id(&self, id: impl Into<String>) {
            *self.fixed_id.write().await = Some(id.into());
        }

        async fn outcome(&self) -> Result<(), ProviderError> {
            match self.fail_with.read().await.as_ref() {
                Some(message) => Err(ProviderError::new(message.clone())),
                None => Ok(()),
            }
        }

        async fn assign_id(&self) -> String {
            if let Some(fixed) = self.fixed_id.write().await.take() {
                return fixed;
            }
            let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            format!("plan_{}", n)
        }
    }

    impl DomainPort for MockBillingProvider {}

    #[async_trait]
    impl HealthCheckable for MockBillingProvider {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-billing-provider".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl BillingProviderPort for MockBillingProvider {
        async fn create_plan(&self, _plan: &NewPlan) -> Result<RemotePlan, ProviderError> {
            self.outcome().await?;
            Ok(RemotePlan {
                id: self.assign_id().await,
            })
        }

        async fn update_plan(
            &self,
            remote_id: &str,
            _patch: &PlanPatch,
        ) -> Result<RemotePlan, ProviderError> {
            self.outcome().await?;
            Ok(RemotePlan {
                id: remote_id.to_string(),
            })
        }

        async fn delete_plan(&self, _remote_id: &str) -> Result<(), ProviderError> {
            self.outcome().await
        }
    }

    /// In-memory mock of the plan store
    #[derive(Debug, Default)]
    pub struct MockPlanStore {
        plans: RwLock<HashMap<PlanId, Plan>>,
        fail_writes: RwLock<bool>,
    }

    impl MockPlanStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store for tests
        pub async fn with_plans(plans: Vec<Plan>) -> Self {
            let store = Self::new();
            for plan in plans {
                store.plans.write().await.insert(plan.id, plan);
            }
            store
        }

        /// Makes every subsequent write fail, simulating a storage outage
        /// after the remote call already succeeded
        pub async fn fail_writes(&self) {
            *self.fail_writes.write().await = true;
        }

        /// Number of stored plans
        pub async fn count(&self) -> usize {
            self.plans.read().await.len()
        }

        async fn check_writable(&self) -> Result<(), PortError> {
            if *self.fail_writes.read().await {
                Err(PortError::internal("simulated store write failure"))
            } else {
                Ok(())
            }
        }
    }

    impl DomainPort for MockPlanStore {}

    #[async_trait]
    impl PlanStore for MockPlanStore {
        async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PortError> {
            Ok(self.plans.read().await.get(&id).cloned())
        }

        async fn list(&self) -> Result<Vec<Plan>, PortError> {
            let mut plans: Vec<Plan> = self.plans.read().await.values().cloned().collect();
            plans.sort_by_key(|p| p.created_at);
            Ok(plans)
        }

        async fn insert(&self, plan: NewPlan, remote_id: String) -> Result<Plan, PortError> {
            self.check_writable().await?;
            let plan = Plan::from_new(plan, remote_id);
            self.plans.write().await.insert(plan.id, plan.clone());
            Ok(plan)
        }

        async fn update(&self, id: PlanId, patch: PlanPatch) -> Result<Plan, PortError> {
            self.check_writable().await?;
            let mut plans = self.plans.write().await;
            let plan = plans
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Plan", id))?;
            plan.apply(&patch);
            Ok(plan.clone())
        }

        async fn delete(&self, id: PlanId) -> Result<(), PortError> {
            self.check_writable().await?;
            self.plans
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Plan", id))
        }
    }
}
