//! Billing Domain - Plan Synchronization
//!
//! This crate owns the subscription `Plan` entity and the logic that keeps the
//! local plan record consistent with its counterpart at the external billing
//! provider.
//!
//! # Two-phase writes
//!
//! Plan create, update, and delete are two-phase: the remote billing call runs
//! first, and the local write runs only if the remote call succeeded. A remote
//! failure aborts the operation with the provider's message and leaves local
//! state untouched. A local failure *after* a successful remote call is the one
//! place local and remote can diverge; it is surfaced as a distinct
//! [`PlanSyncError::Inconsistent`] and recorded in the
//! [`reconcile::ReconciliationQueue`] for operators.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{PlanSyncManager, NewPlan};
//!
//! let manager = PlanSyncManager::new(provider, store, reconciliation);
//! let plan = manager.create(NewPlan { name: "Basic".into(), ..default }).await?;
//! assert!(plan.remote_id.is_some());
//! ```

pub mod adapters;
pub mod error;
pub mod plan;
pub mod ports;
pub mod reconcile;
pub mod sync;

pub use adapters::{StripeBillingAdapter, StripeBillingConfig};
pub use error::PlanSyncError;
pub use plan::{BillingInterval, NewPlan, Plan, PlanPatch};
pub use ports::{BillingProviderPort, PlanStore, ProviderError, RemotePlan};
pub use reconcile::{
    InMemoryReconciliationQueue, ReconciliationEntry, ReconciliationQueue, SyncOperation,
};
pub use sync::PlanSyncManager;
