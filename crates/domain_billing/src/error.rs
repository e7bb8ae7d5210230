//! Billing domain errors

use core_kernel::{PlanId, PortError};
use thiserror::Error;

use crate::reconcile::SyncOperation;

/// Errors returned by the plan sync manager
///
/// All failures are returned as values; nothing is panicked or masked. The
/// provider's message text is carried through verbatim in `RemoteFailure` to
/// aid debugging.
#[derive(Debug, Error)]
pub enum PlanSyncError {
    /// The local record does not exist; no remote call was attempted
    #[error("Plan not found: {0}")]
    NotFound(PlanId),

    /// The billing provider rejected the operation; local state is untouched
    #[error("{0}")]
    RemoteFailure(String),

    /// The remote call succeeded but the local write failed afterwards.
    /// Local and remote state disagree; a reconciliation entry was recorded.
    /// Not safely recoverable by retry.
    #[error("inconsistent state after remote {operation} ({remote_id:?}): {message}")]
    Inconsistent {
        operation: SyncOperation,
        remote_id: Option<String>,
        message: String,
    },

    /// The local store failed before any remote call was made
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl PlanSyncError {
    /// Returns true if local and remote state may disagree
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, PlanSyncError::Inconsistent { .. })
    }

    /// Returns true if the plan was not found locally
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlanSyncError::NotFound(_))
    }
}
