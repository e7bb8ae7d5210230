//! Pre-built test fixtures
//!
//! Stable identifiers and canonical entities shared across test suites, so
//! assertions can refer to the same well-known values.

use once_cell::sync::Lazy;
use uuid::Uuid;

use core_kernel::{CompanyId, UserId};
use domain_billing::Plan;

use crate::builders::PlanBuilder;

/// The remote identifier the scripted billing provider hands out first
pub const REMOTE_PLAN_ID: &str = "plan_123";

/// A stable company id for permission-gate scenarios
pub static COMPANY_ID: Lazy<CompanyId> = Lazy::new(|| {
    CompanyId::from_uuid(Uuid::from_u128(0x00c0_ffee_0000_0000_0000_0000_0000_0001))
});

/// A stable user id for authenticated-caller scenarios
pub static USER_ID: Lazy<UserId> = Lazy::new(|| {
    UserId::from_uuid(Uuid::from_u128(0x00c0_ffee_0000_0000_0000_0000_0000_0002))
});

/// The canonical synced plan: "Basic", 10.00 usd monthly, with the well-known
/// remote id attached
pub fn basic_plan() -> Plan {
    PlanBuilder::new().build_synced(REMOTE_PLAN_ID)
}

/// A plan that predates billing-provider onboarding (no remote id)
pub fn legacy_plan() -> Plan {
    let mut plan = PlanBuilder::new().with_name("Legacy").build_synced("tmp");
    plan.remote_id = None;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_ids_are_stable() {
        assert_eq!(*COMPANY_ID, *COMPANY_ID);
        assert_ne!(COMPANY_ID.as_uuid(), USER_ID.as_uuid());
    }

    #[test]
    fn legacy_plan_has_no_remote_id() {
        assert!(legacy_plan().remote_id.is_none());
        assert_eq!(basic_plan().remote_id.as_deref(), Some(REMOTE_PLAN_ID));
    }
}
