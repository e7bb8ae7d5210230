//! The subscription plan entity
//!
//! Plans are the one entity in the system with a remote counterpart: each
//! local record carries the billing provider's identifier in `remote_id`,
//! which stays `None` only for records that predate provider onboarding.
//! Fields beyond identity are pass-through subscription attributes.

use chrono::{DateTime, Utc};
use core_kernel::PlanId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing cycle for a subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Month,
    Year,
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingInterval::Month => write!(f, "month"),
            BillingInterval::Year => write!(f, "year"),
        }
    }
}

impl FromStr for BillingInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(BillingInterval::Month),
            "year" => Ok(BillingInterval::Year),
            other => Err(format!("unknown billing interval: {}", other)),
        }
    }
}

/// A subscription plan as persisted locally
///
/// The invariant this crate protects: whenever no operation is in flight, a
/// plan with `remote_id = Some(id)` corresponds to an existing resource with
/// that identifier at the billing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    /// Identifier at the billing provider; set on first successful remote
    /// create and never changed afterwards
    pub remote_id: Option<String>,
    pub name: String,
    /// Price per billing interval, in major currency units
    pub amount: Decimal,
    /// ISO 4217 currency code, lowercase (provider convention)
    pub currency: String,
    pub interval: BillingInterval,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a plan
///
/// Validated upstream by the API layer; this type assumes well-formed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub interval: BillingInterval,
    pub description: Option<String>,
}

/// Partial update for a plan
///
/// Every field is optional; `None` means "leave unchanged". `description`
/// cannot be cleared through a patch, only replaced. `remote_id` is not
/// patchable: it is owned by the synchronization flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub interval: Option<BillingInterval>,
    pub description: Option<String>,
}

impl Plan {
    /// Applies a partial update in place, refreshing `updated_at`
    pub fn apply(&mut self, patch: &PlanPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(currency) = &patch.currency {
            self.currency = currency.clone();
        }
        if let Some(interval) = patch.interval {
            self.interval = interval;
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        self.updated_at = Utc::now();
    }

    /// Builds a plan from creation input plus the provider-assigned identifier
    pub fn from_new(new: NewPlan, remote_id: String) -> Self {
        let now = Utc::now();
        Plan {
            id: PlanId::new_v7(),
            remote_id: Some(remote_id),
            name: new.name,
            amount: new.amount,
            currency: new.currency,
            interval: new.interval,
            description: new.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_plan() -> Plan {
        Plan::from_new(
            NewPlan {
                name: "Basic".to_string(),
                amount: Decimal::new(1000, 2),
                currency: "usd".to_string(),
                interval: BillingInterval::Month,
                description: None,
            },
            "plan_123".to_string(),
        )
    }

    #[test]
    fn from_new_attaches_remote_id() {
        let plan = base_plan();
        assert_eq!(plan.remote_id.as_deref(), Some("plan_123"));
        assert_eq!(plan.amount, Decimal::new(1000, 2));
    }

    #[test]
    fn empty_patch_changes_no_fields() {
        let mut plan = base_plan();
        let before = plan.clone();
        plan.apply(&PlanPatch::default());
        assert_eq!(plan.name, before.name);
        assert_eq!(plan.amount, before.amount);
        assert_eq!(plan.currency, before.currency);
        assert_eq!(plan.interval, before.interval);
        assert_eq!(plan.description, before.description);
        assert_eq!(plan.remote_id, before.remote_id);
    }

    #[test]
    fn patch_replaces_only_named_fields() {
        let mut plan = base_plan();
        plan.apply(&PlanPatch {
            name: Some("Premium".to_string()),
            amount: Some(Decimal::new(2500, 2)),
            ..Default::default()
        });
        assert_eq!(plan.name, "Premium");
        assert_eq!(plan.amount, Decimal::new(2500, 2));
        assert_eq!(plan.currency, "usd");
        assert_eq!(plan.interval, BillingInterval::Month);
    }

    #[test]
    fn interval_parses_both_directions() {
        assert_eq!(
            "month".parse::<BillingInterval>().unwrap(),
            BillingInterval::Month
        );
        assert_eq!(BillingInterval::Year.to_string(), "year");
        assert!("weekly".parse::<BillingInterval>().is_err());
    }
}
