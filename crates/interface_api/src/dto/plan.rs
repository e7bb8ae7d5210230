//! Plan DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::PlanId;
use domain_billing::{BillingInterval, NewPlan, Plan, PlanPatch};

use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(custom(function = "validate_interval"))]
    pub interval: String,
    pub description: Option<String>,
}

impl CreatePlanRequest {
    /// Converts the validated request into the domain input
    pub fn into_new_plan(self) -> Result<NewPlan, ApiError> {
        let interval = parse_interval(&self.interval)?;
        Ok(NewPlan {
            name: self.name,
            amount: self.amount,
            currency: self.currency.to_lowercase(),
            interval,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Option<Decimal>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[validate(custom(function = "validate_interval"))]
    pub interval: Option<String>,
    pub description: Option<String>,
}

impl UpdatePlanRequest {
    /// Converts the validated request into a partial patch
    pub fn into_patch(self) -> Result<PlanPatch, ApiError> {
        let interval = self.interval.as_deref().map(parse_interval).transpose()?;
        Ok(PlanPatch {
            name: self.name,
            amount: self.amount,
            currency: self.currency.map(|c| c.to_lowercase()),
            interval,
            description: self.description,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: PlanId,
    pub remote_id: Option<String>,
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub interval: BillingInterval,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id,
            remote_id: plan.remote_id,
            name: plan.name,
            amount: plan.amount,
            currency: plan.currency,
            interval: plan.interval,
            description: plan.description,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

fn parse_interval(value: &str) -> Result<BillingInterval, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::Validation(format!("unknown billing interval '{}'", value)))
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    Ok(())
}

fn validate_interval(interval: &str) -> Result<(), ValidationError> {
    interval
        .parse::<BillingInterval>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_interval"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_rejects_non_positive_amount() {
        let request = CreatePlanRequest {
            name: "Basic".to_string(),
            amount: Decimal::ZERO,
            currency: "usd".to_string(),
            interval: "month".to_string(),
            description: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_unknown_interval() {
        let request = CreatePlanRequest {
            name: "Basic".to_string(),
            amount: Decimal::from(10),
            currency: "usd".to_string(),
            interval: "weekly".to_string(),
            description: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_converts_to_patch() {
        let request = UpdatePlanRequest {
            name: Some("Premium".to_string()),
            amount: None,
            currency: None,
            interval: Some("year".to_string()),
            description: None,
        };
        let patch = request.into_patch().unwrap();
        assert_eq!(patch.name.as_deref(), Some("Premium"));
        assert_eq!(patch.interval, Some(BillingInterval::Year));
        assert!(patch.amount.is_none());
    }
}
