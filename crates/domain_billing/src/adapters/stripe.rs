//! Stripe-style billing provider adapter
//!
//! Implements [`BillingProviderPort`] against a Stripe-compatible REST API:
//! form-encoded writes to `/v1/plans`, bearer authentication with the account
//! secret key, and the provider's `{"error": {"message": ...}}` envelope on
//! failure.
//!
//! # Error normalization
//!
//! Every non-success outcome is flattened into [`ProviderError`] before it
//! reaches the sync manager:
//!
//! - non-2xx responses use the error envelope's message when the body parses,
//!   otherwise a message derived from the HTTP status;
//! - transport failures (DNS, TLS, timeout) use the client error's message.
//!
//! The adapter performs no retries; sequencing and failure policy belong to
//! the sync manager.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use std::time::{Duration, Instant};

use core_kernel::{AdapterHealth, CoreError, DomainPort, HealthCheckResult, HealthCheckable};

use crate::plan::{NewPlan, PlanPatch};
use crate::ports::{BillingProviderPort, ProviderError, RemotePlan};

/// Configuration for the billing provider connection
#[derive(Debug, Clone)]
pub struct StripeBillingConfig {
    /// Base URL of the provider API (e.g. "https://api.stripe.com")
    pub base_url: String,
    /// Account secret key used as bearer token
    pub secret_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StripeBillingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.stripe.com".to_string(),
            secret_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// REST adapter for a Stripe-compatible billing provider
#[derive(Debug)]
pub struct StripeBillingAdapter {
    config: StripeBillingConfig,
    client: Client,
}

/// Provider error envelope: `{"error": {"message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl StripeBillingAdapter {
    /// Creates an adapter with the given configuration
    pub fn new(config: StripeBillingConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::configuration(format!("billing http client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Returns the configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        self.client
            .request(method, url)
            .bearer_auth(&self.config.secret_key)
    }

    /// Sends a request and normalizes every failure path to `ProviderError`
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!(
                "billing provider returned {}",
                status
                    .canonical_reason()
                    .map(str::to_owned)
                    .unwrap_or_else(|| status.to_string())
            ),
        };
        Err(ProviderError::new(message))
    }

    /// Form fields for a plan create
    fn create_form(plan: &NewPlan) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("name", plan.name.clone()),
            ("amount", to_minor_units(plan.amount)),
            ("currency", plan.currency.clone()),
            ("interval", plan.interval.to_string()),
        ];
        if let Some(description) = &plan.description {
            form.push(("description", description.clone()));
        }
        form
    }

    /// Form fields for a plan update; only patched fields are sent
    fn patch_form(patch: &PlanPatch) -> Vec<(&'static str, String)> {
        let mut form = Vec::new();
        if let Some(name) = &patch.name {
            form.push(("name", name.clone()));
        }
        if let Some(amount) = patch.amount {
            form.push(("amount", to_minor_units(amount)));
        }
        if let Some(currency) = &patch.currency {
            form.push(("currency", currency.clone()));
        }
        if let Some(interval) = patch.interval {
            form.push(("interval", interval.to_string()));
        }
        if let Some(description) = &patch.description {
            form.push(("description", description.clone()));
        }
        form
    }
}

/// Converts a major-unit decimal amount to the provider's integer minor units
fn to_minor_units(amount: rust_decimal::Decimal) -> String {
    (amount * rust_decimal::Decimal::from(100))
        .round()
        .normalize()
        .to_string()
}

impl DomainPort for StripeBillingAdapter {}

#[async_trait]
impl HealthCheckable for StripeBillingAdapter {
    /// Verifies connectivity and credentials with a minimal list request
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.send(self.request(Method::GET, "/v1/plans?limit=1")).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "stripe-billing-adapter".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "stripe-billing-adapter".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(e.message),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl BillingProviderPort for StripeBillingAdapter {
    async fn create_plan(&self, plan: &NewPlan) -> Result<RemotePlan, ProviderError> {
        let response = self
            .send(
                self.request(Method::POST, "/v1/plans")
                    .form(&Self::create_form(plan)),
            )
            .await?;
        response
            .json::<RemotePlan>()
            .await
            .map_err(|e| ProviderError::new(format!("malformed provider response: {}", e)))
    }

    async fn update_plan(
        &self,
        remote_id: &str,
        patch: &PlanPatch,
    ) -> Result<RemotePlan, ProviderError> {
        let path = format!("/v1/plans/{}", remote_id);
        let response = self
            .send(
                self.request(Method::POST, &path)
                    .form(&Self::patch_form(patch)),
            )
            .await?;
        response
            .json::<RemotePlan>()
            .await
            .map_err(|e| ProviderError::new(format!("malformed provider response: {}", e)))
    }

    async fn delete_plan(&self, remote_id: &str) -> Result<(), ProviderError> {
        let path = format!("/v1/plans/{}", remote_id);
        // 2xx is sufficient confirmation; the deletion body is not inspected
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::BillingInterval;
    use rust_decimal::Decimal;

    #[test]
    fn config_defaults() {
        let config = StripeBillingConfig::default();
        assert_eq!(config.base_url, "https://api.stripe.com");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn amount_converts_to_minor_units() {
        assert_eq!(to_minor_units(Decimal::new(1000, 2)), "1000"); // 10.00 -> 1000
        assert_eq!(to_minor_units(Decimal::new(999, 1)), "9990"); // 99.9 -> 9990
        assert_eq!(to_minor_units(Decimal::from(10)), "1000");
    }

    #[test]
    fn create_form_includes_all_required_fields() {
        let plan = NewPlan {
            name: "Basic".to_string(),
            amount: Decimal::new(1000, 2),
            currency: "usd".to_string(),
            interval: BillingInterval::Month,
            description: None,
        };
        let form = StripeBillingAdapter::create_form(&plan);
        let keys: Vec<&str> = form.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["name", "amount", "currency", "interval"]);
        assert!(form.contains(&("interval", "month".to_string())));
    }

    #[test]
    fn patch_form_sends_only_set_fields() {
        let patch = PlanPatch {
            amount: Some(Decimal::new(2500, 2)),
            ..Default::default()
        };
        let form = StripeBillingAdapter::patch_form(&patch);
        assert_eq!(form, vec![("amount", "2500".to_string())]);

        assert!(StripeBillingAdapter::patch_form(&PlanPatch::default()).is_empty());
    }
}
