//! Billing provider adapters
//!
//! Production uses the Stripe-style REST adapter; tests use the mocks in
//! [`crate::ports::mock`].

pub mod stripe;

pub use stripe::{StripeBillingAdapter, StripeBillingConfig};
