//! Core Kernel - Foundational types for the clinic platform
//!
//! This crate provides the building blocks used across all layers:
//! - Strongly-typed identifiers for every entity
//! - The core error taxonomy
//! - Port infrastructure for the hexagonal architecture (ports and adapters)

pub mod error;
pub mod identifiers;
pub mod ports;

pub use error::CoreError;
pub use identifiers::{
    ClinicId, CompanyId, ConversationId, DeviceId, MessageId, NotificationId, PlanId, UserId,
};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
