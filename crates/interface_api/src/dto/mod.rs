//! Request/response data transfer objects
//!
//! Create/update requests carry declarative validation; handlers call
//! `validate()` before touching any repository. Response types own the
//! row-to-JSON mapping.

pub mod clinic;
pub mod device;
pub mod message;
pub mod notification;
pub mod plan;
