//! Port adapters backed by PostgreSQL
//!
//! These types bridge the domain port traits to the repositories in this
//! crate, translating row types to domain models and `DatabaseError` to
//! `PortError`.

pub mod billing;

pub use billing::PostgresPlanStore;
