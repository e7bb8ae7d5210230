//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the clinic backend:
//! connection pooling, repositories for each entity, and the adapters that
//! implement the domain port traits.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Handlers and domain services
//! never touch sqlx directly; they go through a repository or, for the plan
//! store, through the `PlanStore` port implemented by [`PostgresPlanStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, PostgresPlanStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/clinic")).await?;
//! let store = PostgresPlanStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresPlanStore;
pub use error::DatabaseError;
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
