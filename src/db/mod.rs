//! Database module
//!
//! PostgreSQL integration using sqlx with:
//! - Connection pool management
//! - Row types with FromRow
//! - Repository pattern for data access
//! - Batched content writes with COPY protocol

pub mod models;
pub mod pool;
pub mod repository;

pub use models::{ContentRow, M3uListRow};
pub use pool::{create_pool, health_check, run_migrations};
