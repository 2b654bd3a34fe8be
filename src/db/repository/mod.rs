//! Database repositories
//!
//! Repository pattern for database access, separating data access logic
//! from business logic.

pub mod content;
pub mod favorites;
pub mod lists;

pub use content::{ContentFilter, ContentScope, ContentWriter};
