//! Port contracts for weld job lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by weld job services.

pub mod repository;
pub mod schema;

pub use repository::{WeldJobRepository, WeldJobRepositoryError, WeldJobRepositoryResult};
pub use schema::{SchemaGuardError, SchemaReport, SchemaWarning, WeldJobSchema};
