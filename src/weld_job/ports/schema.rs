//! Schema guard port for the weld job table.

use crate::weld_job::domain::SchemaStep;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Brings the persisted table to the current expected shape.
#[async_trait]
pub trait WeldJobSchema: Send + Sync {
    /// Ensures the table matches the current shape.
    ///
    /// Idempotent: a second call after a successful first call applies
    /// nothing. Each step is committed on its own, so a failure leaves
    /// earlier steps in place.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGuardError`] when the store is unreachable or a
    /// mandatory step fails. Constraint steps never fail the guard; their
    /// failures are reported as [`SchemaWarning`]s.
    async fn ensure_schema(&self) -> Result<SchemaReport, SchemaGuardError>;
}

/// Outcome of one schema guard run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Steps applied successfully, in order.
    pub applied: Vec<SchemaStep>,
    /// Soft steps that failed.
    pub warnings: Vec<SchemaWarning>,
}

impl SchemaReport {
    /// Returns `true` when nothing needed to change.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.warnings.is_empty()
    }
}

/// A constraint step that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    /// Step that failed.
    pub step: SchemaStep,
    /// Reason reported by the store.
    pub reason: String,
}

/// Errors that abort the schema guard.
#[derive(Debug, Clone, Error)]
pub enum SchemaGuardError {
    /// The store could not be reached.
    #[error("store unreachable: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// Introspecting the current shape failed.
    #[error("failed to inspect schema: {0}")]
    Inspect(Arc<dyn std::error::Error + Send + Sync>),

    /// A mandatory step failed.
    #[error("schema step '{step}' failed: {cause}")]
    Step {
        /// Step that failed.
        step: SchemaStep,
        /// Underlying failure.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },
}
