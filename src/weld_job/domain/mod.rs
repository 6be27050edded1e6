//! Domain model for weld job record lifecycle.
//!
//! The weld job domain models record identity, business identifier rules,
//! completion state, and the expected table shape, while keeping all
//! infrastructure concerns outside of the domain boundary.

mod completion;
mod details;
mod error;
mod ids;
mod record;
pub mod schema;

pub use completion::{CompletionFlag, LastJobStatus};
pub use details::WeldJobDetails;
pub use error::{ParseCompletionFlagError, WeldJobDomainError};
pub use ids::{BusinessId, DeviceId, DeviceName, SequenceId};
pub use record::{NewWeldJob, PersistedWeldJobData, WeldJobRecord};
pub use schema::{SchemaStep, TableSnapshot, plan_schema_steps};
