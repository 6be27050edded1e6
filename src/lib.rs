//! Weldtrack: weld job tracking for welding machine fleets.
//!
//! This crate records weld jobs reported by welding machines, assigns each
//! job a short human-facing business identifier, and tracks the job from
//! registration to completion. It also keeps the backing `weld_details`
//! table in step with the current layout, manages welder qualification
//! certificates with expiry alerts, and tracks equipment calibration due
//! dates.
//!
//! # Architecture
//!
//! Weldtrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, in-memory)
//!
//! # Modules
//!
//! - [`weld_job`]: Weld job records, identifier allocation and lifecycle
//! - [`certificate`]: Welder certificate intake and expiry tracking
//! - [`calibration`]: Equipment calibration intake and due-date tracking
//! - [`config`]: TOML configuration with environment overrides
//! - [`retry`]: Bounded retry for external collaborators
//! - [`telemetry`]: Tracing subscriber setup

pub mod calibration;
pub mod certificate;
pub mod config;
pub mod retry;
pub mod telemetry;
pub mod weld_job;
