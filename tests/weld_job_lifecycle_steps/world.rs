//! Shared world state for weld job lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use weldtrack::weld_job::{
    adapters::memory::InMemoryWeldJobRepository,
    domain::{BusinessId, DeviceId, SequenceId},
    services::{RandomBusinessIdSource, RegistrationOutcome, WeldJobLifecycleService},
};

/// Service type used by the BDD world.
pub type TestWeldJobService =
    WeldJobLifecycleService<InMemoryWeldJobRepository, RandomBusinessIdSource, DefaultClock>;

/// Scenario world for weld job lifecycle behaviour tests.
pub struct WeldJobWorld {
    pub service: TestWeldJobService,
    pub device_id: Option<DeviceId>,
    pub previous_outcome: Option<RegistrationOutcome>,
    pub last_outcome: Option<RegistrationOutcome>,
    pub closed_business_id: Option<BusinessId>,
    pub completion_result: Option<Option<SequenceId>>,
}

impl WeldJobWorld {
    /// Creates a world backed by an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let service = WeldJobLifecycleService::new(
            Arc::new(InMemoryWeldJobRepository::new()),
            Arc::new(RandomBusinessIdSource),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            device_id: None,
            previous_outcome: None,
            last_outcome: None,
            closed_business_id: None,
            completion_result: None,
        }
    }

    /// Returns the scenario's device or an error when none was given.
    ///
    /// # Errors
    ///
    /// Returns an error when no device step ran first.
    pub fn device(&self) -> Result<DeviceId, eyre::Report> {
        self.device_id
            .clone()
            .ok_or_else(|| eyre::eyre!("missing device in scenario world"))
    }

    /// Returns the most recent registration outcome.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was registered.
    pub fn last_outcome(&self) -> Result<&RegistrationOutcome, eyre::Report> {
        self.last_outcome
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing registration outcome"))
    }
}

impl Default for WeldJobWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WeldJobWorld {
    WeldJobWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
